//! The static vocabulary of the rule DSL.
//!
//! The [`Catalog`] is consulted by the compiler for operator precedence,
//! function and method arity, and the property sets of data sources.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

mod standard;

pub use standard::{standard_data_sources, standard_functions, standard_methods, standard_operators};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataSourceKind {
    Object,
    Collection,
}

/// A named record or collection exposed to expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: String,
    pub label: String,
    pub properties: Vec<String>,
    pub kind: DataSourceKind,
}

impl DataSource {
    pub fn new(id: &str, label: &str, kind: DataSourceKind, properties: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            properties: properties.iter().map(|p| p.to_string()).collect(),
            kind,
        }
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperatorKind {
    Comparison,
    Arithmetic,
    Logic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Associativity {
    Left,
    Right,
}

/// An operator entry. Lower `precedence` binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSpec {
    pub id: &'static str,
    pub kind: OperatorKind,
    pub precedence: u8,
    pub associativity: Associativity,
    /// 1 for prefix operators, 2 for infix, 3 for the ternary.
    pub arity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionCategory {
    Math,
    Date,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturnKind {
    Number,
    Boolean,
    String,
    Date,
    Collection,
    Record,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSpec {
    pub id: &'static str,
    pub category: FunctionCategory,
    pub arity: usize,
    pub returns: ReturnKind,
}

/// What a collection method takes between its parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodArgKind {
    None,
    Lambda,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSpec {
    pub id: &'static str,
    pub arity: usize,
    pub argument: MethodArgKind,
    pub returns: ReturnKind,
}

/// Read-only lookup tables for the DSL vocabulary.
#[derive(Debug, Clone)]
pub struct Catalog {
    data_sources: AHashMap<String, DataSource>,
    binary_operators: AHashMap<&'static str, OperatorSpec>,
    unary_operators: AHashMap<&'static str, OperatorSpec>,
    ternary: OperatorSpec,
    functions: AHashMap<&'static str, FunctionSpec>,
    methods: AHashMap<&'static str, MethodSpec>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The built-in vocabulary for sales commission rules.
    pub fn standard() -> Self {
        let mut binary_operators = AHashMap::new();
        let mut unary_operators = AHashMap::new();
        let mut ternary = None;
        for op in standard_operators() {
            match op.arity {
                1 => {
                    unary_operators.insert(op.id, op);
                }
                2 => {
                    binary_operators.insert(op.id, op);
                }
                _ => ternary = Some(op),
            }
        }

        Self {
            data_sources: standard_data_sources()
                .into_iter()
                .map(|ds| (ds.id.clone(), ds))
                .collect(),
            binary_operators,
            unary_operators,
            ternary: ternary.unwrap_or(standard::TERNARY),
            functions: standard_functions().into_iter().map(|f| (f.id, f)).collect(),
            methods: standard_methods().into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    /// Registers (or replaces) a data source, e.g. one derived from a schema provider.
    pub fn with_data_source(mut self, source: DataSource) -> Self {
        self.data_sources.insert(source.id.clone(), source);
        self
    }

    pub fn data_source(&self, id: &str) -> Option<&DataSource> {
        self.data_sources.get(id)
    }

    pub fn data_sources(&self) -> impl Iterator<Item = &DataSource> {
        self.data_sources.values()
    }

    pub fn binary_operator(&self, symbol: &str) -> Option<&OperatorSpec> {
        self.binary_operators.get(symbol)
    }

    pub fn unary_operator(&self, symbol: &str) -> Option<&OperatorSpec> {
        self.unary_operators.get(symbol)
    }

    /// The conditional operator; its precedence bounds the condition operand.
    pub fn ternary_operator(&self) -> &OperatorSpec {
        &self.ternary
    }

    pub fn function(&self, id: &str) -> Option<&FunctionSpec> {
        self.functions.get(id)
    }

    pub fn is_function_namespace(&self, name: &str) -> bool {
        self.functions
            .keys()
            .any(|id| id.split_once('.').is_some_and(|(ns, _)| ns == name))
    }

    pub fn method(&self, id: &str) -> Option<&MethodSpec> {
        self.methods.get(id)
    }
}
