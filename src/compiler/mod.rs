use crate::ast::Expression;
use crate::catalog::{Catalog, DataSource};
use crate::config::EvaluationBudget;
use crate::error::CompileError;
use crate::rule::{CompiledAction, CompiledExpression, CompiledRule, RuleDefinition};
use crate::validator::validate;
use tracing::debug;

pub mod lexer;
mod parser;

use parser::Parser;

/// Turns expression strings into ASTs checked against a [`Catalog`].
///
/// A `Compiler` holds no mutable state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Compiler {
    catalog: Catalog,
    max_depth: usize,
}

pub struct CompilerBuilder {
    catalog: Catalog,
    max_depth: usize,
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::standard(),
            max_depth: EvaluationBudget::default().max_depth,
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_data_source(mut self, source: DataSource) -> Self {
        self.catalog = self.catalog.with_data_source(source);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            catalog: self.catalog,
            max_depth: self.max_depth,
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Validates and then parses an expression. A failing validation is
    /// returned as [`CompileError::Validation`] without attempting to parse.
    pub fn compile(&self, source: &str) -> Result<CompiledExpression, CompileError> {
        let validation = validate(source);
        if !validation.is_valid {
            debug!(errors = ?validation.errors, "expression rejected by validator");
            return Err(CompileError::Validation(validation.errors));
        }

        let ast = self.parse(source)?;
        debug!(depth = ast.depth(), "compiled expression");
        Ok(CompiledExpression {
            source: source.to_string(),
            ast,
            warnings: validation.warnings,
        })
    }

    /// Parses an expression without running the validator first.
    pub fn parse(&self, source: &str) -> Result<Expression, CompileError> {
        let tokens = lexer::tokenize(source)?;
        Parser::new(tokens, &self.catalog, self.max_depth).parse()
    }

    /// Compiles the condition and every action of an assembled rule.
    /// Errors name the rule and the field that failed.
    pub fn compile_rule(&self, definition: &RuleDefinition) -> Result<CompiledRule, CompileError> {
        let in_field = |field: String| {
            let rule = definition.name.clone();
            move |source: CompileError| CompileError::InField {
                rule,
                field,
                source: Box::new(source),
            }
        };

        let condition = self
            .compile(&definition.condition)
            .map_err(in_field("condition".to_string()))?;

        let actions = definition
            .actions
            .iter()
            .map(|action| {
                Ok(CompiledAction {
                    name: action.name.clone(),
                    on_success: self
                        .compile(&action.on_success)
                        .map_err(in_field(format!("{}.onSuccess", action.name)))?,
                    on_failure: self
                        .compile(&action.on_failure)
                        .map_err(in_field(format!("{}.onFailure", action.name)))?,
                })
            })
            .collect::<Result<Vec<_>, CompileError>>()?;

        debug!(rule = %definition.name, actions = actions.len(), "compiled rule");
        Ok(CompiledRule {
            group_id: definition.group_id.clone(),
            name: definition.name.clone(),
            condition,
            actions,
        })
    }
}
