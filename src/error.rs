use crate::ast::Value;
use thiserror::Error;

/// Errors raised while turning an expression string into an AST.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Expression failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedCharacter { found: char, position: usize },

    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        position: usize,
    },

    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("Unknown identifier '{name}' at position {position}")]
    UnknownIdentifier { name: String, position: usize },

    #[error("Data source '{source_id}' has no property '{property}' (position {position})")]
    UnknownProperty {
        source_id: String,
        property: String,
        position: usize,
    },

    #[error("Unknown function '{name}' at position {position}")]
    UnknownFunction { name: String, position: usize },

    #[error("Unknown collection method '{name}' at position {position}")]
    UnknownMethod { name: String, position: usize },

    #[error("'{name}' expects {expected} argument(s) but received {found} (position {position})")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        position: usize,
    },

    #[error("Method '{method}' cannot be applied to {target} (position {position})")]
    InvalidReceiver {
        method: String,
        target: String,
        position: usize,
    },

    #[error("Expression nesting exceeds the limit of {limit} at position {position}")]
    TooDeep { limit: usize, position: usize },

    #[error("Field '{field}' of rule '{rule}' failed to compile: {source}")]
    InField {
        rule: String,
        field: String,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Byte offset of the offending token, where one is known.
    pub fn position(&self) -> Option<usize> {
        match self {
            CompileError::UnexpectedCharacter { position, .. }
            | CompileError::UnterminatedString { position }
            | CompileError::UnexpectedToken { position, .. }
            | CompileError::UnknownIdentifier { position, .. }
            | CompileError::UnknownProperty { position, .. }
            | CompileError::UnknownFunction { position, .. }
            | CompileError::UnknownMethod { position, .. }
            | CompileError::ArityMismatch { position, .. }
            | CompileError::InvalidReceiver { position, .. }
            | CompileError::TooDeep { position, .. } => Some(*position),
            CompileError::InField { source, .. } => source.position(),
            CompileError::Validation(_) | CompileError::UnexpectedEnd { .. } => None,
        }
    }
}

/// Errors that can occur while evaluating a compiled expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error(
        "Type mismatch during operation '{operation}': expected {expected}, but found value '{found}'"
    )]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Value,
    },

    #[error("Data source '{0}' not found in the provided execution context")]
    InputNotFound(String),

    #[error("Property '{property}' not found on value '{target}'")]
    PropertyNotFound { property: String, target: String },

    #[error("Division by zero in '{0}'")]
    DivisionByZero(String),

    #[error("'{0}' is undefined for an empty collection")]
    EmptyCollection(String),

    #[error("Invalid argument for '{function}': {message}")]
    InvalidArgument { function: String, message: String },

    #[error("Evaluation exceeded the step budget of {0}")]
    StepBudgetExceeded(u64),

    #[error("Evaluation exceeded the recursion depth of {0}")]
    DepthExceeded(usize),

    #[error("Evaluation timed out after {0} ms")]
    Timeout(u64),
}

/// Precondition violations of the rule graph model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("no group selected")]
    NoGroupSelected,

    #[error("Node '{0}' is not a rule or action group")]
    NotAGroup(String),

    #[error("Parent '{parent_id}' of node '{node_id}' does not exist")]
    DanglingParent { node_id: String, parent_id: String },

    #[error("Node '{node_id}' would become its own ancestor")]
    Cycle { node_id: String },

    #[error("Duplicate node id '{0}'")]
    DuplicateId(String),

    #[error("Group '{group_id}' has more than one '{name_type}' child")]
    DuplicateNameNode { group_id: String, name_type: String },

    #[error("'{0}' nodes are created together with their group")]
    ManagedNode(String),

    #[error("Name node '{0}' is not the name child of a matching group")]
    MisplacedNameNode(String),

    #[error("Group '{group_id}' has no '{name_type}' child")]
    MissingNameNode { group_id: String, name_type: String },
}

/// Errors returned by rule graph commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error("Node '{0}' not found")]
    NotFound(String),

    #[error("Failed to parse graph export: {0}")]
    Json(String),

    /// A command produced an outcome of the wrong kind; the store is inconsistent.
    #[error("Graph command returned {found}, expected {expected}")]
    UnexpectedOutcome { expected: String, found: String },
}

/// Errors raised while folding a rule group into a rule definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("Node '{0}' not found")]
    NotFound(String),

    #[error("Node '{0}' is not a rule group")]
    NotARuleGroup(String),

    #[error("Condition '{0}' has an empty expression")]
    EmptyCondition(String),

    #[error("Operator '{0}' is not placed between two conditions")]
    DanglingOperator(String),

    #[error("Operator '{node_id}' has unsupported value '{value}'")]
    UnknownOperator { node_id: String, value: String },
}

/// Errors reported by a schema provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Table '{0}' is not known to the schema provider")]
    UnknownTable(String),

    #[error("Schema provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised when saving or loading compiled rules and exports.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("{0}")]
    Generic(String),
}
