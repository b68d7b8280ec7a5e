//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the kisoku crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use kisoku::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let context = ExecutionContext::from_file("path/to/context.json")?;
//! let compiled = Compiler::default().compile("userSales.sum(s => s.SaleAmount) >= context.Target")?;
//!
//! let result = Evaluator::new().run(&compiled, &context);
//! println!("Evaluation Result: {:?}", result);
//! # Ok(())
//! # }
//! ```

// Core compilation and evaluation
pub use crate::compiler::{Compiler, CompilerBuilder};
pub use crate::interpreter::{ActionOutcome, Branch, Evaluator, RuleOutcome, TestResult};
pub use crate::validator::{ValidationResult, validate};

// AST and expression types
pub use crate::ast::{Expression, Value};
pub use crate::catalog::{Catalog, DataSource, DataSourceKind};

// Rules, graphs and templates
pub use crate::graph::{GraphCommand, Node, NodeType, RuleGraph};
pub use crate::rule::{CompiledExpression, CompiledRule, RuleDefinition};
pub use crate::templates::{RuleTemplate, TemplateLibrary};

// Data and configuration
pub use crate::config::{EngineConfig, EvaluationBudget, LayoutConfig};
pub use crate::data::ExecutionContext;

// Error types
pub use crate::error::{
    AssemblyError, CompileError, EvaluationError, GraphError, StructuralError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
