//! # Kisoku - Rule Expression Engine and Rule Graph Model
//!
//! **Kisoku** evaluates the small expression language used inside visually
//! assembled commission and bonus rules, and models those rules as a graph
//! of typed, nested nodes.
//!
//! ## Core Workflow
//!
//! 1.  **Validate**: [`validator::validate`] runs shallow lexical checks (empty input,
//!     unbalanced parentheses, `undefined`, mixed equality, literal zero divisors).
//! 2.  **Compile**: a [`compiler::Compiler`] tokenizes the expression and parses it with
//!     the precedence table of its [`catalog::Catalog`], checking property names and
//!     function and method arity as it goes.
//! 3.  **Evaluate**: an [`interpreter::Evaluator`] walks the AST against an
//!     [`data::ExecutionContext`] under a step, depth and time budget.
//! 4.  **Assemble rules**: a [`graph::RuleGraph`] holds rule groups, conditions, operators
//!     and action groups. [`graph::RuleGraph::assemble`] folds a rule group into a
//!     [`rule::RuleDefinition`] that compiles into a [`rule::CompiledRule`].
//!
//! ## Quick Start
//!
//! ```rust
//! use kisoku::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<()> {
//! let context = ExecutionContext::from(json!({
//!     "sale": { "Amount": 120 },
//!     "context": { "Target": 100 }
//! }));
//!
//! let evaluator = Evaluator::new();
//! let result = evaluator.evaluate("sale.Amount > context.Target", &context);
//! assert!(result.success);
//! assert_eq!(result.result, Some(Value::Bool(true)));
//!
//! // Rules are built as graphs and folded into expressions.
//! let mut graph = RuleGraph::new();
//! let group = graph.create_node(NodeType::RuleGroup, None)?;
//! let condition = graph.create_node(NodeType::Condition, None)?;
//! graph.update_node_data(&condition.id, json!({ "expression": "sale.Amount >= 100" }))?;
//!
//! let rule = Compiler::default().compile_rule(&graph.assemble(&group.id)?)?;
//! let outcome = evaluator.run_rule(&rule, &context);
//! assert!(outcome.matched);
//! # Ok(())
//! # }
//! ```

pub mod ast;
pub mod catalog;
pub mod compiler;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod interpreter;
pub mod prelude;
pub mod rule;
pub mod schema;
pub mod templates;
pub mod validator;
