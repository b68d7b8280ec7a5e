//! The structural model of a rule: typed nodes nested into named groups.
//!
//! A [`RuleGraph`] is single-writer. Every mutation goes through
//! [`RuleGraph::dispatch`] or one of the mutators built on the same path,
//! each taking `&mut self`.

mod assemble;
pub mod node;
mod persistence;
mod store;

pub use node::{Extent, Node, NodeCounter, NodeType, Position};
pub use persistence::GraphSnapshot;
pub use store::{CommandOutcome, DeleteOutcome, GraphCommand, RuleGraph};
