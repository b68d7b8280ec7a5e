use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

/// The kinds of node a rule graph can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    RuleGroup,
    ActionGroup,
    Condition,
    ConditionalOperator,
    RuleName,
    ActionName,
    Initial,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::RuleGroup => "ruleGroup",
            NodeType::ActionGroup => "actionGroup",
            NodeType::Condition => "condition",
            NodeType::ConditionalOperator => "conditionalOperator",
            NodeType::RuleName => "ruleName",
            NodeType::ActionName => "actionName",
            NodeType::Initial => "initial",
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, NodeType::RuleGroup | NodeType::ActionGroup)
    }

    /// Conditions and operators only exist inside a group.
    pub fn requires_group(&self) -> bool {
        matches!(self, NodeType::Condition | NodeType::ConditionalOperator)
    }

    pub fn is_name(&self) -> bool {
        matches!(self, NodeType::RuleName | NodeType::ActionName)
    }

    /// The structural name child a group is created with.
    pub fn name_type(&self) -> Option<NodeType> {
        match self {
            NodeType::RuleGroup => Some(NodeType::RuleName),
            NodeType::ActionGroup => Some(NodeType::ActionName),
            _ => None,
        }
    }

    pub(crate) fn default_data(&self, index: u64) -> serde_json::Value {
        match self {
            NodeType::RuleGroup => json!({ "label": format!("Rule {}", index) }),
            NodeType::ActionGroup => json!({
                "label": format!("Action {}", index),
                "onSuccess": "",
                "onFailure": "",
            }),
            NodeType::Condition => json!({ "label": "Condition", "expression": "" }),
            NodeType::ConditionalOperator => json!({ "operator": "AND" }),
            NodeType::RuleName => json!({ "label": format!("Rule {}", index) }),
            NodeType::ActionName => json!({ "label": format!("Action {}", index) }),
            NodeType::Initial => json!({ "label": "Start" }),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Containment flag: the node is confined to its parent's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Extent {
    Parent,
}

/// One node of a rule graph, in its exported shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Node {
    /// A string field of the data payload, if present.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.data_str("label")
    }
}

/// Count of nodes ever created, per type. Never decreases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeCounter(BTreeMap<NodeType, u64>);

impl NodeCounter {
    pub fn get(&self, node_type: NodeType) -> u64 {
        self.0.get(&node_type).copied().unwrap_or(0)
    }

    /// Bumps the count for `node_type` and returns the new value.
    pub(crate) fn increment(&mut self, node_type: NodeType) -> u64 {
        let count = self.0.entry(node_type).or_insert(0);
        *count += 1;
        *count
    }

    /// Raises the count to at least `floor`.
    pub(crate) fn raise_to(&mut self, node_type: NodeType, floor: u64) {
        let count = self.0.entry(node_type).or_insert(0);
        *count = (*count).max(floor);
    }
}
