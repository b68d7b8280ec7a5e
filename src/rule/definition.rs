use serde::{Deserialize, Serialize};

/// The textual form of one executable rule, as folded out of a rule group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub group_id: String,
    pub name: String,
    pub condition: String,
    pub actions: Vec<ActionDefinition>,
}

/// An action attached to a rule: one expression for each outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub group_id: String,
    pub name: String,
    pub on_success: String,
    pub on_failure: String,
}
