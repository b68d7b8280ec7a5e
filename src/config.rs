//! Engine configuration.
//!
//! Every field has a default, so a host may load a partial JSON document:
//!
//! ```rust
//! use kisoku::config::EngineConfig;
//!
//! let config: EngineConfig = serde_json::from_str(r#"{ "budget": { "maxSteps": 500 } }"#).unwrap();
//! assert_eq!(config.budget.max_steps, 500);
//! assert_eq!(config.budget.max_depth, 64);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub budget: EvaluationBudget,
    pub layout: LayoutConfig,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Limits applied to a single evaluation. `max_depth` also bounds parser nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluationBudget {
    pub max_depth: usize,
    pub max_steps: u64,
    pub timeout_ms: u64,
}

impl Default for EvaluationBudget {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_steps: 1_000_000,
            timeout_ms: 1_000,
        }
    }
}

impl EvaluationBudget {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Canvas coordinates used when the rule graph allocates node positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub base_x: f64,
    pub base_y: f64,
    pub dx: f64,
    pub dy: f64,
    /// Offset of a condition or nested group inside its parent.
    pub nested_x: f64,
    pub nested_y: f64,
    pub operator_y: f64,
    /// Offset of the name node inside its group.
    pub name_x: f64,
    pub name_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_x: 100.0,
            base_y: 100.0,
            dx: 50.0,
            dy: 50.0,
            nested_x: 20.0,
            nested_y: 60.0,
            operator_y: 140.0,
            name_x: 10.0,
            name_y: 10.0,
        }
    }
}
