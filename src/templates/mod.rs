//! Named example rules covering the DSL from simple comparisons to chained
//! collection queries.

use serde::{Deserialize, Serialize};
use std::fmt;

mod standard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Commission,
    Bonus,
    Quota,
    Team,
    Product,
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commission => write!(f, "commission"),
            Self::Bonus => write!(f, "bonus"),
            Self::Quota => write!(f, "quota"),
            Self::Team => write!(f, "team"),
            Self::Product => write!(f, "product"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Intermediate,
    Advanced,
    Expert,
}

/// A ready-made rule: a condition plus the expressions run on each outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub expression: String,
    pub on_success: String,
    pub on_failure: String,
    pub complexity: Complexity,
}

impl RuleTemplate {
    /// The three expression fields, labelled by field name.
    pub fn expressions(&self) -> [(&'static str, &str); 3] {
        [
            ("expression", self.expression.as_str()),
            ("onSuccess", self.on_success.as_str()),
            ("onFailure", self.on_failure.as_str()),
        ]
    }
}

/// A read-only, ordered collection of templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateLibrary {
    templates: Vec<RuleTemplate>,
}

impl TemplateLibrary {
    /// The built-in templates.
    pub fn standard() -> Self {
        Self {
            templates: standard::standard_templates(),
        }
    }

    pub fn templates(&self) -> &[RuleTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RuleTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn by_category(&self, category: TemplateCategory) -> impl Iterator<Item = &RuleTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    pub fn by_complexity(&self, complexity: Complexity) -> impl Iterator<Item = &RuleTemplate> {
        self.templates
            .iter()
            .filter(move |t| t.complexity == complexity)
    }

    /// Exports the library as a flat JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
