//! One concrete selection on a character

use serde::Serialize;

use crate::config::TraitOption;

/// Source label for a template's mandatory options
pub const FIXED_SOURCE: &str = "fixed";

/// An option as it landed on the character
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPick {
    pub name: String,
    pub category: String,
    /// Signed cost actually paid
    pub cost: i32,
    /// Table name, or `fixed`
    pub source: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub lbs: f64,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

impl ResolvedPick {
    pub fn from_option(option: &TraitOption, source: &str) -> Self {
        Self {
            name: option.name.clone(),
            category: option.category.clone(),
            cost: option.cost,
            source: source.to_string(),
            lbs: option.lbs,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.source == FIXED_SOURCE
    }
}
