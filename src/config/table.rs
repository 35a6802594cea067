//! Choice tables

use serde::{Deserialize, Serialize};

use crate::config::option::{OptionSpec, TraitOption};

/// How many picks a table makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "n", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// One pick; the table fails without it
    ExactlyOne,
    /// Up to `n` picks without replacement; zero is acceptable
    UpToN(usize),
    /// Keep picking while anything is affordable
    SpendAvailable,
}

/// What happens when a drawn tier costs more than is left
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Only affordable tiers are ever drawn
    #[default]
    Substitute,
    /// Drawing an unaffordable tier discards the whole group
    Skip,
}

/// A resolved table: options expanded, categories and prerequisites filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceTable {
    pub name: String,
    pub category: String,
    pub policy: SelectionPolicy,
    pub shortfall: ShortfallPolicy,
    pub options: Vec<TraitOption>,
    pub fallback: Option<TraitOption>,
}

impl ChoiceTable {
    pub fn option(&self, name: &str) -> Option<&TraitOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// Table as written in the data file
#[derive(Debug, Clone, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub category: String,
    pub policy: SelectionPolicy,
    #[serde(default)]
    pub shortfall: ShortfallPolicy,
    /// Earlier tables whose options are copied in
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub fallback: Option<TraitOption>,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}
