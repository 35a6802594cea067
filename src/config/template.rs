//! Templates and budget declarations

use serde::{Deserialize, Serialize};

use crate::config::option::TraitOption;
use crate::config::table::{ChoiceTable, TableSpec};

/// Unit a budget is counted in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetUnit {
    #[default]
    Points,
    Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSpec {
    pub category: String,
    /// Negative for disadvantage allowances
    pub points: i32,
    #[serde(default)]
    pub unit: BudgetUnit,
}

impl BudgetSpec {
    pub fn points(category: impl Into<String>, points: i32) -> Self {
        Self {
            category: category.into(),
            points,
            unit: BudgetUnit::Points,
        }
    }

    pub fn money(category: impl Into<String>, dollars: i32) -> Self {
        Self {
            category: category.into(),
            points: dollars,
            unit: BudgetUnit::Money,
        }
    }
}

/// A character archetype, expanded and validated
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub budgets: Vec<BudgetSpec>,
    pub fixed: Vec<TraitOption>,
    pub tables: Vec<ChoiceTable>,
}

impl Template {
    pub fn budget(&self, category: &str) -> Option<&BudgetSpec> {
        self.budgets.iter().find(|b| b.category == category)
    }

    pub fn table(&self, name: &str) -> Option<&ChoiceTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSpec {
    pub name: String,
    #[serde(default)]
    pub budgets: Vec<BudgetSpec>,
    #[serde(default)]
    pub fixed: Vec<TraitOption>,
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

/// Top-level data document
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateFile {
    #[serde(default = "default_version")]
    pub version: u32,
    pub templates: Vec<TemplateSpec>,
}

pub const DATA_VERSION: u32 = 1;

fn default_version() -> u32 {
    DATA_VERSION
}
