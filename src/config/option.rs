//! Trait options and their data-file spellings

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::character::TraitState;
use crate::error::Result;
use crate::prereq::{check, check_prerequisite, PrereqNode};

/// One selectable trait, skill, spell or item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitOption {
    pub name: String,
    /// Signed point cost; disadvantages are negative, equipment is in dollars
    #[serde(default)]
    pub cost: i32,
    /// Filled from the owning table at load time
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Exclusion group; options without one form a group of their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub tags: SmallVec<[String; 2]>,
    #[serde(default)]
    pub lbs: f64,
    #[serde(skip)]
    pub requirement: Option<PrereqNode>,
}

fn default_weight() -> f64 {
    1.0
}

impl TraitOption {
    pub fn new(name: impl Into<String>, cost: i32) -> Self {
        Self {
            name: name.into(),
            cost,
            category: String::new(),
            prerequisite: None,
            weight: default_weight(),
            group: None,
            tags: SmallVec::new(),
            lbs: 0.0,
            requirement: None,
        }
    }

    #[inline]
    pub fn group_key(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.name)
    }

    /// Magnitude charged against the category budget
    #[inline]
    pub fn price(&self) -> u32 {
        self.cost.unsigned_abs()
    }

    pub fn prerequisite_met(&self, state: &TraitState) -> Result<bool> {
        match (&self.requirement, &self.prerequisite) {
            (Some(ast), _) => Ok(check(ast, state)),
            (None, Some(text)) => check_prerequisite(text, state),
            (None, None) => Ok(true),
        }
    }
}

/// `{"name": "ST +%d", "cost": 10, "count": 3}`
#[derive(Debug, Clone, Deserialize)]
pub struct LevelSpec {
    pub name: String,
    pub cost: i32,
    pub count: u32,
    #[serde(default)]
    pub prerequisite: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub tags: SmallVec<[String; 2]>,
}

/// Option entry as written in a table's `options` list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionSpec {
    /// Mutually exclusive alternatives
    Group {
        group: Vec<TraitOption>,
        #[serde(default)]
        name: Option<String>,
    },
    Levels { levels: LevelSpec },
    /// Mental disadvantages bought at self-control 15, 12, 9 and 6
    SelfControl { self_control: Vec<TraitOption> },
    Single(TraitOption),
}
