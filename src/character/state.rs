//! In-progress character view used by prerequisite checks

use ahash::{AHashMap, AHashSet};

use crate::character::attribute::{parse_attribute_trait, parse_leveled_trait, Attribute};
use crate::config::TraitOption;

/// Everything recorded on a character so far
#[derive(Debug, Clone, Default)]
pub struct TraitState {
    names: AHashSet<String>,
    groups: AHashSet<String>,
    // Highest level seen per leveled base name
    levels: AHashMap<String, i32>,
    tags: AHashMap<String, u32>,
    absolute: [Option<f64>; Attribute::COUNT],
    bonus: [f64; Attribute::COUNT],
}

impl TraitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a picked or fixed option
    pub fn record(&mut self, option: &TraitOption) {
        self.names.insert(option.name.clone());
        self.groups.insert(option.group_key().to_string());

        for tag in &option.tags {
            *self.tags.entry(tag.clone()).or_insert(0) += 1;
        }

        if let Some(parsed) = parse_attribute_trait(&option.name) {
            let slot = parsed.attribute.index();
            if parsed.relative {
                self.bonus[slot] += parsed.value;
            } else {
                self.absolute[slot] = Some(parsed.value);
            }
        } else if let Some((base, level)) = parse_leveled_trait(&option.name) {
            let entry = self.levels.entry(base.to_string()).or_insert(level);
            *entry = (*entry).max(level);
        }
    }

    #[inline]
    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[inline]
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// Present by exact name, or by base name of a leveled trait
    #[inline]
    pub fn has_trait(&self, name: &str) -> bool {
        self.names.contains(name) || self.levels.contains_key(name)
    }

    /// Highest level held; 1 for an unleveled trait that is present, else 0
    pub fn trait_level(&self, name: &str) -> i32 {
        if let Some(level) = self.levels.get(name) {
            *level
        } else if self.names.contains(name) {
            1
        } else {
            0
        }
    }

    #[inline]
    pub fn tag_count(&self, tag: &str) -> u32 {
        self.tags.get(tag).copied().unwrap_or(0)
    }

    /// Current score, secondary attributes following their primaries
    pub fn attribute(&self, attribute: Attribute) -> f64 {
        let slot = attribute.index();
        let base = match self.absolute[slot] {
            Some(value) => value,
            None => match attribute {
                Attribute::St | Attribute::Dx | Attribute::Iq | Attribute::Ht => 10.0,
                Attribute::Hp => self.attribute(Attribute::St),
                Attribute::Will | Attribute::Per => self.attribute(Attribute::Iq),
                Attribute::Fp => self.attribute(Attribute::Ht),
                Attribute::BasicSpeed => {
                    (self.attribute(Attribute::Dx) + self.attribute(Attribute::Ht)) / 4.0
                }
                Attribute::BasicMove => self.attribute(Attribute::BasicSpeed).floor(),
            },
        };
        base + self.bonus[slot]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
