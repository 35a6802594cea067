//! Character assembly
//!
//! Pure: the same template, budget snapshot and picks always produce the same
//! Character, so rendering it twice gives identical output.

use ahash::AHashMap;
use serde::Serialize;

use crate::budget::PointBudget;
use crate::character::attribute::{format_value, parse_attribute_trait, parse_leveled_trait};
use crate::character::derived::DerivedStats;
use crate::character::pick::ResolvedPick;
use crate::config::{BudgetUnit, Template};

/// Picks of one category with its totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPicks {
    pub category: String,
    pub unit: BudgetUnit,
    /// Declared allocation; `None` for categories without a budget
    pub allocation: Option<i32>,
    /// Signed amount spent, including fixed pre-charges
    pub spent: i32,
    pub picks: Vec<ResolvedPick>,
}

/// One line of the merged trait list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetEntry {
    pub name: String,
    pub cost: i32,
}

/// A finished character
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Character {
    pub template: String,
    pub fixed: Vec<ResolvedPick>,
    pub categories: Vec<CategoryPicks>,
    pub traits: Vec<SheetEntry>,
    pub derived: DerivedStats,
    pub total_points: i32,
}

impl Character {
    pub fn category(&self, name: &str) -> Option<&CategoryPicks> {
        self.categories.iter().find(|c| c.category == name)
    }

    /// Fixed and resolved picks in the order they were made
    pub fn all_picks(&self) -> impl Iterator<Item = &ResolvedPick> {
        self.fixed
            .iter()
            .chain(self.categories.iter().flat_map(|c| c.picks.iter()))
    }
}

pub fn assemble(
    template: &Template,
    budget: &PointBudget,
    fixed: Vec<ResolvedPick>,
    picks: Vec<ResolvedPick>,
    derived: DerivedStats,
) -> Character {
    let is_money = |category: &str| budget.unit(category) == Some(BudgetUnit::Money);

    // Declared categories first, in declaration order
    let mut categories: Vec<CategoryPicks> = template
        .budgets
        .iter()
        .map(|spec| CategoryPicks {
            category: spec.category.clone(),
            unit: spec.unit,
            allocation: Some(spec.points),
            spent: spec.points.signum() * budget.spent(&spec.category) as i32,
            picks: Vec::new(),
        })
        .collect();

    for pick in &picks {
        let index = match categories.iter().position(|c| c.category == pick.category) {
            Some(index) => index,
            None => {
                categories.push(CategoryPicks {
                    category: pick.category.clone(),
                    unit: BudgetUnit::Points,
                    allocation: None,
                    spent: 0,
                    picks: Vec::new(),
                });
                categories.len() - 1
            }
        };
        let entry = &mut categories[index];
        if entry.allocation.is_none() {
            entry.spent += pick.cost;
        }
        entry.picks.push(pick.clone());
    }

    let sheet_picks: Vec<&ResolvedPick> = fixed
        .iter()
        .chain(picks.iter())
        .filter(|p| !is_money(&p.category))
        .collect();

    let total_points = sheet_picks.iter().map(|p| p.cost).sum();
    let traits = merge_traits(sheet_picks.into_iter());

    Character {
        template: template.name.clone(),
        fixed,
        categories,
        traits,
        derived,
        total_points,
    }
}

enum Merged {
    Attribute {
        label: &'static str,
        absolute: Option<f64>,
        relative: f64,
        cost: i32,
    },
    Leveled {
        name: String,
        level: i32,
        cost: i32,
    },
    Plain(SheetEntry),
}

impl Merged {
    fn into_entry(self) -> SheetEntry {
        match self {
            Merged::Attribute {
                label,
                absolute: Some(base),
                relative,
                cost,
            } => SheetEntry {
                name: format!("{} {}", label, format_value(base + relative)),
                cost,
            },
            Merged::Attribute {
                label,
                absolute: None,
                relative,
                cost,
            } => {
                let sign = if relative < 0.0 { "-" } else { "+" };
                SheetEntry {
                    name: format!("{} {}{}", label, sign, format_value(relative.abs())),
                    cost,
                }
            }
            Merged::Leveled { name, cost, .. } => SheetEntry { name, cost },
            Merged::Plain(entry) => entry,
        }
    }
}

/// Collapse attribute increments and repeated leveled traits into sheet lines
pub fn merge_traits<'a>(picks: impl Iterator<Item = &'a ResolvedPick>) -> Vec<SheetEntry> {
    let mut merged: Vec<Merged> = Vec::new();
    // Attribute labels and `#`-prefixed leveled base names
    let mut index: AHashMap<String, usize> = AHashMap::new();

    for pick in picks {
        if let Some(parsed) = parse_attribute_trait(&pick.name) {
            let label = parsed.attribute.as_str();
            match index.get(label).copied() {
                Some(i) => {
                    if let Merged::Attribute {
                        absolute,
                        relative,
                        cost,
                        ..
                    } = &mut merged[i]
                    {
                        if parsed.relative {
                            *relative += parsed.value;
                        } else {
                            *absolute = Some(parsed.value);
                        }
                        *cost += pick.cost;
                    }
                }
                None => {
                    index.insert(label.to_string(), merged.len());
                    merged.push(Merged::Attribute {
                        label,
                        absolute: (!parsed.relative).then_some(parsed.value),
                        relative: if parsed.relative { parsed.value } else { 0.0 },
                        cost: pick.cost,
                    });
                }
            }
        } else if let Some((base, level)) = parse_leveled_trait(&pick.name) {
            let key = format!("#{}", base);
            match index.get(&key).copied() {
                Some(i) => {
                    if let Merged::Leveled {
                        name,
                        level: held,
                        cost,
                    } = &mut merged[i]
                    {
                        if level > *held {
                            *held = level;
                            *name = pick.name.clone();
                        }
                        *cost += pick.cost;
                    }
                }
                None => {
                    index.insert(key, merged.len());
                    merged.push(Merged::Leveled {
                        name: pick.name.clone(),
                        level,
                        cost: pick.cost,
                    });
                }
            }
        } else {
            merged.push(Merged::Plain(SheetEntry {
                name: pick.name.clone(),
                cost: pick.cost,
            }));
        }
    }

    merged.into_iter().map(Merged::into_entry).collect()
}
