//! Load-time expansion of template specs

use crate::config::option::{LevelSpec, OptionSpec, TraitOption};
use crate::config::table::{ChoiceTable, TableSpec};
use crate::config::template::{Template, TemplateSpec};
use crate::error::{GeneratorError, Result};
use crate::prereq::get_or_parse;

/// Category given to fixed options that name none
pub const FIXED_CATEGORY: &str = "template";

/// Self-control numbers with their cost multipliers as (numerator, denominator)
const SELF_CONTROL_TIERS: [(u8, i32, i32); 4] = [(15, 1, 2), (12, 1, 1), (9, 3, 2), (6, 2, 1)];

pub fn expand_template(spec: TemplateSpec) -> Result<Template> {
    let TemplateSpec {
        name,
        budgets,
        fixed,
        tables: table_specs,
    } = spec;

    let mut fixed_options = Vec::with_capacity(fixed.len());
    for mut option in fixed {
        if option.category.is_empty() {
            option.category = FIXED_CATEGORY.to_string();
        }
        attach_requirement(&name, "fixed", &mut option)?;
        fixed_options.push(option);
    }

    let mut tables: Vec<ChoiceTable> = Vec::with_capacity(table_specs.len());
    for table_spec in table_specs {
        let table = expand_table(&name, table_spec, &tables)?;
        tables.push(table);
    }

    Ok(Template {
        name,
        budgets,
        fixed: fixed_options,
        tables,
    })
}

fn expand_table(template: &str, spec: TableSpec, earlier: &[ChoiceTable]) -> Result<ChoiceTable> {
    let TableSpec {
        name,
        category,
        policy,
        shortfall,
        include,
        fallback,
        options: specs,
    } = spec;

    let mut options = Vec::new();
    for included in &include {
        let source = earlier.iter().find(|t| &t.name == included).ok_or_else(|| {
            GeneratorError::invalid_template(
                template,
                format!("table '{}' includes '{}', which is not an earlier table", name, included),
            )
        })?;
        options.extend(source.options.iter().cloned());
    }

    for spec in specs {
        options.extend(
            expand_option(spec)
                .map_err(|reason| GeneratorError::invalid_template(template, format!("table '{}': {}", name, reason)))?,
        );
    }

    for option in options.iter_mut() {
        option.category = category.clone();
        attach_requirement(template, &name, option)?;
    }

    let fallback = match fallback {
        Some(mut option) => {
            option.category = category.clone();
            attach_requirement(template, &name, &mut option)?;
            Some(option)
        }
        None => None,
    };

    Ok(ChoiceTable {
        name,
        category,
        policy,
        shortfall,
        options,
        fallback,
    })
}

/// Expand one option entry into its tiers
pub fn expand_option(spec: OptionSpec) -> std::result::Result<Vec<TraitOption>, String> {
    match spec {
        OptionSpec::Single(option) => Ok(vec![option]),
        OptionSpec::Group { group, name } => {
            if group.is_empty() {
                return Err("empty option group".to_string());
            }
            let key = name.unwrap_or_else(|| {
                group
                    .iter()
                    .map(|o| o.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" / ")
            });
            Ok(group
                .into_iter()
                .map(|mut option| {
                    option.group = Some(key.clone());
                    option
                })
                .collect())
        }
        OptionSpec::Levels { levels } => expand_levels(levels),
        OptionSpec::SelfControl { self_control } => {
            if self_control.is_empty() {
                return Err("empty self-control list".to_string());
            }
            let key = self_control
                .iter()
                .map(|o| o.name.as_str())
                .collect::<Vec<_>>()
                .join(" / ");
            let mut tiers = Vec::with_capacity(self_control.len() * SELF_CONTROL_TIERS.len());
            for base in &self_control {
                for (number, numerator, denominator) in SELF_CONTROL_TIERS {
                    let mut tier = base.clone();
                    tier.name = format!("{} ({})", base.name, number);
                    // Integer division truncates toward zero
                    tier.cost = base
                        .cost
                        .checked_mul(numerator)
                        .ok_or_else(|| format!("self-control cost of '{}' is out of range", base.name))?
                        / denominator;
                    tier.group = Some(key.clone());
                    tiers.push(tier);
                }
            }
            Ok(tiers)
        }
    }
}

fn expand_levels(spec: LevelSpec) -> std::result::Result<Vec<TraitOption>, String> {
    if !spec.name.contains("%d") {
        return Err(format!("leveled option '{}' has no %d placeholder", spec.name));
    }
    if spec.count == 0 {
        return Err(format!("leveled option '{}' has no levels", spec.name));
    }
    let count = i32::try_from(spec.count)
        .map_err(|_| format!("leveled option '{}' has too many levels ({})", spec.name, spec.count))?;
    (1..=count)
        .map(|level| {
            let cost = spec
                .cost
                .checked_mul(level)
                .ok_or_else(|| format!("leveled option '{}' costs too much at level {}", spec.name, level))?;
            let mut option = TraitOption::new(spec.name.replace("%d", &level.to_string()), cost);
            option.prerequisite = spec.prerequisite.clone();
            option.weight = spec.weight;
            option.tags = spec.tags.clone();
            option.group = Some(spec.name.clone());
            Ok(option)
        })
        .collect()
}

fn attach_requirement(template: &str, table: &str, option: &mut TraitOption) -> Result<()> {
    if let Some(text) = option.prerequisite.as_deref().filter(|t| !t.trim().is_empty()) {
        let ast = get_or_parse(text).map_err(|err| {
            GeneratorError::invalid_template(
                template,
                format!("table '{}': option '{}': {}", table, option.name, err),
            )
        })?;
        option.requirement = Some(ast);
    }
    Ok(())
}
