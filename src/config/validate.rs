//! Load-time checks on expanded templates
//!
//! Tables resolve strictly in order, so a prerequisite can only be met by a
//! fixed option, an earlier table, or an earlier pick of the same table.
//! References inside one table form a dependency graph that must be acyclic.

use ahash::{AHashMap, AHashSet};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::character::{parse_attribute_trait, parse_leveled_trait, Attribute};
use crate::config::option::TraitOption;
use crate::config::table::ChoiceTable;
use crate::config::template::Template;
use crate::error::{GeneratorError, Result};
use crate::prereq::{Subject, Test};

/// Check a whole library: non-empty, unique names, every template valid
pub fn validate_templates(templates: &[Template]) -> Result<()> {
    if templates.is_empty() {
        return Err(GeneratorError::Deserialization(
            "template data defines no templates".to_string(),
        ));
    }

    let mut seen = AHashSet::new();
    for template in templates {
        if template.name.trim().is_empty() || template.name.eq_ignore_ascii_case("random") {
            return Err(GeneratorError::invalid_template(
                &template.name,
                "template name must be non-empty and not 'random'",
            ));
        }
        if !seen.insert(template.name.to_lowercase()) {
            return Err(GeneratorError::invalid_template(
                &template.name,
                "duplicate template name",
            ));
        }
        validate_template(template)?;
    }
    Ok(())
}

pub fn validate_template(template: &Template) -> Result<()> {
    let fail = |reason: String| GeneratorError::invalid_template(&template.name, reason);

    let mut declared = AHashSet::new();
    for budget in &template.budgets {
        if !declared.insert(budget.category.as_str()) {
            return Err(fail(format!("budget category '{}' declared twice", budget.category)));
        }
    }

    // Fixed options pre-charged to declared categories must fit
    let mut precharged: AHashMap<&str, u32> = AHashMap::new();
    for option in &template.fixed {
        if let Some(budget) = template.budget(&option.category) {
            check_sign(option, budget.points).map_err(&fail)?;
            *precharged.entry(option.category.as_str()).or_insert(0) += option.price();
        }
    }
    for (category, total) in &precharged {
        let allocation = template.budget(category).map(|b| b.points.unsigned_abs()).unwrap_or(0);
        if *total > allocation {
            return Err(fail(format!(
                "fixed options cost {} in '{}', which only allows {}",
                total, category, allocation
            )));
        }
    }

    let mut table_names = AHashSet::new();
    for table in &template.tables {
        if !table_names.insert(table.name.as_str()) {
            return Err(fail(format!("table '{}' declared twice", table.name)));
        }
        let budget = template.budget(&table.category).ok_or_else(|| {
            fail(format!(
                "table '{}' uses undeclared category '{}'",
                table.name, table.category
            ))
        })?;

        let mut option_names = AHashSet::new();
        for option in &table.options {
            if !option_names.insert(option.name.as_str()) {
                return Err(fail(format!(
                    "table '{}' lists '{}' twice",
                    table.name, option.name
                )));
            }
            check_sign(option, budget.points)
                .map_err(|reason| fail(format!("table '{}': {}", table.name, reason)))?;
        }

        if let Some(fallback) = &table.fallback {
            check_sign(fallback, budget.points)
                .map_err(|reason| fail(format!("table '{}': {}", table.name, reason)))?;
            if fallback.price() > budget.points.unsigned_abs() {
                return Err(fail(format!(
                    "table '{}': fallback '{}' can never be afforded",
                    table.name, fallback.name
                )));
            }
        }
    }

    check_ordering(template).map_err(fail)
}

fn check_sign(option: &TraitOption, allocation: i32) -> std::result::Result<(), String> {
    let mismatch = if allocation < 0 {
        option.cost > 0
    } else {
        option.cost < 0
    };
    if mismatch {
        Err(format!(
            "'{}' costs {} but its category allocation is {}",
            option.name, option.cost, allocation
        ))
    } else {
        Ok(())
    }
}

/// Keys an option makes available to later prerequisites
fn provided_keys(option: &TraitOption) -> Vec<String> {
    let mut keys = vec![option.name.clone()];
    if let Some((base, _)) = parse_leveled_trait(&option.name) {
        keys.push(base.to_string());
    }
    keys.extend(option.tags.iter().map(|tag| format!("@{}", tag)));
    if let Some(modifier) = parse_attribute_trait(&option.name) {
        keys.push(attribute_key(modifier.attribute));
    }
    keys
}

fn attribute_key(attribute: Attribute) -> String {
    format!("={}", attribute.as_str())
}

/// Keys whose picks can move an attribute's value
fn attribute_sources(attribute: Attribute) -> Vec<String> {
    use Attribute::*;
    let inputs: &[Attribute] = match attribute {
        Hp => &[St],
        Will | Per => &[Iq],
        Fp => &[Ht],
        BasicSpeed => &[Dx, Ht],
        BasicMove => &[BasicSpeed, Dx, Ht],
        St | Dx | Iq | Ht => &[],
    };
    std::iter::once(attribute)
        .chain(inputs.iter().copied())
        .map(attribute_key)
        .collect()
}

fn table_keys(table: &ChoiceTable) -> AHashSet<String> {
    table
        .options
        .iter()
        .chain(table.fallback.iter())
        .flat_map(provided_keys)
        .collect()
}

fn check_ordering(template: &Template) -> std::result::Result<(), String> {
    let mut available: AHashSet<String> = template.fixed.iter().flat_map(provided_keys).collect();
    let per_table: Vec<AHashSet<String>> = template.tables.iter().map(table_keys).collect();

    for (position, table) in template.tables.iter().enumerate() {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..table.options.len()).map(|i| graph.add_node(i)).collect();

        let mut providers: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (i, option) in table.options.iter().enumerate() {
            for key in provided_keys(option) {
                providers.entry(key).or_default().push(i);
            }
        }

        for (i, option) in table.options.iter().enumerate() {
            let Some(ast) = &option.requirement else {
                continue;
            };
            for requirement in ast.requirements() {
                let key = match &requirement.subject {
                    // Attributes always have a value, so only a later seller is an error
                    Subject::Attribute(attribute) => {
                        for key in attribute_sources(*attribute) {
                            if available.contains(&key) || providers.contains_key(&key) {
                                continue;
                            }
                            if let Some(later) = per_table[position + 1..]
                                .iter()
                                .position(|keys| keys.contains(&key))
                            {
                                return Err(format!(
                                    "table '{}': prerequisite of '{}' tests {}, which only table '{}' changes later",
                                    table.name,
                                    option.name,
                                    &key[1..],
                                    template.tables[position + 1 + later].name
                                ));
                            }
                        }
                        continue;
                    }
                    Subject::Trait(name) => name.clone(),
                    Subject::Tag(tag) => format!("@{}", tag),
                };
                if available.contains(&key) {
                    continue;
                }
                if let Some(sources) = providers.get(&key) {
                    // Absence cannot be made true by picking, so it adds no edge
                    if requirement.test != Test::Absent {
                        // Other picks can satisfy a count on the option's own tag
                        for &source in sources.iter().filter(|&&s| s != i) {
                            graph.add_edge(nodes[source], nodes[i], ());
                        }
                    }
                    continue;
                }
                if let Some(later) = per_table[position + 1..]
                    .iter()
                    .position(|keys| keys.contains(&key))
                {
                    return Err(format!(
                        "table '{}': prerequisite of '{}' refers to '{}', which only table '{}' provides later",
                        table.name,
                        option.name,
                        key,
                        template.tables[position + 1 + later].name
                    ));
                }
                if requirement.test == Test::Present {
                    return Err(format!(
                        "table '{}': prerequisite of '{}' requires '{}', which nothing provides",
                        table.name, option.name, key
                    ));
                }
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            let option = &table.options[graph[cycle.node_id()]];
            return Err(format!(
                "table '{}': prerequisites of '{}' form a cycle",
                table.name, option.name
            ));
        }

        available.extend(per_table[position].iter().cloned());
    }

    Ok(())
}
