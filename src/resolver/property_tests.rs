//! Property tests for table resolution
//!
//! Whatever the table and seed: the budget is never overspent, no exclusion
//! group is used twice, policy limits hold, and a spend-everything table stops
//! only when nothing left is affordable.

use proptest::prelude::*;

use crate::budget::PointBudget;
use crate::character::TraitState;
use crate::config::{BudgetSpec, ChoiceTable, SelectionPolicy, ShortfallPolicy, TraitOption};
use crate::error::GeneratorError;
use crate::random::SeededSource;
use crate::resolver::selector::TableResolver;

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

/// Options as (cost, weight, group slot); slot 0 means ungrouped
fn options_strategy() -> impl Strategy<Value = Vec<TraitOption>> {
    prop::collection::vec((0..=25i32, 0.0..=5.0f64, 0..=3usize), 0..=12).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (cost, weight, slot))| {
                let mut option = TraitOption::new(format!("Option {}", i), cost);
                option.category = "pool".to_string();
                option.weight = weight;
                if slot > 0 {
                    option.group = Some(format!("group {}", slot));
                }
                option
            })
            .collect()
    })
}

fn policy_strategy() -> impl Strategy<Value = SelectionPolicy> {
    prop_oneof![
        Just(SelectionPolicy::ExactlyOne),
        (0..=5usize).prop_map(SelectionPolicy::UpToN),
        Just(SelectionPolicy::SpendAvailable),
    ]
}

fn shortfall_strategy() -> impl Strategy<Value = ShortfallPolicy> {
    prop_oneof![Just(ShortfallPolicy::Substitute), Just(ShortfallPolicy::Skip)]
}

fn make_table(
    options: Vec<TraitOption>,
    policy: SelectionPolicy,
    shortfall: ShortfallPolicy,
) -> ChoiceTable {
    ChoiceTable {
        name: "generated".to_string(),
        category: "pool".to_string(),
        policy,
        shortfall,
        options,
        fallback: None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_budget_never_overspent(
        options in options_strategy(),
        policy in policy_strategy(),
        shortfall in shortfall_strategy(),
        points in 0..=60i32,
        seed in any::<u64>()
    ) {
        let table = make_table(options, policy, shortfall);
        let mut budget = PointBudget::new(&[BudgetSpec::points("pool", points)]);
        let mut state = TraitState::new();
        let result = TableResolver::new(&table)
            .resolve(&mut budget, &mut state, &mut SeededSource::new(seed));

        match result {
            Ok(picks) => {
                let spent: i32 = picks.iter().map(|p| p.cost).sum();
                prop_assert!(spent <= points);
                prop_assert_eq!(budget.available("pool") as i32, points - spent);
            }
            Err(GeneratorError::NoAffordableOption { .. }) => {
                prop_assert_eq!(budget.available("pool") as i32, points);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn prop_exclusion_groups_used_once(
        options in options_strategy(),
        policy in policy_strategy(),
        seed in any::<u64>()
    ) {
        let table = make_table(options, policy, ShortfallPolicy::Substitute);
        let mut budget = PointBudget::new(&[BudgetSpec::points("pool", 100)]);
        let picks = TableResolver::new(&table)
            .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(seed))
            .unwrap_or_default();

        let mut groups = std::collections::HashSet::new();
        for pick in &picks {
            let option = table.option(&pick.name).unwrap();
            prop_assert!(groups.insert(option.group_key().to_string()));
            prop_assert!(option.weight > 0.0);
        }
    }

    #[test]
    fn prop_policy_limits_hold(
        options in options_strategy(),
        policy in policy_strategy(),
        seed in any::<u64>()
    ) {
        let table = make_table(options, policy, ShortfallPolicy::Substitute);
        let mut budget = PointBudget::new(&[BudgetSpec::points("pool", 40)]);
        if let Ok(picks) = TableResolver::new(&table)
            .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(seed))
        {
            match policy {
                SelectionPolicy::ExactlyOne => prop_assert_eq!(picks.len(), 1),
                SelectionPolicy::UpToN(n) => prop_assert!(picks.len() <= n),
                SelectionPolicy::SpendAvailable => {}
            }
        }
    }

    #[test]
    fn prop_spend_available_leaves_nothing_affordable(
        options in options_strategy(),
        points in 0..=60i32,
        seed in any::<u64>()
    ) {
        let table = make_table(options, SelectionPolicy::SpendAvailable, ShortfallPolicy::Substitute);
        let mut budget = PointBudget::new(&[BudgetSpec::points("pool", points)]);
        let mut state = TraitState::new();
        let result = TableResolver::new(&table)
            .resolve(&mut budget, &mut state, &mut SeededSource::new(seed));

        if result.is_ok() {
            let left = budget.available("pool");
            for option in &table.options {
                let open = option.weight > 0.0
                    && !state.has_name(&option.name)
                    && !state.has_group(option.group_key());
                prop_assert!(!(open && option.price() <= left),
                    "'{}' costing {} is still affordable with {} left", option.name, option.cost, left);
            }
        }
    }

    #[test]
    fn prop_same_seed_same_picks(
        options in options_strategy(),
        policy in policy_strategy(),
        shortfall in shortfall_strategy(),
        seed in any::<u64>()
    ) {
        let table = make_table(options, policy, shortfall);
        let run = || {
            let mut budget = PointBudget::new(&[BudgetSpec::points("pool", 30)]);
            TableResolver::new(&table)
                .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(seed))
                .map(|picks| picks.into_iter().map(|p| p.name).collect::<Vec<_>>())
                .ok()
        };
        prop_assert_eq!(run(), run());
    }
}
