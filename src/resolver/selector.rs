//! Table resolution

use ahash::{AHashMap, AHashSet};

use crate::budget::PointBudget;
use crate::character::{ResolvedPick, TraitState};
use crate::config::{ChoiceTable, SelectionPolicy, ShortfallPolicy, TraitOption};
use crate::error::{GeneratorError, Result};
use crate::random::RandomSource;

/// Exclusion group still open for drawing
#[derive(Debug)]
struct CandidateGroup<'t> {
    key: &'t str,
    tiers: Vec<&'t TraitOption>,
}

impl CandidateGroup<'_> {
    /// Mean weight of the tiers, so long level ladders don't crowd out single traits
    fn weight(&self) -> f64 {
        if self.tiers.is_empty() {
            return 0.0;
        }
        self.tiers.iter().map(|t| t.weight).sum::<f64>() / self.tiers.len() as f64
    }
}

/// Resolves one ChoiceTable into picks
pub struct TableResolver<'t> {
    table: &'t ChoiceTable,
}

impl<'t> TableResolver<'t> {
    pub fn new(table: &'t ChoiceTable) -> Self {
        Self { table }
    }

    /// Draw picks until the policy is satisfied or nothing is left to draw.
    ///
    /// Picks are charged to `budget` and recorded into `state` as they are
    /// made, so later draws of the same table see them.
    pub fn resolve<R: RandomSource>(
        &self,
        budget: &mut PointBudget,
        state: &mut TraitState,
        rng: &mut R,
    ) -> Result<Vec<ResolvedPick>> {
        let table = self.table;
        let category = table.category.as_str();

        let (limit, required) = match table.policy {
            SelectionPolicy::ExactlyOne => (1, true),
            SelectionPolicy::UpToN(n) => (n, false),
            SelectionPolicy::SpendAvailable => (usize::MAX, budget.available(category) > 0),
        };

        let mut picks = Vec::new();
        let mut discarded: AHashSet<&str> = AHashSet::new();

        while picks.len() < limit {
            let groups = self.candidate_groups(budget, state, &discarded)?;
            let Some(index) = rng.choose_weighted_index(groups.iter().map(CandidateGroup::weight))
            else {
                break;
            };
            let group = &groups[index];

            let Some(tier) = rng.choose_weighted_index(group.tiers.iter().map(|t| t.weight)) else {
                break;
            };
            let option = group.tiers[tier];

            if !budget.can_afford(category, option.price()) {
                // Only reachable under the skip policy
                log::debug!(
                    "table '{}': drew '{}' ({}) with {} left, dropping group '{}'",
                    table.name,
                    option.name,
                    option.cost,
                    budget.available(category),
                    group.key
                );
                discarded.insert(group.key);
                continue;
            }

            budget.charge(category, option.price()).map_err(|err| {
                GeneratorError::InternalInvariantViolation(format!(
                    "table '{}': pre-filtered pick '{}' was refused: {}",
                    table.name, option.name, err
                ))
            })?;
            state.record(option);
            log::debug!(
                "table '{}': picked '{}' [{}], {} left in '{}'",
                table.name,
                option.name,
                option.cost,
                budget.available(category),
                category
            );
            picks.push(ResolvedPick::from_option(option, &table.name));
        }

        if picks.is_empty() && required {
            return Err(GeneratorError::NoAffordableOption {
                template: String::new(),
                table: table.name.clone(),
                category: category.to_string(),
            });
        }

        Ok(picks)
    }

    /// Open exclusion groups in table order, each with its drawable tiers
    fn candidate_groups(
        &self,
        budget: &PointBudget,
        state: &TraitState,
        discarded: &AHashSet<&str>,
    ) -> Result<Vec<CandidateGroup<'t>>> {
        let table = self.table;
        let available = budget.available(&table.category);
        let skip = table.shortfall == ShortfallPolicy::Skip;

        let mut groups: Vec<CandidateGroup<'t>> = Vec::new();
        let mut positions: AHashMap<&str, usize> = AHashMap::new();

        for option in &table.options {
            let key = option.group_key();
            if option.weight <= 0.0
                || discarded.contains(key)
                || state.has_name(&option.name)
                || state.has_group(key)
            {
                continue;
            }
            if !skip && option.price() > available {
                continue;
            }
            if !option.prerequisite_met(state)? {
                continue;
            }

            let position = *positions.entry(key).or_insert_with(|| {
                groups.push(CandidateGroup {
                    key,
                    tiers: Vec::new(),
                });
                groups.len() - 1
            });
            groups[position].tiers.push(option);
        }

        if skip {
            groups.retain(|g| g.tiers.iter().any(|t| t.price() <= available));
        }

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BudgetSpec;
    use crate::prereq::get_or_parse;
    use crate::random::SeededSource;

    fn option(name: &str, cost: i32) -> TraitOption {
        let mut option = TraitOption::new(name, cost);
        option.category = "skills".to_string();
        option
    }

    fn table(policy: SelectionPolicy, options: Vec<TraitOption>) -> ChoiceTable {
        ChoiceTable {
            name: "test table".to_string(),
            category: "skills".to_string(),
            policy,
            shortfall: ShortfallPolicy::Substitute,
            options,
            fallback: None,
        }
    }

    fn costs(picks: &[ResolvedPick]) -> Vec<i32> {
        let mut costs: Vec<i32> = picks.iter().map(|p| p.cost).collect();
        costs.sort();
        costs
    }

    #[test]
    fn test_spend_available_fighter_skills() {
        let table = table(
            SelectionPolicy::SpendAvailable,
            vec![option("Axe/Mace", 4), option("Shield", 8), option("Wrestling", 20)],
        );
        for seed in 0..50 {
            let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 20)]);
            let mut state = TraitState::new();
            let mut rng = SeededSource::new(seed);
            let picks = TableResolver::new(&table)
                .resolve(&mut budget, &mut state, &mut rng)
                .unwrap();

            let spent: i32 = picks.iter().map(|p| p.cost).sum();
            assert!(spent <= 20);
            let outcome = costs(&picks);
            assert!(outcome == vec![20] || outcome == vec![4, 8], "seed {}: {:?}", seed, outcome);
            assert_eq!(budget.available("skills"), (20 - spent) as u32);
        }
    }

    #[test]
    fn test_exactly_one() {
        let table = table(
            SelectionPolicy::ExactlyOne,
            vec![option("Axe/Mace", 4), option("Broadsword", 4), option("Spear", 4)],
        );
        let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 20)]);
        let mut state = TraitState::new();
        let picks = TableResolver::new(&table)
            .resolve(&mut budget, &mut state, &mut SeededSource::new(7))
            .unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].source, "test table");
        assert!(state.has_name(&picks[0].name));
        assert_eq!(budget.available("skills"), 16);
    }

    #[test]
    fn test_up_to_n_respects_limit() {
        let options = (0..10).map(|i| option(&format!("Skill {}", i), 1)).collect();
        let table = table(SelectionPolicy::UpToN(3), options);
        let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 20)]);
        let picks = TableResolver::new(&table)
            .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(3))
            .unwrap();
        assert_eq!(picks.len(), 3);
    }

    #[test]
    fn test_up_to_n_may_pick_nothing() {
        let table = table(SelectionPolicy::UpToN(2), vec![option("Wrestling", 20)]);
        let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 5)]);
        let picks = TableResolver::new(&table)
            .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(3))
            .unwrap();
        assert!(picks.is_empty());
    }

    #[test]
    fn test_drained_budget_fails_required_table() {
        let table = table(SelectionPolicy::ExactlyOne, vec![option("Axe/Mace", 4)]);
        let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 20)]);
        budget.charge("skills", 18).unwrap();

        let err = TableResolver::new(&table)
            .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(1))
            .unwrap_err();
        match err {
            GeneratorError::NoAffordableOption { table, category, .. } => {
                assert_eq!(table, "test table");
                assert_eq!(category, "skills");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(budget.available("skills"), 2);
    }

    #[test]
    fn test_spend_available_with_empty_budget_is_not_required() {
        let table = table(SelectionPolicy::SpendAvailable, vec![option("Axe/Mace", 4)]);
        let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 4)]);
        budget.charge("skills", 4).unwrap();
        let picks = TableResolver::new(&table)
            .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(1))
            .unwrap();
        assert!(picks.is_empty());
    }

    #[test]
    fn test_exclusion_group_single_tier() {
        let mut options = Vec::new();
        for (name, cost) in [("Fit", 5), ("Very Fit", 15)] {
            let mut o = option(name, cost);
            o.group = Some("fitness".to_string());
            options.push(o);
        }
        options.push(option("Luck", 15));
        let table = table(SelectionPolicy::SpendAvailable, options);

        for seed in 0..30 {
            let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 40)]);
            let picks = TableResolver::new(&table)
                .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(seed))
                .unwrap();
            let fitness = picks.iter().filter(|p| p.name.contains("Fit")).count();
            assert_eq!(fitness, 1, "seed {}", seed);
        }
    }

    #[test]
    fn test_group_used_by_earlier_table_is_excluded() {
        let mut fit = option("Fit", 5);
        fit.group = Some("fitness".to_string());
        let mut very_fit = option("Very Fit", 15);
        very_fit.group = Some("fitness".to_string());

        let mut state = TraitState::new();
        state.record(&fit);

        let table = table(SelectionPolicy::UpToN(1), vec![very_fit]);
        let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 40)]);
        let picks = TableResolver::new(&table)
            .resolve(&mut budget, &mut state, &mut SeededSource::new(1))
            .unwrap();
        assert!(picks.is_empty());
    }

    #[test]
    fn test_prerequisite_satisfied_within_table() {
        let magery = option("Magery 1", 10);
        let mut fireball = option("Fireball", 1);
        fireball.prerequisite = Some("Magery>=1".to_string());
        fireball.requirement = Some(get_or_parse("Magery>=1").unwrap());
        let table = table(SelectionPolicy::SpendAvailable, vec![fireball, magery]);

        for seed in 0..20 {
            let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 11)]);
            let picks = TableResolver::new(&table)
                .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(seed))
                .unwrap();
            let names: Vec<&str> = picks.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["Magery 1", "Fireball"]);
        }
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let mut never = option("Never", 1);
        never.weight = 0.0;
        let table = table(SelectionPolicy::SpendAvailable, vec![never, option("Always", 1)]);
        let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 10)]);
        let picks = TableResolver::new(&table)
            .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(9))
            .unwrap();
        let names: Vec<&str> = picks.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Always"]);
    }

    #[test]
    fn test_negative_costs_charge_magnitude() {
        let mut table = table(
            SelectionPolicy::SpendAvailable,
            vec![option("Greed (12)", -15), option("Honesty (12)", -10)],
        );
        table.category = "disadvantages".to_string();
        let mut budget = PointBudget::new(&[BudgetSpec::points("disadvantages", -25)]);
        let picks = TableResolver::new(&table)
            .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(2))
            .unwrap();
        assert_eq!(costs(&picks), vec![-15, -10]);
        assert_eq!(budget.available("disadvantages"), 0);
    }

    #[test]
    fn test_skip_drops_group_on_unaffordable_tier() {
        let mut options = Vec::new();
        for level in 1..=3 {
            let mut o = option(&format!("Weapon Master {}", level), 20 * level);
            o.group = Some("Weapon Master".to_string());
            options.push(o);
        }
        let mut table = table(SelectionPolicy::SpendAvailable, options);
        table.shortfall = ShortfallPolicy::Skip;

        let mut dropped = 0;
        for seed in 0..60 {
            let mut budget = PointBudget::new(&[BudgetSpec::points("skills", 25)]);
            let picks = TableResolver::new(&table)
                .resolve(&mut budget, &mut TraitState::new(), &mut SeededSource::new(seed))
                .unwrap_or_default();
            match picks.as_slice() {
                [] => dropped += 1,
                [pick] => assert_eq!(pick.name, "Weapon Master 1"),
                other => panic!("unexpected picks {:?}", other),
            }
        }
        // Two of three tiers are out of reach
        assert!(dropped > 20 && dropped < 60, "dropped {}", dropped);
    }
}
