//! Main generation engine

use crate::budget::PointBudget;
use crate::character::{assemble, derive_stats, Character, ResolvedPick, TraitState, FIXED_SOURCE};
use crate::config::{ChoiceTable, Template};
use crate::error::{GeneratorError, Result};
use crate::random::RandomSource;
use crate::resolver::TableResolver;

/// Drives one template from empty sheet to finished Character
pub struct TemplateEngine<'t> {
    template: &'t Template,
}

impl<'t> TemplateEngine<'t> {
    pub fn new(template: &'t Template) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &'t Template {
        self.template
    }

    /// Run the complete generation
    pub fn generate<R: RandomSource>(&self, rng: &mut R) -> Result<Character> {
        let template = self.template;
        let mut budget = PointBudget::new(&template.budgets);
        let mut state = TraitState::new();

        // Fixed options are pre-charged only where their category has a budget
        let mut fixed = Vec::with_capacity(template.fixed.len());
        for option in &template.fixed {
            if budget.has_category(&option.category) {
                budget.charge(&option.category, option.price()).map_err(|err| {
                    GeneratorError::InternalInvariantViolation(format!(
                        "template '{}': fixed option '{}' was refused: {}",
                        template.name, option.name, err
                    ))
                })?;
            }
            state.record(option);
            fixed.push(ResolvedPick::from_option(option, FIXED_SOURCE));
        }

        let mut picks = Vec::new();
        for table in &template.tables {
            match TableResolver::new(table).resolve(&mut budget, &mut state, rng) {
                Ok(mut resolved) => picks.append(&mut resolved),
                Err(GeneratorError::NoAffordableOption { table: name, category, .. }) => {
                    match self.apply_fallback(table, &mut budget, &mut state)? {
                        Some(pick) => picks.push(pick),
                        None => {
                            return Err(GeneratorError::NoAffordableOption {
                                template: template.name.clone(),
                                table: name,
                                category,
                            })
                        }
                    }
                }
                Err(err) => return Err(err),
            }
        }

        let derived = derive_stats(&state, fixed.iter().chain(picks.iter()));
        let character = assemble(template, &budget, fixed, picks, derived);

        log::info!(
            "generated '{}': {} traits, {} points",
            character.template,
            character.traits.len(),
            character.total_points
        );
        Ok(character)
    }

    /// Charge and record a table's fallback.
    ///
    /// `None` when the table has none, or it is held, excluded by its group,
    /// unmet or unaffordable.
    fn apply_fallback(
        &self,
        table: &ChoiceTable,
        budget: &mut PointBudget,
        state: &mut TraitState,
    ) -> Result<Option<ResolvedPick>> {
        let Some(fallback) = &table.fallback else {
            return Ok(None);
        };
        if state.has_name(&fallback.name)
            || state.has_group(fallback.group_key())
            || !fallback.prerequisite_met(state)?
        {
            log::debug!(
                "table '{}': fallback '{}' is already held or not allowed",
                table.name,
                fallback.name
            );
            return Ok(None);
        }
        if !budget.can_afford(&table.category, fallback.price()) {
            return Ok(None);
        }

        log::warn!(
            "template '{}': nothing affordable in table '{}', using fallback '{}'",
            self.template.name,
            table.name,
            fallback.name
        );
        budget
            .charge(&table.category, fallback.price())
            .map_err(|err| {
                GeneratorError::InternalInvariantViolation(format!(
                    "table '{}': affordable fallback '{}' was refused: {}",
                    table.name, fallback.name, err
                ))
            })?;
        state.record(fallback);
        Ok(Some(ResolvedPick::from_option(fallback, &table.name)))
    }
}

/// Generate one character from `template`
pub fn generate<R: RandomSource>(template: &Template, rng: &mut R) -> Result<Character> {
    TemplateEngine::new(template).generate(rng)
}
