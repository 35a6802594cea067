//! dfrandom - random character generator for GURPS Dungeon Fantasy templates
//!
//! A template is a set of point budgets plus ordered choice tables. The
//! engine walks the tables with an injected random source, honouring
//! prerequisites, exclusion groups and budgets, and assembles the result into
//! a printable character sheet.

pub mod budget;
pub mod character;
pub mod config;
pub mod error;
pub mod generator;
pub mod prereq;
pub mod random;
pub mod resolver;

use std::sync::Arc;

use crate::character::Character;
use crate::config::TemplateLibrary;
use crate::error::{GeneratorError, Result};
use crate::random::{RandomSource, SeededSource};

/// Select a template and generate one character from it
pub fn generate_character<R: RandomSource>(
    library: &TemplateLibrary,
    selector: Option<&str>,
    rng: &mut R,
) -> Result<Character> {
    let template = library.select(selector, rng)?;
    generator::generate(template, rng)
}

/// Generate `count` characters on the blocking thread pool.
///
/// Each run owns its random source: `seed + index` when seeded, fresh entropy
/// otherwise. Results come back in run order; the first failure wins.
pub async fn generate_batch(
    library: Arc<TemplateLibrary>,
    selector: Option<String>,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<Character>> {
    let handles: Vec<_> = (0..count)
        .map(|index| {
            let library = Arc::clone(&library);
            let selector = selector.clone();
            let run_seed = seed.map(|s| s.wrapping_add(index as u64));
            tokio::task::spawn_blocking(move || {
                let mut rng = SeededSource::from_optional_seed(run_seed);
                generate_character(&library, selector.as_deref(), &mut rng)
            })
        })
        .collect();

    let mut characters = Vec::with_capacity(count);
    for handle in handles {
        let character = handle.await.map_err(|e| {
            GeneratorError::InternalInvariantViolation(format!("generation task panicked: {}", e))
        })??;
        characters.push(character);
    }
    Ok(characters)
}
