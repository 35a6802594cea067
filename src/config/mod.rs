//! Template data: structures, loading, expansion and validation
//!
//! Data is read from JSON once, expanded (groups, levels, self-control tiers,
//! includes), validated, and then shared read-only between runs.

mod expand;
mod option;
mod table;
mod template;
mod validate;

pub use expand::*;
pub use option::*;
pub use table::*;
pub use template::*;
pub use validate::*;

use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;

use crate::error::{GeneratorError, Result};
use crate::random::RandomSource;

/// Selector meaning "any template"
pub const RANDOM_SELECTOR: &str = "random";

static BUILTIN_DATA: &str = include_str!("../../data/templates.json");

static BUILTIN: OnceCell<Arc<TemplateLibrary>> = OnceCell::new();

/// Validated set of templates, sorted by name
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub fn from_json(text: &str) -> Result<Self> {
        let file: TemplateFile = serde_json::from_str(text)?;
        if file.version != DATA_VERSION {
            return Err(GeneratorError::Deserialization(format!(
                "unsupported template data version {} (expected {})",
                file.version, DATA_VERSION
            )));
        }

        let mut templates = file
            .templates
            .into_iter()
            .map(expand_template)
            .collect::<Result<Vec<_>>>()?;
        validate_templates(&templates)?;
        templates.sort_by(|a, b| a.name.cmp(&b.name));

        log::debug!("loaded {} templates", templates.len());
        Ok(Self { templates })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Library embedded in the binary, parsed on first use
    pub fn builtin() -> Result<Arc<Self>> {
        BUILTIN
            .get_or_try_init(|| Self::from_json(BUILTIN_DATA).map(Arc::new))
            .cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    /// Every accepted `--template` value
    pub fn valid_selectors(&self) -> Vec<String> {
        self.templates
            .iter()
            .map(|t| t.name.clone())
            .chain(std::iter::once(RANDOM_SELECTOR.to_string()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        let name = name.trim();
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Confirm a selector names a template or `random`
    pub fn check_selector(&self, selector: Option<&str>) -> Result<()> {
        match selector.map(str::trim) {
            Some(s) if !s.eq_ignore_ascii_case(RANDOM_SELECTOR) && self.get(s).is_none() => {
                Err(GeneratorError::InvalidSelector {
                    selector: s.to_string(),
                    valid: self.valid_selectors(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Resolve a selector: absent or `random` picks uniformly
    pub fn select<R: RandomSource>(&self, selector: Option<&str>, rng: &mut R) -> Result<&Template> {
        match selector.map(str::trim) {
            None => self.choose(rng),
            Some(s) if s.eq_ignore_ascii_case(RANDOM_SELECTOR) => self.choose(rng),
            Some(s) => self.get(s).ok_or_else(|| GeneratorError::InvalidSelector {
                selector: s.to_string(),
                valid: self.valid_selectors(),
            }),
        }
    }

    fn choose<R: RandomSource>(&self, rng: &mut R) -> Result<&Template> {
        rng.choose_uniform(&self.templates).ok_or_else(|| {
            GeneratorError::InternalInvariantViolation("template library is empty".to_string())
        })
    }
}
