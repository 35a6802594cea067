//! Prerequisite parsing cache

use crate::character::TraitState;
use crate::error::Result;
use crate::prereq::ast::PrereqNode;
use crate::prereq::parser;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Global prerequisite cache; template data repeats the same expressions often
static PREREQ_CACHE: Lazy<RwLock<AHashMap<String, PrereqNode>>> = Lazy::new(|| {
    let map = AHashMap::with_capacity(512);
    RwLock::new(map)
});

/// Get or parse a prerequisite string, using cache for repeated expressions
#[inline]
pub fn get_or_parse(prerequisite: &str) -> Result<PrereqNode> {
    {
        let cache = PREREQ_CACHE.read();
        if let Some(ast) = cache.get(prerequisite) {
            return Ok(ast.clone());
        }
    }

    let ast = parser::parse(prerequisite)?;

    {
        let mut cache = PREREQ_CACHE.write();
        cache.insert(prerequisite.to_string(), ast.clone());
    }

    Ok(ast)
}

/// Check a prerequisite string against a TraitState, using cached AST
#[inline]
pub fn check_prerequisite(prerequisite: &str, state: &TraitState) -> Result<bool> {
    if prerequisite.trim().is_empty() {
        return Ok(true);
    }

    let ast = get_or_parse(prerequisite)?;
    Ok(crate::prereq::evaluator::check(&ast, state))
}

/// Number of cached expressions
#[allow(dead_code)]
pub fn cache_size() -> usize {
    PREREQ_CACHE.read().len()
}
