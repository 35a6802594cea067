//! Table resolution module
//!
//! Turns one ChoiceTable into concrete picks under a budget, honouring
//! prerequisites, exclusion groups and the table's selection policy.

mod selector;

#[cfg(test)]
mod property_tests;

pub use selector::*;
