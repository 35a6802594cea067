//! Prerequisite parsing and evaluation module
//!
//! Prerequisites are strings like `Magery>=2 & (IQ>=13 | "Detect Magic")`,
//! parsed once at load time and checked against the character built so far.

mod ast;
pub mod cache;
mod evaluator;
pub mod parser;

#[cfg(test)]
mod property_tests;

pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use parser::*;
