//! Template-driven character generation

mod engine;


pub use engine::*;
