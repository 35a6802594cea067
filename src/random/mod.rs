//! Random source module

mod source;

pub use source::*;
