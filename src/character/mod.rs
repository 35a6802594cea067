//! Character state, derived statistics and assembly

mod assembler;
mod attribute;
mod derived;
mod pick;
pub mod render;
mod state;

pub use assembler::*;
pub use attribute::*;
pub use derived::*;
pub use pick::*;
pub use render::*;
pub use state::*;
