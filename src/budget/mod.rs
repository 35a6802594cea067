//! Point budget module

mod ledger;


pub use ledger::*;
