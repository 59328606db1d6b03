//! Domain models for the surgery case tracker.

mod case;
mod fields;
mod tasks;

pub use case::*;
pub use fields::*;
pub use tasks::*;
