//! Data loading and validation for game content.

pub mod load;

pub use load::*;
