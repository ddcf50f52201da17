//! Turn resolution and effect engine for the orchard grid puzzle. Keep this
//! crate free of IO and presentation concerns; the presentation drains
//! events and reports animation completion.

pub mod catalog;
pub mod config;
pub mod economy;
pub mod effects;
pub mod events;
pub mod grid;
pub mod inventory;
pub mod relocation;
pub mod resolver;
pub mod rng;
pub mod run;
pub mod symbol;

pub use catalog::*;
pub use config::*;
pub use economy::*;
pub use effects::*;
pub use events::*;
pub use grid::*;
pub use inventory::*;
pub use relocation::*;
pub use resolver::*;
pub use rng::*;
pub use run::*;
pub use symbol::*;
