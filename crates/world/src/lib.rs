//! Resource chicken laying core.
//!
//! Everything here talks to the game through the [`Engine`] trait and keeps
//! no state between calls beyond what is persisted as entity properties.

#![warn(missing_docs)]

mod creature;
mod drop_table;
mod engine;
mod error;
mod feeding;
mod registry;
pub mod sampler;
mod scheduler;
mod timer;
mod variant;

pub use creature::*;
pub use drop_table::*;
pub use engine::*;
pub use error::*;
pub use feeding::*;
pub use registry::*;
pub use scheduler::*;
pub use timer::*;
pub use variant::*;
