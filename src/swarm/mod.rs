//! Foraging Engine
//!
//! Agent columns (SoA), the clustered resource landscape, and the per-tick
//! phases that act on them: movement, foraging, association counting.

pub mod association;
pub mod foraging;
pub mod grid;
pub mod landscape;
pub mod movement;
pub mod population;
pub mod simulation;

#[cfg(feature = "python")]
pub mod py_api;

mod scenario_test;

pub use association::{AssociationTracker, Edge};
pub use foraging::{Depletion, ForagingEngine};
pub use grid::SpatialHashGrid;
pub use landscape::{ItemState, Landscape};
pub use movement::MovementPolicy;
pub use population::Population;
pub use simulation::{Simulation, TickReport};
