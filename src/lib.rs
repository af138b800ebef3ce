//! Forage Core - evolving foragers on clustered landscapes
//!
//! Agents compete for regenerating resource items, move by one of three
//! policies (random, greedy, or an evolving mechanistic trait) and
//! reproduce in proportion to what they ate. Spatial co-occurrence between
//! agents is recorded as a weighted association network.

pub mod core;
pub mod evolution;
pub mod swarm;
pub mod utils;

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub use crate::core::config::{Scenario, SimulationConfig};
pub use crate::core::error::{Result, SimError};
pub use crate::core::output::{ParameterEcho, SimulationOutput};
pub use evolution::{EvolutionConfig, EvolutionEngine};
pub use swarm::{Landscape, MovementPolicy, Population, Simulation};
pub use utils::logger::{DataLogger, GenerationRecord, MoveTrace, NetworkSnapshot};

/// Validate `config`, run every generation and return the logs.
pub fn run_simulation(config: SimulationConfig) -> Result<SimulationOutput> {
    Ok(Simulation::new(config)?.run())
}

/// Initialize tracing for the library.
#[cfg_attr(feature = "python", pyfunction)]
pub fn setup_logging(level: Option<String>) {
    let filter = level.unwrap_or_else(|| "info".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Python module initialization
#[cfg(feature = "python")]
#[pymodule]
fn forage_core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(swarm::py_api::run_simulation, m)?)?;
    m.add_function(wrap_pyfunction!(swarm::py_api::default_config, m)?)?;
    m.add_function(wrap_pyfunction!(setup_logging, m)?)?;
    Ok(())
}
