pub mod config;
pub mod error;
pub mod output;
pub mod seed;

pub use config::{Scenario, SimulationConfig};
pub use error::{Result, SimError};
pub use output::{ParameterEcho, SimulationOutput};
