use super::simulation::Simulation;
use crate::core::config::SimulationConfig;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Run a full simulation from a JSON configuration and return the JSON result.
/// The GIL is released while the engine runs.
#[pyfunction]
#[pyo3(signature = (config_json, pretty = false))]
pub fn run_simulation(py: Python<'_>, config_json: &str, pretty: bool) -> PyResult<String> {
    let config = SimulationConfig::parse_json(config_json)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    py.allow_threads(|| {
        let output = Simulation::new(config)?.run();
        output.to_json(pretty)
    })
    .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Default configuration as JSON, for callers that want to tweak a few fields.
#[pyfunction]
pub fn default_config() -> PyResult<String> {
    serde_json::to_string_pretty(&SimulationConfig::default())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}
