use super::config::SimulationConfig;
use super::error::Result;
use crate::utils::logger::{GenerationRecord, MoveTrace, NetworkSnapshot};
use serde::{Deserialize, Serialize};

/// Run parameters echoed back alongside the results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterEcho {
    pub scenario: String,
    pub generations: usize,
    pub pop_size: usize,
    pub pop_density: f32,
    pub item_density: f32,
    pub dispersal: f32,
    pub seed: u64,
}

impl ParameterEcho {
    pub fn new(config: &SimulationConfig, seed: u64) -> Self {
        ParameterEcho {
            scenario: config.scenario.label().to_string(),
            generations: config.generations,
            pop_size: config.population_size,
            pop_density: config.population_size as f32 / config.landscape_size,
            item_density: config.item_count as f32 / config.landscape_size,
            dispersal: config.dispersal,
            seed,
        }
    }
}

/// Everything a finished run exposes. Read-only once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub parameters: ParameterEcho,
    pub generations: Vec<GenerationRecord>,
    pub edge_lists: Vec<NetworkSnapshot>,
    pub move_early: MoveTrace,
    pub move_final: MoveTrace,
}

impl SimulationOutput {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
