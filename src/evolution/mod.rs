//! Evolution Layer
//!
//! Generational replacement of the foraging population:
//! 1. Fitness-proportional (roulette) parent selection on resource intake
//! 2. Heavy-tailed (Cauchy) mutation of the movement trait
//! 3. Local natal dispersal around the parent's final position

pub mod reproduction;

use crate::core::config::SimulationConfig;
use serde::{Deserialize, Serialize};

pub use reproduction::EvolutionEngine;

/// Configuration for reproduction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub mutation_prob: f32,
    /// Cauchy scale of trait mutations.
    pub mutation_size: f32,
    /// Natal dispersal SD in landscape units.
    pub dispersal_sd: f32,
    pub landscape_size: f32,
}

impl EvolutionConfig {
    pub fn new(mutation_prob: f32, mutation_size: f32, dispersal_sd: f32, landscape_size: f32) -> Self {
        EvolutionConfig {
            mutation_prob,
            mutation_size,
            dispersal_sd,
            landscape_size,
        }
    }
}

impl From<&SimulationConfig> for EvolutionConfig {
    fn from(cfg: &SimulationConfig) -> Self {
        Self::new(
            cfg.mutation_prob,
            cfg.mutation_size,
            cfg.dispersal_distance(),
            cfg.landscape_size,
        )
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}
