use super::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Movement scenario, fixed for the whole run.
///
/// The host passes an integer selector; anything other than 0, 1 or 2 is
/// rejected at validation time rather than running with undefined movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Scenario {
    Random,
    Optimal,
    Mechanistic,
}

impl Scenario {
    /// Label echoed back in the run parameters.
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Random => "random movement",
            Scenario::Optimal => "optimal movement",
            Scenario::Mechanistic => "evolved movement",
        }
    }
}

impl TryFrom<i32> for Scenario {
    type Error = SimError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Scenario::Random),
            1 => Ok(Scenario::Optimal),
            2 => Ok(Scenario::Mechanistic),
            other => Err(SimError::UnknownScenario(other)),
        }
    }
}

impl From<Scenario> for i32 {
    fn from(s: Scenario) -> i32 {
        match s {
            Scenario::Random => 0,
            Scenario::Optimal => 1,
            Scenario::Mechanistic => 2,
        }
    }
}

/// Run parameters for one simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub scenario: Scenario,
    pub population_size: usize,
    pub landscape_size: f32,
    pub item_count: usize,
    pub cluster_count: usize,
    /// Standard deviation of item offsets around their cluster centre.
    pub cluster_spread: f32,
    /// Ticks per generation.
    pub timesteps: usize,
    pub generations: usize,
    /// Radius for resource perception, foraging and movement steps.
    pub perception_range: f32,
    /// Ticks an agent stays busy after a successful forage.
    pub handling_time: u32,
    /// Ticks a depleted item needs before it is available again.
    pub regen_time: u32,
    pub threads: usize,
    /// Natal dispersal SD as a fraction of the landscape size.
    pub dispersal: f32,
    pub mutation_prob: f32,
    /// Scale of the Cauchy mutation kernel.
    pub mutation_size: f32,
    /// Fixed seed; a time-derived seed is used when absent.
    pub seed: Option<u64>,
    /// Founders carrying the heritable tag.
    pub tagged_agents: usize,
    /// Co-occurrence radius; defaults to `perception_range`.
    pub association_range: Option<f32>,
    /// Generation whose full movement trace is kept as the early trace.
    pub early_log_generation: usize,
    pub item_value: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            scenario: Scenario::Mechanistic,
            population_size: 100,
            landscape_size: 60.0,
            item_count: 1800,
            cluster_count: 60,
            cluster_spread: 1.0,
            timesteps: 100,
            generations: 100,
            perception_range: 1.0,
            handling_time: 5,
            regen_time: 50,
            threads: 2,
            dispersal: 0.05,
            mutation_prob: 0.01,
            mutation_size: 0.01,
            seed: None,
            tagged_agents: 0,
            association_range: None,
            early_log_generation: 2,
            item_value: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_json(&contents)
    }

    /// Parse a configuration from a JSON string. Missing fields take defaults.
    pub fn parse_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject configurations the engine cannot run. Called before any
    /// simulation state is constructed.
    pub fn validate(&self) -> Result<()> {
        if self.tagged_agents > self.population_size {
            return Err(SimError::TooManyTagged {
                tagged: self.tagged_agents,
                population: self.population_size,
            });
        }
        positive_count("population_size", self.population_size)?;
        positive_count("timesteps", self.timesteps)?;
        positive_count("generations", self.generations)?;
        positive_count("threads", self.threads)?;
        if self.item_count > 0 {
            positive_count("cluster_count", self.cluster_count)?;
        }
        positive_float("landscape_size", self.landscape_size)?;
        positive_float("perception_range", self.perception_range)?;
        non_negative("cluster_spread", self.cluster_spread)?;
        non_negative("dispersal", self.dispersal)?;
        non_negative("mutation_size", self.mutation_size)?;
        non_negative("item_value", self.item_value)?;
        if let Some(r) = self.association_range {
            positive_float("association_range", r)?;
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(SimError::InvalidParameter {
                name: "mutation_prob",
                reason: format!("{} is not a probability", self.mutation_prob),
            });
        }
        Ok(())
    }

    pub fn association_radius(&self) -> f32 {
        self.association_range.unwrap_or(self.perception_range)
    }

    /// Dispersal SD in landscape units.
    pub fn dispersal_distance(&self) -> f32 {
        self.dispersal * self.landscape_size
    }
}

fn positive_count(name: &'static str, v: usize) -> Result<()> {
    if v == 0 {
        return Err(SimError::InvalidParameter {
            name,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn positive_float(name: &'static str, v: f32) -> Result<()> {
    if !(v.is_finite() && v > 0.0) {
        return Err(SimError::InvalidParameter {
            name,
            reason: format!("{v} must be a positive finite number"),
        });
    }
    Ok(())
}

fn non_negative(name: &'static str, v: f32) -> Result<()> {
    if !(v.is_finite() && v >= 0.0) {
        return Err(SimError::InvalidParameter {
            name,
            reason: format!("{v} must be finite and non-negative"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_more_tagged_than_agents() {
        let cfg = SimulationConfig {
            population_size: 10,
            tagged_agents: 11,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimError::TooManyTagged { tagged: 11, population: 10 })
        ));
    }

    #[test]
    fn unknown_scenario_is_a_hard_error() {
        let err = SimulationConfig::parse_json(r#"{"scenario": 7}"#).unwrap_err();
        assert!(err.to_string().contains("unknown scenario"), "{err}");
        assert!(matches!(Scenario::try_from(-1), Err(SimError::UnknownScenario(-1))));
    }

    #[test]
    fn partial_json_takes_defaults() {
        let cfg = SimulationConfig::parse_json(
            r#"{"scenario": 0, "population_size": 20, "seed": 9}"#,
        )
        .unwrap();
        assert_eq!(cfg.scenario, Scenario::Random);
        assert_eq!(cfg.population_size, 20);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.timesteps, SimulationConfig::default().timesteps);
    }

    #[test]
    fn rejects_bad_probability() {
        let cfg = SimulationConfig {
            mutation_prob: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimError::InvalidParameter { name: "mutation_prob", .. })
        ));
    }

    #[test]
    fn association_radius_falls_back_to_perception() {
        let mut cfg = SimulationConfig::default();
        assert_eq!(cfg.association_radius(), cfg.perception_range);
        cfg.association_range = Some(3.0);
        assert_eq!(cfg.association_radius(), 3.0);
    }
}
