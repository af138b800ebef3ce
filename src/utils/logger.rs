//! Sparse data logging.
//!
//! Three append-only logs, each on its own schedule:
//! - generation records (traits, intake, per-agent rows) every
//!   `generation_interval` generations and on the last one,
//! - full per-tick movement traces for one early and the final generation,
//! - association edge lists at generation 0, every tenth of the run and the
//!   last generation.

use crate::swarm::association::{AssociationTracker, Edge};
use crate::swarm::population::Population;
use serde::{Deserialize, Serialize};

/// One agent's row in a generation record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: u32,
    pub movement_trait: f32,
    pub intake: f32,
    pub energy: f32,
    pub picks: u32,
    pub moved: f32,
    pub associations: u32,
    pub lineage: u32,
    pub tagged: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub mean_trait: f32,
    pub trait_variance: f32,
    pub mean_intake: f32,
    pub total_intake: f32,
    pub lineages: usize,
    pub tagged: usize,
    pub agents: Vec<AgentRecord>,
}

impl GenerationRecord {
    pub fn capture(generation: usize, pop: &Population) -> Self {
        let n = pop.n_agents.max(1) as f32;
        let mean_trait = pop.movement_trait.iter().sum::<f32>() / n;
        let trait_variance = pop
            .movement_trait
            .iter()
            .map(|t| (t - mean_trait).powi(2))
            .sum::<f32>()
            / n;
        let total_intake = pop.total_intake();

        let agents = (0..pop.n_agents)
            .map(|i| AgentRecord {
                id: i as u32,
                movement_trait: pop.movement_trait[i],
                intake: pop.intake[i],
                energy: pop.energy[i],
                picks: pop.picks[i],
                moved: pop.moved[i],
                associations: pop.associations[i],
                lineage: pop.lineage[i],
                tagged: pop.tagged[i],
            })
            .collect();

        GenerationRecord {
            generation,
            mean_trait,
            trait_variance,
            mean_intake: total_intake / n,
            total_intake,
            lineages: pop.lineage_count(),
            tagged: pop.tagged_count(),
            agents,
        }
    }
}

/// Position and state of one agent at one tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentPosition {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub intake: f32,
    pub handling: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveFrame {
    pub tick: usize,
    pub agents: Vec<AgentPosition>,
}

/// Tick-indexed positions for a whole generation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveTrace {
    pub generation: Option<usize>,
    pub frames: Vec<MoveFrame>,
}

impl MoveTrace {
    fn push(&mut self, generation: usize, tick: usize, pop: &Population) {
        self.generation = Some(generation);
        let agents = (0..pop.n_agents)
            .map(|i| AgentPosition {
                id: i as u32,
                x: pop.x[i],
                y: pop.y[i],
                intake: pop.intake[i],
                handling: pop.handling[i] > 0,
            })
            .collect();
        self.frames.push(MoveFrame { tick, agents });
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub generation: usize,
    pub edges: Vec<Edge>,
}

/// Which generations each log samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogSchedule {
    pub generation_interval: usize,
    pub network_interval: usize,
    pub early_generation: usize,
    pub last_generation: usize,
}

impl LogSchedule {
    pub fn new(generations: usize, early_generation: usize) -> Self {
        let last_generation = generations.saturating_sub(1);
        LogSchedule {
            generation_interval: ((generations as f64 * 0.001) as usize).max(2),
            network_interval: (generations / 10).max(1),
            early_generation: early_generation.min(last_generation),
            last_generation,
        }
    }

    pub fn logs_generation(&self, generation: usize) -> bool {
        generation == self.last_generation || generation % self.generation_interval == 0
    }

    pub fn logs_network(&self, generation: usize) -> bool {
        generation == 0 || generation == self.last_generation || generation % self.network_interval == 0
    }

    pub fn traces_movement(&self, generation: usize) -> bool {
        generation == self.early_generation || generation == self.last_generation
    }
}

pub struct DataLogger {
    pub schedule: LogSchedule,
    generations: Vec<GenerationRecord>,
    networks: Vec<NetworkSnapshot>,
    move_early: MoveTrace,
    move_final: MoveTrace,
}

impl DataLogger {
    pub fn new(schedule: LogSchedule) -> Self {
        DataLogger {
            schedule,
            generations: Vec::new(),
            networks: Vec::new(),
            move_early: MoveTrace::default(),
            move_final: MoveTrace::default(),
        }
    }

    /// Snapshot positions after movement, if this generation is traced.
    pub fn record_tick(&mut self, generation: usize, tick: usize, pop: &Population) {
        if !self.schedule.traces_movement(generation) {
            return;
        }
        if generation == self.schedule.early_generation {
            self.move_early.push(generation, tick, pop);
        }
        if generation == self.schedule.last_generation {
            self.move_final.push(generation, tick, pop);
        }
    }

    /// Append a generation record if scheduled. Returns whether it was kept.
    pub fn record_generation(&mut self, generation: usize, pop: &Population) -> bool {
        if !self.schedule.logs_generation(generation) {
            return false;
        }
        self.generations.push(GenerationRecord::capture(generation, pop));
        true
    }

    /// Append the generation's edge list if scheduled.
    pub fn record_network(&mut self, generation: usize, tracker: &AssociationTracker) -> bool {
        if !self.schedule.logs_network(generation) {
            return false;
        }
        self.networks.push(NetworkSnapshot {
            generation,
            edges: tracker.edge_list(),
        });
        true
    }

    pub fn generations(&self) -> &[GenerationRecord] {
        &self.generations
    }

    pub fn networks(&self) -> &[NetworkSnapshot] {
        &self.networks
    }

    /// Hand over the logs once the run is over.
    pub fn finish(self) -> (Vec<GenerationRecord>, Vec<NetworkSnapshot>, MoveTrace, MoveTrace) {
        (self.generations, self.networks, self.move_early, self.move_final)
    }
}
