//! Reproduction Engine
//!
//! Replaces the whole population at the end of a generation. Parents are
//! drawn with probability proportional to their energy (this generation's
//! intake); offspring inherit the movement trait, mutate it with a Cauchy
//! kernel and start near where their parent finished.

use super::EvolutionConfig;
use crate::swarm::landscape::wrap_coord;
use crate::swarm::population::Population;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_distr::{Cauchy, Normal};
use tracing::{debug, info};

/// Darwinian replacement of the foraging population
pub struct EvolutionEngine {
    config: EvolutionConfig,
    mutation: Option<Cauchy<f32>>,
    dispersal: Option<Normal<f32>>,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig) -> Self {
        let mutation = Cauchy::new(0.0, config.mutation_size).ok();
        let dispersal = Normal::new(0.0, config.dispersal_sd).ok();
        info!(
            "[Evolution] mutation p={:.3} scale={:.3}, dispersal sd={:.3}",
            config.mutation_prob, config.mutation_size, config.dispersal_sd
        );
        EvolutionEngine {
            config,
            mutation,
            dispersal,
        }
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Draw `n` parent indices proportionally to `energy`. If nobody has
    /// any energy, every agent is equally likely.
    pub fn select_parents<R: Rng + ?Sized>(&self, energy: &[f32], n: usize, rng: &mut R) -> Vec<usize> {
        if energy.is_empty() {
            return Vec::new();
        }
        match WeightedIndex::new(energy) {
            Ok(roulette) => (0..n).map(|_| roulette.sample(rng)).collect(),
            Err(err) => {
                debug!("[Evolution] uniform parent draw ({})", err);
                (0..n).map(|_| rng.gen_range(0..energy.len())).collect()
            }
        }
    }

    /// Offspring trait: the parent's, perturbed with probability `mutation_prob`.
    pub fn mutate<R: Rng + ?Sized>(&self, parent_trait: f32, rng: &mut R) -> f32 {
        if rng.gen::<f32>() < self.config.mutation_prob {
            if let Some(kernel) = &self.mutation {
                return parent_trait + kernel.sample(rng);
            }
        }
        parent_trait
    }

    /// Replace `pop` with the next generation. Counters start from zero.
    pub fn reproduce<R: Rng + ?Sized>(&self, pop: &mut Population, rng: &mut R) {
        let n = pop.n_agents;
        let size = self.config.landscape_size;
        let parents = self.select_parents(&pop.energy, n, rng);

        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        let mut movement_trait = Vec::with_capacity(n);
        let mut lineage = Vec::with_capacity(n);
        let mut tagged = Vec::with_capacity(n);

        for &p in &parents {
            let (dx, dy) = match &self.dispersal {
                Some(kernel) => (kernel.sample(rng), kernel.sample(rng)),
                None => (0.0, 0.0),
            };
            x.push(wrap_coord(pop.x[p] + dx, size));
            y.push(wrap_coord(pop.y[p] + dy, size));
            movement_trait.push(self.mutate(pop.movement_trait[p], rng));
            lineage.push(pop.lineage[p]);
            tagged.push(pop.tagged[p]);
        }

        pop.x = x;
        pop.y = y;
        pop.movement_trait = movement_trait;
        pop.lineage = lineage;
        pop.tagged = tagged;
        pop.parent = parents.iter().map(|&p| p as u32).collect();
        pop.energy.iter_mut().for_each(|e| *e = 0.0);
        pop.reset_counters();
    }
}
