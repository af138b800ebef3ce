//! Agent population stored as Struct-of-Arrays columns.
//!
//! Parallel phases zip `par_iter_mut` over the columns, so each worker only
//! ever writes the slots of the agent it is processing.

use super::grid::SpatialHashGrid;
use rand::Rng;

pub struct Population {
    pub n_agents: usize,

    // Position
    pub x: Vec<f32>,
    pub y: Vec<f32>,

    /// Evolvable movement trait; fixed within a generation.
    pub movement_trait: Vec<f32>,

    // Per-generation counters
    pub handling: Vec<u32>,     // ticks left busy handling a food item
    pub picks: Vec<u32>,        // successful forages
    pub intake: Vec<f32>,
    pub energy: Vec<f32>,       // intake frozen at generation end, used as fitness
    pub moved: Vec<f32>,        // distance travelled
    pub associations: Vec<u32>, // co-occurrence events

    // Lineage bookkeeping
    pub lineage: Vec<u32>,      // founder id
    pub parent: Vec<u32>,       // index of the parent in the previous generation
    pub tagged: Vec<bool>,

    /// Foraging proposals written by the pick phase.
    pub proposal: Vec<Option<u32>>,

    grid: SpatialHashGrid,
}

impl Population {
    /// `query_radius` sizes the cells of the agent index.
    pub fn new(n_agents: usize, query_radius: f32) -> Self {
        Population {
            n_agents,
            x: vec![0.0; n_agents],
            y: vec![0.0; n_agents],
            movement_trait: vec![0.0; n_agents],
            handling: vec![0; n_agents],
            picks: vec![0; n_agents],
            intake: vec![0.0; n_agents],
            energy: vec![0.0; n_agents],
            moved: vec![0.0; n_agents],
            associations: vec![0; n_agents],
            lineage: (0..n_agents as u32).collect(),
            parent: (0..n_agents as u32).collect(),
            tagged: vec![false; n_agents],
            proposal: vec![None; n_agents],
            grid: SpatialHashGrid::for_entries(n_agents, query_radius),
        }
    }

    /// Generation-0 founders: uniform positions, traits drawn from
    /// Uniform(-1, 1), the first `tagged` agents carry the tag.
    pub fn init_founders<R: Rng + ?Sized>(&mut self, landscape_size: f32, tagged: usize, rng: &mut R) {
        for i in 0..self.n_agents {
            self.x[i] = rng.gen_range(0.0..landscape_size);
            self.y[i] = rng.gen_range(0.0..landscape_size);
            self.movement_trait[i] = rng.gen_range(-1.0..1.0);
            self.tagged[i] = i < tagged;
        }
    }

    /// Rebuild the agent index from current positions.
    pub fn update_grid(&mut self) {
        self.grid.rebuild(&self.x, &self.y);
    }

    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    /// Zero everything that accumulates over a generation.
    pub fn reset_counters(&mut self) {
        self.handling.iter_mut().for_each(|v| *v = 0);
        self.picks.iter_mut().for_each(|v| *v = 0);
        self.intake.iter_mut().for_each(|v| *v = 0.0);
        self.moved.iter_mut().for_each(|v| *v = 0.0);
        self.associations.iter_mut().for_each(|v| *v = 0);
        self.proposal.iter_mut().for_each(|p| *p = None);
    }

    /// Freeze this generation's intake as reproductive fitness.
    pub fn settle_energy(&mut self) {
        self.energy.copy_from_slice(&self.intake);
    }

    pub fn total_intake(&self) -> f32 {
        self.intake.iter().sum()
    }

    pub fn tagged_count(&self) -> usize {
        self.tagged.iter().filter(|&&t| t).count()
    }

    /// Number of distinct founder lineages still present.
    pub fn lineage_count(&self) -> usize {
        let mut ids = self.lineage.clone();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed::run_rng;

    #[test]
    fn founders_are_in_bounds_and_tagged_in_order() {
        let mut pop = Population::new(30, 1.0);
        pop.init_founders(5.0, 4, &mut run_rng(3));
        assert!(pop.x.iter().chain(pop.y.iter()).all(|&v| (0.0..5.0).contains(&v)));
        assert!(pop.movement_trait.iter().all(|&t| (-1.0..1.0).contains(&t)));
        assert_eq!(pop.tagged_count(), 4);
        assert!(pop.tagged[..4].iter().all(|&t| t));
        assert_eq!(pop.lineage_count(), 30);
    }

    #[test]
    fn settle_energy_copies_intake() {
        let mut pop = Population::new(3, 1.0);
        pop.intake = vec![1.0, 0.0, 2.5];
        pop.settle_energy();
        assert_eq!(pop.energy, vec![1.0, 0.0, 2.5]);
        pop.reset_counters();
        assert_eq!(pop.total_intake(), 0.0);
        assert_eq!(pop.energy, vec![1.0, 0.0, 2.5]);
    }
}
