use super::association::AssociationTracker;
use super::foraging::{Depletion, ForagingEngine};
use super::landscape::Landscape;
use super::movement::{MovementPolicy, TickContext};
use super::population::Population;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::output::{ParameterEcho, SimulationOutput};
use crate::core::seed::{run_rng, time_seed, SimRng};
use crate::evolution::{EvolutionConfig, EvolutionEngine};
use crate::utils::logger::{DataLogger, LogSchedule};
use std::time::Instant;
use tracing::{debug, info};

/// What happened to the landscape during one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub generation: usize,
    pub tick: usize,
    /// Items that came back during this tick's regeneration.
    pub restored: usize,
    /// Available items right after regeneration.
    pub available: usize,
    /// Items consumed, in commit order.
    pub depletions: Vec<Depletion>,
}

/// The orchestrator for one run: generations of ticks followed by reproduction.
pub struct Simulation {
    config: SimulationConfig,
    seed: u64,
    rng: SimRng,
    workers: rayon::ThreadPool,

    pub landscape: Landscape,
    pub population: Population,
    pub associations: AssociationTracker,
    movement: MovementPolicy,
    foraging: ForagingEngine,
    evolution: EvolutionEngine,
    logger: DataLogger,

    generation: usize,
}

impl Simulation {
    /// Validate the configuration, then lay out the landscape and founders.
    /// Nothing is allocated for an invalid configuration.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(time_seed);
        let mut rng = run_rng(seed);
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;

        let perception = config.perception_range;
        let mut landscape = Landscape::new(config.landscape_size, config.regen_time, perception);
        landscape.init_resources(
            config.cluster_count,
            config.item_count,
            config.cluster_spread,
            config.item_value,
            &mut rng,
        );

        let association_radius = config.association_radius();
        let mut population = Population::new(config.population_size, association_radius);
        population.init_founders(config.landscape_size, config.tagged_agents, &mut rng);

        info!(
            "[Simulation] {} | {} agents | {} generations x {} ticks | {} threads | seed {}",
            config.scenario.label(),
            config.population_size,
            config.generations,
            config.timesteps,
            config.threads,
            seed
        );

        let schedule = LogSchedule::new(config.generations, config.early_log_generation);
        debug!(
            "[Simulation] logging generations every {}, networks every {}",
            schedule.generation_interval, schedule.network_interval
        );

        Ok(Simulation {
            movement: MovementPolicy::for_scenario(config.scenario, perception),
            foraging: ForagingEngine::new(perception, config.handling_time),
            evolution: EvolutionEngine::new(EvolutionConfig::from(&config)),
            associations: AssociationTracker::new(association_radius),
            logger: DataLogger::new(schedule),
            config,
            seed,
            rng,
            workers,
            landscape,
            population,
            generation: 0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Index of the generation currently running.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn logger(&self) -> &DataLogger {
        &self.logger
    }

    /// Fresh counters and network for the coming generation.
    pub fn begin_generation(&mut self) {
        self.landscape.count_available();
        self.population.reset_counters();
        self.associations.reset();
    }

    /// One tick: regenerate items, move agents, record the movement trace,
    /// rebuild the agent index, forage (pick then exploit), count associations.
    ///
    /// The agent index is rebuilt after movement rather than before it.
    /// Movement never reads it, and association needs post-movement positions.
    pub fn tick(&mut self, tick: usize) -> TickReport {
        let ctx = TickContext {
            seed: self.seed,
            generation: self.generation,
            tick,
        };
        let generation = self.generation;
        let landscape = &mut self.landscape;
        let population = &mut self.population;
        let associations = &mut self.associations;
        let logger = &mut self.logger;
        let movement = self.movement;
        let foraging = self.foraging;

        self.workers.install(|| {
            let restored = landscape.regenerate();
            let available = landscape.n_available;

            movement.apply(population, landscape, ctx);
            logger.record_tick(generation, tick, population);
            population.update_grid();

            foraging.pick(population, landscape);
            let depletions = foraging.exploit(population, landscape);

            associations.count(population);

            TickReport {
                generation,
                tick,
                restored,
                available,
                depletions,
            }
        })
    }

    /// Close the generation: fitness, logs, reproduction.
    pub fn end_generation(&mut self) {
        let generation = self.generation;
        self.population.settle_energy();

        if self.logger.record_generation(generation, &self.population) {
            if let Some(record) = self.logger.generations().last() {
                info!(
                    "[Simulation] gen {}: mean intake {:.2}, mean trait {:.3}, {} lineages",
                    generation, record.mean_intake, record.mean_trait, record.lineages
                );
            }
        }
        if self.logger.record_network(generation, &self.associations) {
            info!(
                "[Simulation] gen {}: logged edge list ({} edges)",
                generation,
                self.associations.n_edges()
            );
        }

        self.evolution.reproduce(&mut self.population, &mut self.rng);
        self.generation += 1;
    }

    /// Run one full generation and return its tick reports.
    pub fn run_generation(&mut self) -> Vec<TickReport> {
        self.begin_generation();
        let reports = (0..self.config.timesteps).map(|t| self.tick(t)).collect();
        self.end_generation();
        reports
    }

    /// Run every remaining generation and hand back the logs.
    pub fn run(mut self) -> SimulationOutput {
        let start = Instant::now();
        while self.generation < self.config.generations {
            self.run_generation();
        }
        info!(
            "[Simulation] {} generations finished in {:?}",
            self.config.generations,
            start.elapsed()
        );

        let parameters = ParameterEcho::new(&self.config, self.seed);
        let (generations, edge_lists, move_early, move_final) = self.logger.finish();
        SimulationOutput {
            parameters,
            generations,
            edge_lists,
            move_early,
            move_final,
        }
    }
}
