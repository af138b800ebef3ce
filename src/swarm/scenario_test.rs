//! End-to-end scenario runs through the full generation loop.
//!
//! Run the timing case with: cargo test --release -- --nocapture --ignored

#[cfg(test)]
mod tests {
    use crate::core::config::{Scenario, SimulationConfig};
    use crate::core::error::SimError;
    use crate::swarm::simulation::{Simulation, TickReport};
    use std::collections::HashSet;
    use std::time::Instant;

    fn small_config(scenario: Scenario) -> SimulationConfig {
        SimulationConfig {
            scenario,
            population_size: 20,
            landscape_size: 10.0,
            item_count: 50,
            cluster_count: 1,
            cluster_spread: 1.0,
            timesteps: 20,
            generations: 5,
            regen_time: 50,
            threads: 2,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn random_scenario_logs_on_schedule() {
        let cfg = small_config(Scenario::Random);
        let output = Simulation::new(cfg.clone()).unwrap().run();

        let logged: Vec<usize> = output.generations.iter().map(|r| r.generation).collect();
        assert_eq!(logged, vec![0, 2, 4]);
        for record in &output.generations {
            assert_eq!(record.agents.len(), cfg.population_size);
        }
        assert_eq!(output.edge_lists.len(), 5);
        assert_eq!(output.move_early.generation, Some(2));
        assert_eq!(output.move_early.frames.len(), cfg.timesteps);
        assert_eq!(output.move_final.generation, Some(4));

        assert_eq!(output.parameters.scenario, "random movement");
        assert_eq!(output.parameters.pop_size, 20);
        assert!((output.parameters.pop_density - 2.0).abs() < 1e-6);
        assert!((output.parameters.item_density - 5.0).abs() < 1e-6);
        assert_eq!(output.parameters.seed, 42);
    }

    #[test]
    fn no_item_is_consumed_twice_while_depleted() {
        let cfg = small_config(Scenario::Optimal);
        let mut sim = Simulation::new(cfg).unwrap();
        sim.begin_generation();
        let mut eaten = HashSet::new();
        for t in 0..20 {
            let report = sim.tick(t);
            for d in &report.depletions {
                assert!(eaten.insert(d.item), "item {} consumed twice", d.item);
            }
            let cached = sim.landscape.n_available;
            assert_eq!(cached, sim.landscape.count_available(), "stale count at tick {t}");
            assert_eq!(
                sim.landscape.count_available() + sim.landscape.count_regenerating(),
                sim.landscape.len()
            );
            assert_eq!(sim.landscape.count_regenerating(), eaten.len());
        }
        assert_eq!(sim.population.total_intake(), eaten.len() as f32);
    }

    #[test]
    fn intake_never_exceeds_value_on_offer_each_generation() {
        let cfg = SimulationConfig {
            regen_time: 5,
            item_value: 2.0,
            generations: 4,
            ..small_config(Scenario::Optimal)
        };
        let mut sim = Simulation::new(cfg).unwrap();
        assert_eq!(sim.seed(), 42);
        assert_eq!(sim.config().regen_time, 5);

        let mut restored_total = 0;
        for _ in 0..4 {
            sim.begin_generation();
            let on_offer = sim.landscape.available_value();
            assert!(on_offer <= sim.landscape.total_value());

            let mut regrown = 0.0;
            let mut eaten = 0;
            for t in 0..sim.config().timesteps {
                let before = sim.landscape.n_available;
                let report = sim.tick(t);
                assert_eq!(report.available, before + report.restored);
                regrown += report.restored as f32 * 2.0;
                restored_total += report.restored;
                eaten += report.depletions.len();
            }

            let intake = sim.population.total_intake();
            assert_eq!(intake, eaten as f32 * 2.0);
            assert!(
                intake <= on_offer + regrown + 1e-3,
                "gen {}: intake {intake} > {on_offer} on offer + {regrown} regrown",
                sim.generation()
            );
            sim.end_generation();
        }
        assert!(restored_total > 0, "nothing regrew, the bound was never exercised");
        assert_eq!(sim.logger().networks().len(), 4);
        assert_eq!(sim.logger().generations().len(), 3); // 0, 2 and the last
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let run = |threads: usize| -> (Vec<TickReport>, Vec<f32>) {
            let cfg = SimulationConfig {
                threads,
                ..small_config(Scenario::Mechanistic)
            };
            let mut sim = Simulation::new(cfg).unwrap();
            let mut reports = sim.run_generation();
            reports.extend(sim.run_generation());
            (reports, sim.population.movement_trait.clone())
        };
        let (single, traits_single) = run(1);
        let (multi, traits_multi) = run(4);
        assert_eq!(single, multi);
        assert_eq!(traits_single, traits_multi);
    }

    #[test]
    fn population_size_is_invariant_across_generations() {
        let mut sim = Simulation::new(small_config(Scenario::Mechanistic)).unwrap();
        for g in 0..3 {
            assert_eq!(sim.generation(), g);
            sim.run_generation();
            assert_eq!(sim.population.n_agents, 20);
            assert_eq!(sim.population.x.len(), 20);
            assert_eq!(sim.population.movement_trait.len(), 20);
        }
    }

    #[test]
    fn invalid_configs_fail_before_construction() {
        let too_many = SimulationConfig {
            tagged_agents: 21,
            ..small_config(Scenario::Random)
        };
        assert!(matches!(
            Simulation::new(too_many),
            Err(SimError::TooManyTagged { tagged: 21, population: 20 })
        ));

        let no_threads = SimulationConfig {
            threads: 0,
            ..small_config(Scenario::Random)
        };
        assert!(matches!(
            Simulation::new(no_threads),
            Err(SimError::InvalidParameter { name: "threads", .. })
        ));
    }

    #[test]
    fn tagged_founders_are_tracked() {
        let cfg = SimulationConfig {
            tagged_agents: 5,
            ..small_config(Scenario::Random)
        };
        let output = Simulation::new(cfg).unwrap().run();
        assert_eq!(output.generations[0].tagged, 5);
        assert!(output.generations.iter().all(|r| r.tagged <= 20));
    }

    /// Default-sized landscape, a long run. Prints timing and trait drift.
    #[test]
    #[ignore]
    fn mechanistic_default_landscape_timing() {
        let cfg = SimulationConfig {
            generations: 200,
            threads: 4,
            seed: Some(7),
            ..Default::default()
        };
        let t0 = Instant::now();
        let output = Simulation::new(cfg).unwrap().run();
        let elapsed = t0.elapsed();

        let first = &output.generations[0];
        let last = output.generations.last().unwrap();
        println!(
            "200 generations in {:?} | mean trait {:.3} -> {:.3} | mean intake {:.2} -> {:.2}",
            elapsed, first.mean_trait, last.mean_trait, first.mean_intake, last.mean_intake
        );
        assert_eq!(last.generation, 199);
    }
}
