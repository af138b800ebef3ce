//! Movement policies.
//!
//! One policy is chosen from the scenario when the run is built and never
//! changes. Each tick every idle agent relocates in parallel: queries against
//! the landscape are read-only and each worker writes only its own agent's
//! position and distance slots. Agents still handling food stay put; their
//! countdown belongs to the foraging phase.

use super::landscape::{wrap_coord, Landscape};
use super::population::Population;
use crate::core::config::Scenario;
use crate::core::seed::{agent_rng, SimRng};
use rand::Rng;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Headings sampled by the mechanistic policy.
pub const MECHANISTIC_HEADINGS: usize = 8;

/// Identifies the tick so per-agent random streams can be derived.
#[derive(Clone, Copy, Debug)]
pub struct TickContext {
    pub seed: u64,
    pub generation: usize,
    pub tick: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MovementPolicy {
    /// Uniform heading, fixed step length.
    Random { step: f32 },
    /// Move onto the nearest visible available item, else a random step.
    Optimal { perception: f32 },
    /// Trait-weighted response to local resource density.
    Mechanistic { perception: f32 },
}

impl MovementPolicy {
    pub fn for_scenario(scenario: Scenario, perception: f32) -> Self {
        match scenario {
            Scenario::Random => MovementPolicy::Random { step: perception },
            Scenario::Optimal => MovementPolicy::Optimal { perception },
            Scenario::Mechanistic => MovementPolicy::Mechanistic { perception },
        }
    }

    /// Move every agent once.
    pub fn apply(&self, pop: &mut Population, land: &Landscape, ctx: TickContext) {
        let policy = *self;
        let size = land.size;

        pop.x
            .par_iter_mut()
            .zip(pop.y.par_iter_mut())
            .zip(pop.handling.par_iter())
            .zip(pop.moved.par_iter_mut())
            .zip(pop.movement_trait.par_iter())
            .enumerate()
            .for_each(|(i, ((((x, y), &handling), moved), &trait_value))| {
                if handling > 0 {
                    return;
                }

                let mut rng = agent_rng(ctx.seed, ctx.generation, ctx.tick, i);
                let (dx, dy) = match policy {
                    MovementPolicy::Random { step } => random_step(step, &mut rng),
                    MovementPolicy::Optimal { perception } => {
                        optimal_step(*x, *y, perception, land, &mut rng)
                    }
                    MovementPolicy::Mechanistic { perception } => {
                        mechanistic_step(*x, *y, trait_value, perception, land, &mut rng)
                    }
                };

                *moved += (dx * dx + dy * dy).sqrt();
                *x = wrap_coord(*x + dx, size);
                *y = wrap_coord(*y + dy, size);
            });
    }
}

fn random_step(step: f32, rng: &mut SimRng) -> (f32, f32) {
    let angle = rng.gen_range(0.0..TAU);
    (step * angle.cos(), step * angle.sin())
}

fn optimal_step(x: f32, y: f32, perception: f32, land: &Landscape, rng: &mut SimRng) -> (f32, f32) {
    match land.nearest_available(x, y, perception) {
        Some(item) => (land.x[item] - x, land.y[item] - y),
        None => random_step(perception, rng),
    }
}

/// Score `MECHANISTIC_HEADINGS` candidate points one perception radius away
/// (randomly rotated each tick) by `trait * available items around them`.
/// The agent moves only if the best candidate beats its current spot, and the
/// step length grows with the score gain.
fn mechanistic_step(
    x: f32,
    y: f32,
    trait_value: f32,
    perception: f32,
    land: &Landscape,
    rng: &mut SimRng,
) -> (f32, f32) {
    let size = land.size;
    let here = trait_value * land.available_within(x, y, perception) as f32;
    let sector = TAU / MECHANISTIC_HEADINGS as f32;
    let rotation = rng.gen_range(0.0..sector);

    let mut best: Option<(f32, f32)> = None; // (angle, score)
    for k in 0..MECHANISTIC_HEADINGS {
        let angle = rotation + k as f32 * sector;
        let cx = wrap_coord(x + perception * angle.cos(), size);
        let cy = wrap_coord(y + perception * angle.sin(), size);
        let score = trait_value * land.available_within(cx, cy, perception) as f32;
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((angle, score));
        }
    }

    match best {
        Some((angle, score)) if score > here => {
            let step = perception * (score - here).tanh();
            (step * angle.cos(), step * angle.sin())
        }
        _ => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed::run_rng;

    fn ctx(tick: usize) -> TickContext {
        TickContext { seed: 99, generation: 0, tick }
    }

    #[test]
    fn random_steps_have_fixed_length_and_stay_in_bounds() {
        let mut land = Landscape::new(10.0, 5, 1.0);
        land.init_resources(1, 0, 0.0, 1.0, &mut run_rng(2));
        let mut pop = Population::new(64, 1.0);
        pop.init_founders(10.0, 0, &mut run_rng(2));

        let policy = MovementPolicy::Random { step: 1.0 };
        for t in 0..10 {
            policy.apply(&mut pop, &land, ctx(t));
        }
        assert!(pop.x.iter().chain(pop.y.iter()).all(|&v| (0.0..10.0).contains(&v)));
        assert!(pop.moved.iter().all(|&d| (d - 10.0).abs() < 1e-3));
    }

    #[test]
    fn handling_agents_do_not_move() {
        let mut land = Landscape::new(10.0, 5, 1.0);
        land.init_resources(1, 0, 0.0, 1.0, &mut run_rng(2));
        let mut pop = Population::new(2, 1.0);
        pop.x = vec![5.0, 5.0];
        pop.y = vec![5.0, 5.0];
        pop.handling = vec![2, 0];

        MovementPolicy::Random { step: 1.0 }.apply(&mut pop, &land, ctx(0));
        assert_eq!((pop.x[0], pop.y[0]), (5.0, 5.0));
        assert_eq!(pop.handling[0], 2, "movement must not count handling down");
        assert!(pop.moved[1] > 0.0);
    }

    #[test]
    fn optimal_agents_land_on_visible_items() {
        let land = Landscape::with_items(20.0, 5, 2.0, &[(8.0, 8.0), (15.0, 15.0)], 1.0);
        let mut pop = Population::new(1, 2.0);
        pop.x = vec![9.0];
        pop.y = vec![8.0];

        MovementPolicy::Optimal { perception: 2.0 }.apply(&mut pop, &land, ctx(0));
        assert_eq!((pop.x[0], pop.y[0]), (8.0, 8.0));
        assert!((pop.moved[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mechanistic_trait_sign_sets_response_to_food() {
        let patch = vec![(8.0, 8.0); 200];
        let land = Landscape::with_items(20.0, 5, 1.5, &patch, 1.0);
        let start = (10.0, 8.0);
        let dist = |x: f32, y: f32| ((x - 8.0f32).powi(2) + (y - 8.0f32).powi(2)).sqrt();
        let policy = MovementPolicy::Mechanistic { perception: 1.5 };

        let mut attracted = Population::new(1, 1.5);
        attracted.x = vec![start.0];
        attracted.y = vec![start.1];
        attracted.movement_trait = vec![1.0];
        policy.apply(&mut attracted, &land, ctx(0));
        assert!(dist(attracted.x[0], attracted.y[0]) < 1.5);

        for trait_value in [0.0, -1.0] {
            let mut idle = Population::new(1, 1.5);
            idle.x = vec![start.0];
            idle.y = vec![start.1];
            idle.movement_trait = vec![trait_value];
            policy.apply(&mut idle, &land, ctx(0));
            assert_eq!((idle.x[0], idle.y[0]), start, "trait {trait_value}");
        }
    }

    #[test]
    fn movement_is_independent_of_thread_count() {
        let mut land = Landscape::new(30.0, 5, 2.0);
        land.init_resources(5, 300, 1.0, 1.0, &mut run_rng(8));

        let run = |threads: usize| {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
            let mut pop = Population::new(100, 2.0);
            pop.init_founders(30.0, 0, &mut run_rng(8));
            pool.install(|| {
                for t in 0..5 {
                    MovementPolicy::Mechanistic { perception: 2.0 }.apply(&mut pop, &land, ctx(t));
                }
            });
            (pop.x, pop.y)
        };
        assert_eq!(run(1), run(4));
    }
}
