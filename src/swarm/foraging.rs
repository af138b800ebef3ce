//! Foraging: parallel pick, sequential exploit.
//!
//! Several agents can want the same item in the same tick. The pick phase
//! runs across workers and only records a proposal per agent. The exploit
//! phase then walks the proposals in agent order on one thread; the first
//! agent to commit an item gets it and later claimants get nothing this tick.
//!
//! Handling: an agent that eats at tick `t` sets its counter to
//! `handling_time`. Exploit counts every busy agent down by one before
//! committing, so the agent sits out ticks `t+1 ..= t+handling_time` (no
//! movement, no pick) and can eat again at `t + handling_time + 1`.

use super::landscape::Landscape;
use super::population::Population;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One item consumed by one agent during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depletion {
    pub agent: u32,
    pub item: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct ForagingEngine {
    /// Radius within which an agent can take an item.
    pub range: f32,
    /// Ticks an agent is busy after taking an item.
    pub handling_time: u32,
}

impl ForagingEngine {
    pub fn new(range: f32, handling_time: u32) -> Self {
        ForagingEngine { range, handling_time }
    }

    /// Phase 1: every idle agent proposes the nearest available item in range.
    /// Read-only against the landscape.
    pub fn pick(&self, pop: &mut Population, land: &Landscape) {
        let range = self.range;
        pop.proposal
            .par_iter_mut()
            .zip(pop.x.par_iter())
            .zip(pop.y.par_iter())
            .zip(pop.handling.par_iter())
            .for_each(|(((proposal, &x), &y), &handling)| {
                *proposal = if handling > 0 {
                    None
                } else {
                    land.nearest_available(x, y, range).map(|i| i as u32)
                };
            });
    }

    /// Phase 2: count busy agents down, then commit proposals in agent index
    /// order. Must stay sequential.
    pub fn exploit(&self, pop: &mut Population, land: &mut Landscape) -> Vec<Depletion> {
        pop.handling.iter_mut().for_each(|h| *h = h.saturating_sub(1));

        let mut depleted = Vec::new();
        for agent in 0..pop.n_agents {
            let Some(item) = pop.proposal[agent].take() else {
                continue;
            };
            match land.deplete(item as usize) {
                Some(value) => {
                    pop.intake[agent] += value;
                    pop.picks[agent] += 1;
                    pop.handling[agent] = self.handling_time;
                    depleted.push(Depletion { agent: agent as u32, item });
                }
                None => trace!("[Forage] agent {} lost item {} to an earlier claim", agent, item),
            }
        }
        depleted
    }

    /// Both phases back to back.
    pub fn forage(&self, pop: &mut Population, land: &mut Landscape) -> Vec<Depletion> {
        self.pick(pop, land);
        self.exploit(pop, land)
    }
}
