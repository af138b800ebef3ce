//! Proximity-based association network.
//!
//! Every tick each unordered pair of agents closer than the association
//! radius scores one co-occurrence. Workers accumulate into their own partial
//! maps (rayon fold) and the partials are merged afterwards, so no counter is
//! ever shared between threads. Counts are kept per generation.

use super::population::Population;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weighted undirected edge, stored with `from < to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: u32,
    pub to: u32,
    pub weight: u32,
}

pub struct AssociationTracker {
    pub radius: f32,
    counts: HashMap<(u32, u32), u32>,
}

#[inline]
fn pair_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

impl AssociationTracker {
    pub fn new(radius: f32) -> Self {
        AssociationTracker {
            radius,
            counts: HashMap::new(),
        }
    }

    /// Count this tick's co-occurrences. Expects the population index to be
    /// current. Also bumps each agent's association total.
    pub fn count(&mut self, pop: &mut Population) {
        let grid = pop.grid();
        let (xs, ys) = (&pop.x, &pop.y);
        let radius = self.radius;

        let tick_counts: HashMap<(u32, u32), u32> = (0..pop.n_agents as u32)
            .into_par_iter()
            .fold(HashMap::new, |mut partial, i| {
                let (x, y) = (xs[i as usize], ys[i as usize]);
                grid.query_neighbors(i, x, y, radius, |j, _| {
                    // each unordered pair once, from its lower index
                    if j > i {
                        *partial.entry((i, j)).or_insert(0) += 1;
                    }
                });
                partial
            })
            .reduce(HashMap::new, |mut merged, partial| {
                for (pair, n) in partial {
                    *merged.entry(pair).or_insert(0) += n;
                }
                merged
            });

        for ((i, j), n) in tick_counts {
            pop.associations[i as usize] += n;
            pop.associations[j as usize] += n;
            *self.counts.entry((i, j)).or_insert(0) += n;
        }
    }

    /// Co-occurrences of a pair in either order.
    pub fn weight(&self, a: u32, b: u32) -> u32 {
        self.counts.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    /// Total co-occurrence events this generation.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&n| n as u64).sum()
    }

    pub fn n_edges(&self) -> usize {
        self.counts.len()
    }

    /// Edge list sorted by (from, to).
    pub fn edge_list(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .counts
            .iter()
            .map(|(&(from, to), &weight)| Edge { from, to, weight })
            .collect();
        edges.sort_unstable_by_key(|e| (e.from, e.to));
        edges
    }

    /// Forget all pairs before a new generation.
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
