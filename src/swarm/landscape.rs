//! Resource Landscape
//!
//! Clustered food items on a square, wrapped landscape. Items are depleted by
//! foraging and come back after a fixed regeneration delay. Item positions
//! never change after initialisation, so their spatial index is built once.

use super::grid::SpatialHashGrid;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::{debug, info};

/// Availability of a single resource item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemState {
    Available,
    /// Depleted; available again once `ticks_left` reaches zero.
    Regenerating { ticks_left: u32 },
}

/// Wrap a coordinate onto `[0, size)`.
#[inline]
pub fn wrap_coord(v: f32, size: f32) -> f32 {
    let w = v.rem_euclid(size);
    // rem_euclid of a tiny negative value can round up to `size`
    if w >= size { 0.0 } else { w }
}

/// The resource item table (SoA) plus its spatial index.
pub struct Landscape {
    pub size: f32,
    pub regen_time: u32,
    pub cluster_centres: Vec<(f32, f32)>,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub value: Vec<f32>,
    pub state: Vec<ItemState>,
    /// Cached by `count_available`, kept current by `regenerate` and `deplete`.
    pub n_available: usize,
    grid: SpatialHashGrid,
}

impl Landscape {
    /// Empty landscape.  `query_radius` sizes the index cells.
    pub fn new(size: f32, regen_time: u32, query_radius: f32) -> Self {
        Landscape {
            size,
            regen_time,
            cluster_centres: Vec::new(),
            x: Vec::new(),
            y: Vec::new(),
            value: Vec::new(),
            state: Vec::new(),
            n_available: 0,
            grid: SpatialHashGrid::for_entries(0, query_radius),
        }
    }

    /// Place `cluster_count` centres uniformly, then scatter `item_count`
    /// items round-robin over the centres with Normal(0, spread) offsets.
    /// All items start available.
    pub fn init_resources<R: Rng + ?Sized>(
        &mut self,
        cluster_count: usize,
        item_count: usize,
        spread: f32,
        item_value: f32,
        rng: &mut R,
    ) {
        let size = self.size;
        self.cluster_centres = (0..cluster_count)
            .map(|_| (rng.gen_range(0.0..size), rng.gen_range(0.0..size)))
            .collect();

        self.x = Vec::with_capacity(item_count);
        self.y = Vec::with_capacity(item_count);
        let offset = Normal::new(0.0f32, spread).ok();

        for i in 0..item_count {
            let (cx, cy) = match self.cluster_centres.get(i % cluster_count.max(1)) {
                Some(&c) => c,
                None => (rng.gen_range(0.0..size), rng.gen_range(0.0..size)),
            };
            let (dx, dy) = match &offset {
                Some(normal) => (normal.sample(rng), normal.sample(rng)),
                None => (0.0, 0.0),
            };
            self.x.push(wrap_coord(cx + dx, size));
            self.y.push(wrap_coord(cy + dy, size));
        }

        self.value = vec![item_value; item_count];
        self.state = vec![ItemState::Available; item_count];
        self.grid = SpatialHashGrid::for_entries(item_count, self.grid.cell_size);
        self.grid.rebuild(&self.x, &self.y);
        self.n_available = item_count;

        info!(
            "[Landscape] {} items around {} clusters (spread={:.2}, size={:.1})",
            item_count, cluster_count, spread, size
        );
    }

    /// Landscape with items at fixed positions, all available.
    pub fn with_items(size: f32, regen_time: u32, query_radius: f32, items: &[(f32, f32)], item_value: f32) -> Self {
        let mut land = Landscape::new(size, regen_time, query_radius);
        land.x = items.iter().map(|&(x, _)| wrap_coord(x, size)).collect();
        land.y = items.iter().map(|&(_, y)| wrap_coord(y, size)).collect();
        land.value = vec![item_value; items.len()];
        land.state = vec![ItemState::Available; items.len()];
        land.grid = SpatialHashGrid::for_entries(items.len(), query_radius);
        land.grid.rebuild(&land.x, &land.y);
        land.n_available = items.len();
        land
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Recount available items from scratch.
    pub fn count_available(&mut self) -> usize {
        self.n_available = self
            .state
            .iter()
            .filter(|s| matches!(s, ItemState::Available))
            .count();
        self.n_available
    }

    pub fn count_regenerating(&self) -> usize {
        self.state
            .iter()
            .filter(|s| matches!(s, ItemState::Regenerating { .. }))
            .count()
    }

    /// Advance every regeneration countdown by one tick. Returns the number
    /// of items that became available again.
    pub fn regenerate(&mut self) -> usize {
        let restored: usize = self
            .state
            .par_iter_mut()
            .map(|s| match s {
                ItemState::Regenerating { ticks_left } if *ticks_left <= 1 => {
                    *s = ItemState::Available;
                    1
                }
                ItemState::Regenerating { ticks_left } => {
                    *ticks_left -= 1;
                    0
                }
                ItemState::Available => 0,
            })
            .sum();
        self.n_available += restored;
        debug!(
            "[Landscape] {} restored, {} / {} items available",
            restored,
            self.n_available,
            self.len()
        );
        restored
    }

    #[inline]
    pub fn is_available(&self, item: usize) -> bool {
        matches!(self.state.get(item), Some(ItemState::Available))
    }

    /// Deplete an item, returning its value if it was still available.
    pub fn deplete(&mut self, item: usize) -> Option<f32> {
        if !self.is_available(item) {
            return None;
        }
        self.state[item] = ItemState::Regenerating { ticks_left: self.regen_time };
        self.n_available = self.n_available.saturating_sub(1);
        self.value.get(item).copied()
    }

    /// Index over item positions.
    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    /// Nearest available item within `r` of (x, y).
    pub fn nearest_available(&self, x: f32, y: f32, r: f32) -> Option<usize> {
        self.grid
            .nearest_within(x, y, r, |i| self.is_available(i as usize))
            .map(|i| i as usize)
    }

    /// Available items within `r` of (x, y).
    pub fn available_within(&self, x: f32, y: f32, r: f32) -> usize {
        self.grid.count_within(x, y, r, |i| self.is_available(i as usize))
    }

    pub fn total_value(&self) -> f32 {
        self.value.iter().sum()
    }

    /// Value of the items that can be eaten right now.
    pub fn available_value(&self) -> f32 {
        self.value
            .iter()
            .zip(&self.state)
            .filter(|(_, s)| matches!(s, ItemState::Available))
            .map(|(v, _)| v)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed::run_rng;

    fn landscape(items: usize, regen: u32) -> Landscape {
        let mut rng = run_rng(11);
        let mut land = Landscape::new(10.0, regen, 1.0);
        land.init_resources(3, items, 0.5, 1.0, &mut rng);
        land
    }

    #[test]
    fn items_stay_inside_bounds() {
        let land = landscape(500, 5);
        assert_eq!(land.len(), 500);
        assert!(land.x.iter().chain(land.y.iter()).all(|&v| (0.0..10.0).contains(&v)));
        assert_eq!(land.cluster_centres.len(), 3);
    }

    #[test]
    fn wrap_handles_both_sides() {
        assert_eq!(wrap_coord(10.5, 10.0), 0.5);
        assert!((wrap_coord(-0.25, 10.0) - 9.75).abs() < 1e-6);
        assert!(wrap_coord(-1e-9, 10.0) < 10.0);
    }

    #[test]
    fn depleted_items_return_after_regen_time() {
        let mut land = landscape(20, 3);
        assert_eq!(land.deplete(4), Some(1.0));
        assert_eq!(land.deplete(4), None, "double depletion must fail");
        assert_eq!(land.n_available, 19);

        assert_eq!(land.regenerate(), 0);
        assert_eq!(land.regenerate(), 0);
        assert!(!land.is_available(4));
        assert_eq!(land.regenerate(), 1);
        assert!(land.is_available(4));
        assert_eq!(land.n_available, 20);
    }

    #[test]
    fn available_plus_regenerating_is_conserved() {
        let mut land = landscape(100, 4);
        for tick in 0..30 {
            for item in (tick % 7..100).step_by(7) {
                land.deplete(item);
            }
            land.regenerate();
            let cached = land.n_available;
            assert_eq!(cached, land.count_available(), "cached count drifted at tick {tick}");
            assert_eq!(land.count_available() + land.count_regenerating(), land.len());
        }
    }

    #[test]
    fn regenerating_count_tracks_depletions() {
        let mut land = landscape(10, 2);
        assert_eq!(land.count_regenerating(), 0);
        assert_eq!(land.available_value(), land.total_value());
        land.deplete(1);
        land.deplete(2);
        land.deplete(2);
        assert_eq!(land.count_regenerating(), 2);
        assert_eq!(land.available_value(), land.total_value() - 2.0);
        land.regenerate();
        assert_eq!(land.count_regenerating(), 2);
        land.regenerate();
        assert_eq!(land.count_regenerating(), 0);
        assert_eq!(land.available_value(), 10.0);
    }

    #[test]
    fn nearest_available_skips_depleted() {
        let mut land = landscape(50, 10);
        let (x, y) = (land.x[0], land.y[0]);
        assert_eq!(land.nearest_available(x, y, 0.0), Some(0));
        land.deplete(0);
        assert_ne!(land.nearest_available(x, y, 5.0), Some(0));
    }
}
