// grid.rs — Spatial hash grid.
//
// Cell size = query radius → a radius query touches 3×3 = 9 cells.
// Hash: Fibonacci hashing (Knuth).
// Rebuild: one O(N) pass, no sort, no tree.  Positions move every tick, so the
// grid is thrown away and rebuilt rather than updated.

/// Spatial hash grid over a set of 2D points (agents or resource items).
pub struct SpatialHashGrid {
    /// Flattened bucket list: each bucket is a contiguous slice in `data`.
    /// `offsets[h]` = start index in `data` for bucket h.
    /// `counts[h]`  = number of entries in bucket h.
    ///
    /// Two-pass rebuild:
    ///   Pass 1: count entries per bucket.
    ///   Pass 2: scatter entries into pre-allocated runs.
    counts: Vec<u32>,         // [table_size]  entries per bucket
    offsets: Vec<u32>,        // [table_size]  start of each bucket in `data`
    data: Vec<u32>,           // [N]           entry indices, packed
    cells: Vec<(i32, i32)>,   // [N]           cell of each entry
    px: Vec<f32>,             // [N]           snapshot of positions
    py: Vec<f32>,
    table_size: usize,        // power of two
    mask: usize,              // table_size - 1
    pub cell_size: f32,
    pub world_min: [f32; 2],
}

impl SpatialHashGrid {
    /// `table_size` should be ≥ 2× expected entry count for a low collision rate.
    pub fn new(table_size: usize, cell_size: f32, world_min: [f32; 2]) -> Self {
        let table_size = table_size.max(2).next_power_of_two();
        SpatialHashGrid {
            counts:  vec![0u32; table_size],
            offsets: vec![0u32; table_size],
            data:    Vec::new(),
            cells:   Vec::new(),
            px:      Vec::new(),
            py:      Vec::new(),
            table_size,
            mask: table_size - 1,
            cell_size: cell_size.max(f32::EPSILON),
            world_min,
        }
    }

    /// Grid sized for `expected` entries on a landscape anchored at the origin.
    pub fn for_entries(expected: usize, cell_size: f32) -> Self {
        Self::new((expected * 2).max(16), cell_size, [0.0, 0.0])
    }

    /// Fibonacci hash for (cx, cy) cell coordinates.
    #[inline(always)]
    fn hash(&self, cx: i32, cy: i32) -> usize {
        let key = (cx as u64).wrapping_mul(2654435761)
                ^ (cy as u64).wrapping_mul(2246822519);
        (key.wrapping_mul(11400714819323198485) >> (64 - self.table_size.trailing_zeros())) as usize
            & self.mask
    }

    #[inline(always)]
    pub fn world_to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        let cx = ((x - self.world_min[0]) / self.cell_size).floor() as i32;
        let cy = ((y - self.world_min[1]) / self.cell_size).floor() as i32;
        (cx, cy)
    }

    pub fn len(&self) -> usize {
        self.px.len()
    }

    pub fn is_empty(&self) -> bool {
        self.px.is_empty()
    }

    /// Full O(N) rebuild from position columns.  Two-pass (count then scatter).
    pub fn rebuild(&mut self, xs: &[f32], ys: &[f32]) {
        let n = xs.len().min(ys.len());

        self.px.clear();
        self.px.extend_from_slice(&xs[..n]);
        self.py.clear();
        self.py.extend_from_slice(&ys[..n]);
        self.data.resize(n, 0);
        self.cells.clear();

        // ── Pass 1: count ────────────────────────────────────────────────────
        self.counts.iter_mut().for_each(|c| *c = 0);

        for i in 0..n {
            let cell = self.world_to_cell(self.px[i], self.py[i]);
            self.cells.push(cell);
            let h = self.hash(cell.0, cell.1);
            self.counts[h] += 1;
        }

        // ── Prefix sum → offsets ─────────────────────────────────────────────
        let mut running = 0u32;
        for h in 0..self.table_size {
            self.offsets[h] = running;
            running += self.counts[h];
        }

        // ── Pass 2: scatter ──────────────────────────────────────────────────
        self.counts.iter_mut().for_each(|c| *c = 0);  // reuse as cursor

        for i in 0..n {
            let (cx, cy) = self.cells[i];
            let h    = self.hash(cx, cy);
            let slot = (self.offsets[h] + self.counts[h]) as usize;
            self.data[slot] = i as u32;
            self.counts[h] += 1;
        }
    }

    /// Visit every entry whose cell overlaps the bounding box of the query
    /// circle.  Each entry is visited at most once; callers still need an
    /// exact distance check.
    #[inline]
    pub fn query_radius<F>(&self, qx: f32, qy: f32, r: f32, mut callback: F)
    where
        F: FnMut(u32),
    {
        let (cx0, cy0) = self.world_to_cell(qx - r, qy - r);
        let (cx1, cy1) = self.world_to_cell(qx + r, qy + r);

        for cy in cy0..=cy1 {
            for cx in cx0..=cx1 {
                let h     = self.hash(cx, cy);
                let start = self.offsets[h] as usize;
                let end   = start + self.counts[h] as usize;
                for &idx in &self.data[start..end] {
                    // Hash collisions put foreign cells in this bucket.
                    if self.cells[idx as usize] == (cx, cy) {
                        callback(idx);
                    }
                }
            }
        }
    }

    /// Exact range query: `callback(idx, squared_distance)` for every entry
    /// within `r` of (qx, qy).
    #[inline]
    pub fn for_each_within<F>(&self, qx: f32, qy: f32, r: f32, mut callback: F)
    where
        F: FnMut(u32, f32),
    {
        let r2 = r * r;
        self.query_radius(qx, qy, r, |idx| {
            let i = idx as usize;
            let dx = self.px[i] - qx;
            let dy = self.py[i] - qy;
            let d2 = dx * dx + dy * dy;
            if d2 <= r2 {
                callback(idx, d2);
            }
        });
    }

    /// Same as `for_each_within` but skips `self_idx`.
    #[inline]
    pub fn query_neighbors<F>(
        &self,
        self_idx: u32,
        qx: f32, qy: f32, r: f32,
        mut callback: F,
    ) where
        F: FnMut(u32, f32),
    {
        self.for_each_within(qx, qy, r, |idx, d2| {
            if idx != self_idx { callback(idx, d2) }
        });
    }

    /// Number of accepted entries within `r` of (qx, qy).
    pub fn count_within<P>(&self, qx: f32, qy: f32, r: f32, accept: P) -> usize
    where
        P: Fn(u32) -> bool,
    {
        let mut n = 0;
        self.for_each_within(qx, qy, r, |idx, _| {
            if accept(idx) { n += 1 }
        });
        n
    }

    /// Closest accepted entry within `r`.  Equal distances go to the lower
    /// index, so the answer does not depend on bucket layout.
    pub fn nearest_within<P>(&self, qx: f32, qy: f32, r: f32, accept: P) -> Option<u32>
    where
        P: Fn(u32) -> bool,
    {
        let mut best: Option<(u32, f32)> = None;
        self.for_each_within(qx, qy, r, |idx, d2| {
            if !accept(idx) {
                return;
            }
            best = match best {
                Some((b, bd)) if bd < d2 || (bd == d2 && b < idx) => Some((b, bd)),
                _ => Some((idx, d2)),
            };
        });
        best.map(|(idx, _)| idx)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
