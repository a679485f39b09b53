// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Hash grid over guide rest positions, one grid per interpolation group.

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::geometry::{Aabb, Vector3};
use crate::guides::guide_set::GuideSet;

/// A guide returned by a nearest-neighbour query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub guide: u32,
    pub distance: f64,
}

pub type Neighbors = SmallVec<[Neighbor; 8]>;

#[derive(Clone, Debug, Default)]
struct GroupGrid {
    cells: AHashMap<u128, SmallVec<[u32; 4]>>,
    members: Vec<u32>,
    /// Inclusive key bounds of occupied cells.
    min_key: [i64; 3],
    max_key: [i64; 3],
}

#[derive(Clone, Debug)]
pub struct GuideIndex {
    cell: f64,
    hash_inv: f64,
    positions: Vec<Vector3>,
    groups: AHashMap<u32, GroupGrid>,
}

/// Finest grid resolution along the longest axis of the indexed extent.
const MAX_CELLS_PER_AXIS: f64 = 1024.0;

/// A ring search gives up and scans the whole group once its rings span more
/// than this many cells per group member.
const CELLS_PER_MEMBER: usize = 8;

#[inline(always)]
fn floor_sat_i64(x: f64) -> i64 {
    if !x.is_finite() {
        return if x.is_sign_positive() { i64::MAX } else { i64::MIN };
    }
    let i = x as i64;
    i - ((i as f64 > x) as i64)
}

#[inline(always)]
fn pack_key3(kx: i64, ky: i64, kz: i64) -> u128 {
    // 3 × 42-bit signed lanes into 126 bits (fits typical ranges).
    let mask = (1u128 << 42) - 1;
    let ux = (kx as i128 as u128) & mask;
    let uy = (ky as i128 as u128) & mask;
    let uz = (kz as i128 as u128) & mask;
    ux | (uy << 42) | (uz << 84)
}

impl GuideIndex {
    /// Indexes every guide's rest position, sizing cells over the guides'
    /// own bounding box.
    pub fn build(guides: &GuideSet) -> Self {
        Self::build_over(guides, &Aabb::empty())
    }

    /// Indexes every guide's rest position. The cell size targets about one
    /// guide per cell over `domain` joined with the guides' bounding box,
    /// and never drops below `1 / MAX_CELLS_PER_AXIS` of that extent.
    pub fn build_over(guides: &GuideSet, domain: &Aabb<3>) -> Self {
        let positions: Vec<Vector3> = guides.rest_positions().iter().map(|r| r.point.position).collect();

        let mut bounds = Aabb::from_vectors(&positions);
        if !domain.is_empty() {
            bounds.extend(&domain.min);
            bounds.extend(&domain.max);
        }
        let extent = if bounds.is_empty() {
            0.0
        } else {
            bounds.extent(bounds.longest_axis())
        };
        let cell = if extent.is_finite() && extent > 0.0 {
            let per_axis = (positions.len().max(1) as f64).cbrt().ceil().min(MAX_CELLS_PER_AXIS);
            extent / per_axis
        } else {
            1.0
        };

        let mut index = GuideIndex {
            cell,
            hash_inv: 1.0 / cell,
            positions,
            groups: AHashMap::default(),
        };

        for (id, rest) in guides.rest_positions().iter().enumerate() {
            let key = index.position_to_hash_key(&index.positions[id]);
            let grid = index.groups.entry(rest.group).or_insert_with(|| GroupGrid {
                cells: AHashMap::default(),
                min_key: [i64::MAX; 3],
                max_key: [i64::MIN; 3],
                members: Vec::new(),
            });
            grid.members.push(id as u32);
            for axis in 0..3 {
                grid.min_key[axis] = grid.min_key[axis].min(key[axis]);
                grid.max_key[axis] = grid.max_key[axis].max(key[axis]);
            }
            grid.cells
                .entry(pack_key3(key[0], key[1], key[2]))
                .or_default()
                .push(id as u32);
        }
        index
    }

    pub fn cell_size(&self) -> f64 {
        self.cell
    }

    #[inline(always)]
    fn position_to_hash_key(&self, pos: &Vector3) -> [i64; 3] {
        let inv = self.hash_inv;
        [
            floor_sat_i64(pos.x * inv),
            floor_sat_i64(pos.y * inv),
            floor_sat_i64(pos.z * inv),
        ]
    }

    /// The `k` guides of `group` nearest `point`, closest first. Ties keep
    /// the lower guide id first. Fewer are returned when the group is small.
    pub fn nearest(&self, group: u32, point: &Vector3, k: usize, out: &mut Neighbors) {
        out.clear();
        if k == 0 {
            return;
        }
        let Some(grid) = self.groups.get(&group) else {
            return;
        };
        if grid.members.len() <= k {
            self.scan(grid, point, k, out);
            return;
        }
        let cell_budget = grid.members.len().saturating_mul(CELLS_PER_MEMBER);

        let center = self.position_to_hash_key(point);
        // Rings beyond this reach cannot contain occupied cells.
        let reach = (0..3)
            .map(|a| {
                (center[a].saturating_sub(grid.min_key[a]))
                    .max(grid.max_key[a].saturating_sub(center[a]))
            })
            .max()
            .unwrap_or(0)
            .max(0);

        let mut ring = 0i64;
        loop {
            self.visit_ring(grid, &center, ring, point, k, out);

            // Any cell in the next ring is at least `ring` cells away.
            let full = out.len() == k;
            if full && out[k - 1].distance <= ring as f64 * self.cell {
                break;
            }
            if ring >= reach {
                break;
            }
            ring += 1;
            let side = (2 * ring + 1) as usize;
            if side.saturating_mul(side).saturating_mul(side) > cell_budget {
                self.scan(grid, point, k, out);
                return;
            }
        }
    }

    /// Exhaustive query over every member of `grid`.
    fn scan(&self, grid: &GroupGrid, point: &Vector3, k: usize, out: &mut Neighbors) {
        out.clear();
        for &guide in &grid.members {
            let distance = self.positions[guide as usize].distance(point);
            insert_sorted(out, Neighbor { guide, distance }, k);
        }
    }

    fn visit_ring(&self, grid: &GroupGrid, center: &[i64; 3], ring: i64, point: &Vector3, k: usize, out: &mut Neighbors) {
        for dx in -ring..=ring {
            for dy in -ring..=ring {
                for dz in -ring..=ring {
                    if dx.abs().max(dy.abs()).max(dz.abs()) != ring {
                        continue;
                    }
                    let key = pack_key3(center[0] + dx, center[1] + dy, center[2] + dz);
                    let Some(ids) = grid.cells.get(&key) else {
                        continue;
                    };
                    for &guide in ids {
                        let distance = self.positions[guide as usize].distance(point);
                        insert_sorted(out, Neighbor { guide, distance }, k);
                    }
                }
            }
        }
    }
}

/// Keeps `out` sorted by (distance, guide) and no longer than `k`.
fn insert_sorted(out: &mut Neighbors, candidate: Neighbor, k: usize) {
    let pos = out
        .iter()
        .position(|n| {
            candidate.distance < n.distance || (candidate.distance == n.distance && candidate.guide < n.guide)
        })
        .unwrap_or(out.len());
    if pos >= k {
        return;
    }
    out.insert(pos, candidate);
    out.truncate(k);
}
