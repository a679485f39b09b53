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

//! Uniform grid over the unit UV square mapping texture coordinates back to
//! the triangle and barycentric location they came from.

use log::debug;

use crate::{
    geometry::{Aabb, Vector2, util::point_in_triangle_2d},
    mesh::{
        mesh_point::{MeshPoint, UvPoint},
        surface::{MeshSurface, Pose},
    },
};

pub const DEFAULT_RESOLUTION: u32 = 2048;

#[derive(Clone, Debug)]
struct TriangleUv {
    id: u32,
    uv: [Vector2; 3],
}

/// Exclusive prefix sum of per-cell counts, and the grand total.
fn span_starts(counts: &[usize]) -> (Vec<usize>, usize) {
    let mut starts = Vec::with_capacity(counts.len());
    let mut running = 0usize;
    for &c in counts {
        starts.push(running);
        running += c;
    }
    (starts, running)
}

/// Built once with a two-pass counting sort: per-cell counts first, then
/// every triangle is written into its cells' contiguous span.
#[derive(Clone, Debug)]
pub struct UvGrid {
    resolution: u32,
    triangles: Vec<TriangleUv>,
    /// `cell_start[c]..cell_start[c + 1]` indexes `cell_entries` for cell `c`.
    cell_start: Vec<usize>,
    cell_entries: Vec<u32>,
}

impl UvGrid {
    pub fn build<M: MeshSurface>(mesh: &M, resolution: u32) -> Self {
        let resolution = resolution.max(1);
        let cells = (resolution as usize) * (resolution as usize);

        let triangles: Vec<TriangleUv> = mesh
            .triangles(Pose::Rest)
            .map(|(id, t)| TriangleUv {
                id,
                uv: t.uv_coords(),
            })
            .collect();

        // Pass 1: count.
        let mut counts = vec![0usize; cells + 1];
        let mut spans = Vec::with_capacity(triangles.len());
        for tri in &triangles {
            let span = Self::cell_span(resolution, &Aabb::from_uvs(&tri.uv));
            if let Some((x0, x1, y0, y1)) = span {
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        counts[(y * resolution + x) as usize] += 1;
                    }
                }
            }
            spans.push(span);
        }

        let (cell_start, total) = span_starts(&counts);

        // Pass 2: distribute. `cursor` reuses the count buffer as write heads.
        let mut cell_entries = vec![0u32; total];
        let mut cursor = counts;
        cursor.copy_from_slice(&cell_start);
        for (index, span) in spans.iter().enumerate() {
            if let Some((x0, x1, y0, y1)) = *span {
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        let cell = (y * resolution + x) as usize;
                        cell_entries[cursor[cell]] = index as u32;
                        cursor[cell] += 1;
                    }
                }
            }
        }

        debug!(
            "uv grid {resolution}x{resolution}: {} triangles, {} cell entries",
            triangles.len(),
            cell_entries.len()
        );

        UvGrid {
            resolution,
            triangles,
            cell_start,
            cell_entries,
        }
    }

    /// Inclusive cell range covered by `bounds` clipped to the unit square;
    /// `None` when the box lies entirely outside it.
    fn cell_span(resolution: u32, bounds: &Aabb<2>) -> Option<(u32, u32, u32, u32)> {
        if bounds.is_empty()
            || bounds.max[0] < 0.0
            || bounds.max[1] < 0.0
            || bounds.min[0] > 1.0
            || bounds.min[1] > 1.0
        {
            return None;
        }
        let x0 = Self::cell_coord(resolution, bounds.min[0]);
        let x1 = Self::cell_coord(resolution, bounds.max[0]);
        let y0 = Self::cell_coord(resolution, bounds.min[1]);
        let y1 = Self::cell_coord(resolution, bounds.max[1]);
        Some((x0, x1, y0, y1))
    }

    #[inline]
    fn cell_coord(resolution: u32, t: f64) -> u32 {
        let c = (t.clamp(0.0, 1.0) * resolution as f64).floor() as u32;
        c.min(resolution - 1)
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Triangle and barycentric location containing texture coordinate
    /// `(u, v)`, or the not-found sentinel.
    pub fn lookup(&self, u: f64, v: f64) -> UvPoint {
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return UvPoint::not_found();
        }
        let x = Self::cell_coord(self.resolution, u);
        let y = Self::cell_coord(self.resolution, v);
        let cell = (y * self.resolution + x) as usize;
        let range = self.cell_start[cell]..self.cell_start[cell + 1];

        let p = Vector2::new(u, v);
        for &entry in &self.cell_entries[range] {
            let tri = &self.triangles[entry as usize];
            let [a, b, c] = &tri.uv;
            if let Some((_, wb, wc)) = point_in_triangle_2d(&p, a, b, c) {
                return UvPoint::new(wb, wc, tri.id);
            }
        }
        UvPoint::not_found()
    }
}

/// Lazily (re)built `UvGrid`. Mark it dirty whenever the indexed triangle set
/// changes; the next lookup rebuilds it.
#[derive(Clone, Debug)]
pub struct UvLookup {
    resolution: u32,
    grid: Option<UvGrid>,
}

impl Default for UvLookup {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION)
    }
}

impl UvLookup {
    pub fn new(resolution: u32) -> Self {
        UvLookup {
            resolution,
            grid: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.grid.is_none()
    }

    pub fn mark_dirty(&mut self) {
        self.grid = None;
    }

    pub fn grid<M: MeshSurface>(&mut self, mesh: &M) -> &UvGrid {
        let resolution = self.resolution;
        self.grid.get_or_insert_with(|| UvGrid::build(mesh, resolution))
    }

    /// Resolves a surface point by its texture coordinates.
    pub fn uv_point<M: MeshSurface>(&mut self, mesh: &M, point: &MeshPoint) -> UvPoint {
        self.grid(mesh).lookup(point.u, point.v)
    }
}
