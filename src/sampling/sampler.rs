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

//! Density-weighted surface point sampler.
//!
//! Each triangle is quadrisected in barycentric space down to a depth chosen
//! from its texel footprint. Leaves are weighted by the density texture at
//! their centroid times their area and laid out as one flat CDF for the whole
//! surface, answered by binary search.

use log::debug;

use crate::{
    error::{HairError, Result},
    geometry::Vector2,
    mesh::{MeshSurface, Pose, Triangle, UvPoint},
    numeric::UniformRandom,
    sampling::{
        lattice::{BarycentricLattice, DIVISIONS, LATTICE, MAX_DEPTH},
        warp::uniform_triangle,
    },
    texture::Texture,
};

/// One CDF entry: a sub-triangle given by three lattice vertex indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubTriangle {
    pub vertices: [u32; 3],
    /// Running total of weighted density up to and including this entry.
    pub cdf: f64,
    pub triangle_id: u32,
}

/// Sub-triangle during construction, with lattice corners as `(i, j)`.
#[derive(Clone, Copy, Debug)]
struct Node {
    corners: [(u32, u32); 3],
    depth: u32,
}

impl Node {
    const ROOT: Node = Node {
        corners: [(0, 0), (DIVISIONS, 0), (0, DIVISIONS)],
        depth: 0,
    };

    #[inline]
    fn midpoint(a: (u32, u32), b: (u32, u32)) -> (u32, u32) {
        ((a.0 + b.0) / 2, (a.1 + b.1) / 2)
    }

    /// Quadrisection: three corner triangles then the inverted center one.
    fn children(&self) -> [Node; 4] {
        let [a, b, c] = self.corners;
        let ab = Self::midpoint(a, b);
        let bc = Self::midpoint(b, c);
        let ca = Self::midpoint(c, a);
        let depth = self.depth + 1;
        [
            Node { corners: [a, ab, ca], depth },
            Node { corners: [ab, b, bc], depth },
            Node { corners: [ca, bc, c], depth },
            Node { corners: [bc, ca, ab], depth },
        ]
    }

    fn lattice_indices(&self) -> [u32; 3] {
        self.corners.map(|(i, j)| BarycentricLattice::index(i, j))
    }

    fn centroid(&self) -> (f64, f64) {
        let n = DIVISIONS as f64;
        let (si, sj) = self
            .corners
            .iter()
            .fold((0u32, 0u32), |(si, sj), &(i, j)| (si + i, sj + j));
        (si as f64 / (3.0 * n), sj as f64 / (3.0 * n))
    }
}

#[derive(Clone, Copy, Debug)]
enum Task {
    Visit(Node),
    /// All four children of this node have produced an outcome.
    Merge(Node),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Outcome {
    /// Not yet emitted; every leaf below carries the same probability and
    /// the whole node can be stored as one entry of this total weight.
    Uniform(f64),
    /// Already emitted as separate entries.
    Split,
}

/// Worker-owned traversal scratch, sized once per triangle so the explicit
/// stack never reallocates mid-traversal.
#[derive(Default)]
struct Scratch {
    tasks: Vec<Task>,
    outcomes: Vec<Outcome>,
}

impl Scratch {
    fn prepare(&mut self, depth: u32) -> Result<()> {
        // Each level replaces one Visit by a Merge and four Visits.
        let bound = 4 * depth as usize + 2;
        self.tasks.clear();
        self.outcomes.clear();
        self.tasks.try_reserve(bound)?;
        self.outcomes.try_reserve(bound)?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct SurfaceSampler {
    sub_triangles: Vec<SubTriangle>,
    triangle_pdf: Vec<(u32, f64)>,
    total: f64,
}

impl SurfaceSampler {
    /// Builds a sampler over every triangle of `mesh`.
    pub fn build<M: MeshSurface>(mesh: &M, density: &Texture) -> Result<Self> {
        Self::build_subset(mesh, density, None, MAX_DEPTH)
    }

    /// Builds a sampler over `selection` (or every triangle), subdividing no
    /// deeper than `max_depth` (itself capped at `MAX_DEPTH`).
    ///
    /// Fails with `ZeroDensity` when nothing can be sampled. On failure no
    /// partially built sampler escapes.
    pub fn build_subset<M: MeshSurface>(
        mesh: &M,
        density: &Texture,
        selection: Option<&[u32]>,
        max_depth: u32,
    ) -> Result<Self> {
        let max_depth = max_depth.min(MAX_DEPTH);
        let mut builder = Builder {
            density,
            sub_triangles: Vec::new(),
            triangle_totals: Vec::new(),
            current_total: 0.0,
            total: 0.0,
            leaves: 0,
            scratch: Scratch::default(),
        };

        let mut visited = 0usize;
        match selection {
            Some(ids) => {
                for &id in ids {
                    if let Some(triangle) = mesh.triangle(id, Pose::Rest) {
                        builder.add_triangle(id, &triangle, max_depth)?;
                        visited += 1;
                    }
                }
            }
            None => {
                for (id, triangle) in mesh.triangles(Pose::Rest) {
                    builder.add_triangle(id, &triangle, max_depth)?;
                    visited += 1;
                }
            }
        }

        if !(builder.total > 0.0) {
            return Err(HairError::ZeroDensity { triangles: visited });
        }

        debug!(
            "sampler: {visited} triangles, {} leaves merged into {} entries, total density {}",
            builder.leaves,
            builder.sub_triangles.len(),
            builder.total
        );

        let total = builder.total;
        let triangle_pdf = builder
            .triangle_totals
            .iter()
            .map(|&(id, t)| (id, t / total))
            .collect();
        Ok(SurfaceSampler {
            sub_triangles: builder.sub_triangles,
            triangle_pdf,
            total,
        })
    }

    /// Entries in ascending CDF order.
    pub fn sub_triangles(&self) -> &[SubTriangle] {
        &self.sub_triangles
    }

    /// Sum of density times area over the sampled surface.
    pub fn total_density(&self) -> f64 {
        self.total
    }

    /// `(triangle id, probability)` for every visited triangle in build
    /// order. Probabilities sum to 1.
    pub fn triangle_pdf(&self) -> &[(u32, f64)] {
        &self.triangle_pdf
    }

    /// Index of the first entry whose CDF exceeds `xi`.
    fn search(&self, xi: f64) -> Option<usize> {
        let entries = &self.sub_triangles;
        let mut lo = 0usize;
        let mut hi = entries.len().checked_sub(1)?;
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            if entries[mid].cdf > xi {
                if mid == 0 || entries[mid - 1].cdf <= xi {
                    return Some(mid);
                }
                hi = mid - 1;
            } else {
                lo = mid + 1;
            }
        }
        None
    }

    /// Draws one surface point. Consumes three uniforms in order: CDF
    /// position, then the two in-triangle coordinates.
    pub fn next(&self, rng: &mut UniformRandom) -> Result<UvPoint> {
        let xi = rng.uniform_f64(0.0, self.total);
        let index = self.search(xi).ok_or(HairError::SamplingFailed {
            xi,
            total: self.total,
        })?;
        let entry = &self.sub_triangles[index];

        let xi1 = rng.uniform_number();
        let xi2 = rng.uniform_number();
        let weights = uniform_triangle(xi1, xi2);

        let lattice = &*LATTICE;
        let (mut u, mut v) = (0.0, 0.0);
        for (w, &vertex) in weights.iter().zip(&entry.vertices) {
            let (cu, cv) = lattice.coords(vertex);
            u += w * cu;
            v += w * cv;
        }
        Ok(UvPoint::new(u, v, entry.triangle_id))
    }
}

struct Builder<'a> {
    density: &'a Texture,
    sub_triangles: Vec<SubTriangle>,
    triangle_totals: Vec<(u32, f64)>,
    current_total: f64,
    total: f64,
    leaves: usize,
    scratch: Scratch,
}

impl Builder<'_> {
    /// Depth at which one leaf covers about one texel: the UV footprint in
    /// texels rounded up to a power of two.
    fn target_depth(&self, triangle: &Triangle, max_depth: u32) -> u32 {
        let uv = triangle.uv_coords();
        let extent = |axis: fn(&Vector2) -> f64| {
            let (lo, hi) = uv
                .iter()
                .map(axis)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
            hi - lo
        };
        let footprint = (extent(|p| p.x) * self.density.width() as f64)
            .max(extent(|p| p.y) * self.density.height() as f64);
        if !footprint.is_finite() || footprint <= 1.0 {
            return 0;
        }
        let divisions = (footprint.ceil() as u64).next_power_of_two();
        divisions.trailing_zeros().min(max_depth)
    }

    fn probability(&self, triangle: &Triangle, leaf_area: f64, node: &Node) -> f64 {
        let (u, v) = node.centroid();
        let uv = triangle.uv_at(u, v);
        self.density.real_at_uv(uv.x, uv.y).max(0.0) * leaf_area
    }

    fn emit(&mut self, triangle_id: u32, node: &Node, probability: f64) {
        if probability <= 0.0 {
            return;
        }
        self.total += probability;
        self.current_total += probability;
        self.sub_triangles.push(SubTriangle {
            vertices: node.lattice_indices(),
            cdf: self.total,
            triangle_id,
        });
    }

    fn add_triangle(&mut self, triangle_id: u32, triangle: &Triangle, max_depth: u32) -> Result<()> {
        let depth = self.target_depth(triangle, max_depth);
        let leaf_area = triangle.area() / 4f64.powi(depth as i32);

        self.sub_triangles.try_reserve(1usize << (2 * depth))?;
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.prepare(depth)?;

        scratch.tasks.push(Task::Visit(Node::ROOT));
        while let Some(task) = scratch.tasks.pop() {
            match task {
                Task::Visit(node) if node.depth == depth => {
                    self.leaves += 1;
                    let p = self.probability(triangle, leaf_area, &node);
                    scratch.outcomes.push(Outcome::Uniform(p));
                }
                Task::Visit(node) => {
                    scratch.tasks.push(Task::Merge(node));
                    for child in node.children().into_iter().rev() {
                        scratch.tasks.push(Task::Visit(child));
                    }
                }
                Task::Merge(node) => {
                    let start = scratch.outcomes.len() - 4;
                    let kids = [
                        scratch.outcomes[start],
                        scratch.outcomes[start + 1],
                        scratch.outcomes[start + 2],
                        scratch.outcomes[start + 3],
                    ];
                    scratch.outcomes.truncate(start);

                    let merged = match kids {
                        [Outcome::Uniform(a), Outcome::Uniform(b), Outcome::Uniform(c), Outcome::Uniform(d)]
                            if a == b && b == c && c == d =>
                        {
                            Some(Outcome::Uniform(a * 4.0))
                        }
                        _ => None,
                    };
                    match merged {
                        Some(outcome) => scratch.outcomes.push(outcome),
                        None => {
                            for (child, kid) in node.children().iter().zip(kids) {
                                if let Outcome::Uniform(p) = kid {
                                    self.emit(triangle_id, child, p);
                                }
                            }
                            scratch.outcomes.push(Outcome::Split);
                        }
                    }
                }
            }
        }

        if let Some(Outcome::Uniform(p)) = scratch.outcomes.pop() {
            self.emit(triangle_id, &Node::ROOT, p);
        }
        self.scratch = scratch;
        self.triangle_totals.push((triangle_id, std::mem::take(&mut self.current_total)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler_with(cdfs: &[f64]) -> SurfaceSampler {
        SurfaceSampler {
            sub_triangles: cdfs
                .iter()
                .map(|&cdf| SubTriangle {
                    vertices: [0, 0, 0],
                    cdf,
                    triangle_id: 0,
                })
                .collect(),
            triangle_pdf: vec![(0, 1.0)],
            total: *cdfs.last().unwrap(),
        }
    }

    #[test]
    fn search_picks_first_entry_above_xi() {
        let s = sampler_with(&[1.0, 2.0, 4.0, 8.0]);
        assert_eq!(s.search(0.0), Some(0));
        assert_eq!(s.search(0.999), Some(0));
        assert_eq!(s.search(1.0), Some(1));
        assert_eq!(s.search(3.5), Some(2));
        assert_eq!(s.search(7.99), Some(3));
        assert_eq!(s.search(8.0), None);
    }

    #[test]
    fn search_single_entry() {
        let s = sampler_with(&[0.5]);
        assert_eq!(s.search(0.25), Some(0));
    }

    #[test]
    fn children_tile_parent() {
        let kids = Node::ROOT.children();
        let n = DIVISIONS / 2;
        assert_eq!(kids[0].corners, [(0, 0), (n, 0), (0, n)]);
        assert_eq!(kids[3].corners, [(n, n), (0, n), (n, 0)]);
        assert!(kids.iter().all(|k| k.depth == 1));
    }
}
