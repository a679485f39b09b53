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

//! Spatial partition of the surface used to bound and parallelize work.

use ahash::AHashMap;

use crate::mesh::{MeshSurface, Pose};

/// Triangles whose rest barycenters fall in one grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voxel {
    pub key: [u32; 3],
    pub triangles: Vec<u32>,
}

/// Buckets triangles by rest barycenter into a `resolution`³ grid over the
/// rest bounding box. Only occupied voxels are returned, ordered by key.
pub fn voxelize<M: MeshSurface>(mesh: &M, resolution: u32) -> Vec<Voxel> {
    let resolution = resolution.max(1);
    let bounds = mesh.bounding_box(Pose::Rest);
    let mut cells: AHashMap<[u32; 3], Vec<u32>> = AHashMap::default();

    for (id, triangle) in mesh.triangles(Pose::Rest) {
        let c = triangle.barycenter.to_array();
        let key: [u32; 3] = std::array::from_fn(|axis| {
            let extent = bounds.extent(axis);
            if !(extent > 0.0) {
                return 0;
            }
            let f = (c[axis] - bounds.min[axis]) / extent;
            ((f * resolution as f64) as u32).min(resolution - 1)
        });
        cells.entry(key).or_default().push(id);
    }

    let mut voxels: Vec<Voxel> = cells
        .into_iter()
        .map(|(key, triangles)| Voxel { key, triangles })
        .collect();
    voxels.sort_unstable_by_key(|v| v.key);
    voxels
}

/// Splits `count` in proportion to `weights` by largest remainder. Equal
/// remainders favour the lower index. Non-positive weights get nothing.
pub fn apportion(weights: &[f64], count: usize) -> Vec<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if !(total > 0.0) {
        return vec![0; weights.len()];
    }

    let mut shares = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for (i, &w) in weights.iter().enumerate() {
        let exact = if w > 0.0 { count as f64 * w / total } else { 0.0 };
        let floor = exact.floor();
        shares.push(floor as usize);
        if w > 0.0 {
            remainders.push((exact - floor, i));
        }
    }

    let assigned: usize = shares.iter().sum();
    remainders.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, i) in remainders.iter().take(count.saturating_sub(assigned)) {
        shares[i] += 1;
    }
    shares
}
