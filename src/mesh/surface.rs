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

use crate::{
    error::{HairError, Result},
    geometry::{Aabb, Vector2, Vector3, VectorOps},
    mesh::{
        mesh_point::{MeshPoint, UvPoint},
        triangle::Triangle,
    },
};

/// Which vertex positions to evaluate against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Undeformed positions; guide anchors and neighbour distances live here.
    Rest,
    /// Live, possibly deformed positions that hair is emitted on.
    Current,
}

/// Read-only view of a triangulated surface.
pub trait MeshSurface: Sync {
    fn triangle_count(&self) -> usize;

    fn triangle(&self, id: u32, pose: Pose) -> Option<Triangle>;

    fn bounding_box(&self, pose: Pose) -> Aabb<3>;

    /// `None` for the not-found sentinel or an out-of-range triangle.
    fn mesh_point(&self, uv: &UvPoint, pose: Pose) -> Option<MeshPoint> {
        let triangle = self.triangle(uv.triangle()?, pose)?;
        Some(triangle.point_at(uv.u, uv.v))
    }

    /// Lazily evaluated `(id, triangle)` pairs.
    fn triangles(&self, pose: Pose) -> impl Iterator<Item = (u32, Triangle)> + '_
    where
        Self: Sized,
    {
        (0..self.triangle_count() as u32)
            .filter_map(move |id| self.triangle(id, pose).map(|t| (id, t)))
    }
}

#[derive(Clone, Debug)]
struct PoseData {
    positions: Vec<Vector3>,
    normals: Vec<Vector3>,
    tangents: Vec<Vector3>,
    bounds: Aabb<3>,
}

impl PoseData {
    fn build(positions: Vec<Vector3>, uvs: &[Vector2], indices: &[[u32; 3]]) -> Self {
        let normals = vertex_normals(&positions, indices);
        let tangents = vertex_tangents(&positions, uvs, indices, &normals);
        let bounds = Aabb::from_vectors(&positions);
        PoseData {
            positions,
            normals,
            tangents,
            bounds,
        }
    }
}

/// Indexed triangle mesh with one UV per vertex and separate rest and current
/// vertex positions sharing the same topology.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    uvs: Vec<Vector2>,
    indices: Vec<[u32; 3]>,
    rest: PoseData,
    current: PoseData,
}

impl TriangleMesh {
    pub fn new(positions: Vec<Vector3>, uvs: Vec<Vector2>, indices: Vec<[u32; 3]>) -> Result<Self> {
        if positions.len() != uvs.len() {
            return Err(HairError::InvalidMesh(format!(
                "{} positions but {} uvs",
                positions.len(),
                uvs.len()
            )));
        }
        if let Some(bad) = indices
            .iter()
            .flatten()
            .find(|&&i| i as usize >= positions.len())
        {
            return Err(HairError::InvalidMesh(format!(
                "vertex index {bad} out of range ({} vertices)",
                positions.len()
            )));
        }

        let rest = PoseData::build(positions, &uvs, &indices);
        let current = rest.clone();
        Ok(TriangleMesh {
            uvs,
            indices,
            rest,
            current,
        })
    }

    /// Flat square of side `size` in the XY plane facing +Z, split into
    /// `divisions x divisions` quads of two triangles each. UVs span the unit
    /// square.
    pub fn plane(size: f64, divisions: u32) -> Result<Self> {
        let n = divisions.max(1);
        let mut positions = Vec::new();
        let mut uvs = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                let u = i as f64 / n as f64;
                let v = j as f64 / n as f64;
                positions.push(Vector3::new(u * size, v * size, 0.0));
                uvs.push(Vector2::new(u, v));
            }
        }

        let row = n + 1;
        let mut indices = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let a = j * row + i;
                let b = a + 1;
                let c = a + row;
                let d = c + 1;
                indices.push([a, b, d]);
                indices.push([a, d, c]);
            }
        }
        Self::new(positions, uvs, indices)
    }

    pub fn vertex_count(&self) -> usize {
        self.uvs.len()
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn uvs(&self) -> &[Vector2] {
        &self.uvs
    }

    pub fn positions(&self, pose: Pose) -> &[Vector3] {
        &self.pose(pose).positions
    }

    /// Move the live surface. Topology and UVs are unchanged.
    pub fn set_current_positions(&mut self, positions: Vec<Vector3>) -> Result<()> {
        if positions.len() != self.uvs.len() {
            return Err(HairError::InvalidMesh(format!(
                "{} current positions for {} vertices",
                positions.len(),
                self.uvs.len()
            )));
        }
        self.current = PoseData::build(positions, &self.uvs, &self.indices);
        Ok(())
    }

    fn pose(&self, pose: Pose) -> &PoseData {
        match pose {
            Pose::Rest => &self.rest,
            Pose::Current => &self.current,
        }
    }

    fn vertex_point(&self, data: &PoseData, index: u32) -> MeshPoint {
        let i = index as usize;
        MeshPoint {
            position: data.positions[i],
            normal: data.normals[i],
            tangent: data.tangents[i],
            u: self.uvs[i].x,
            v: self.uvs[i].y,
        }
    }
}

impl MeshSurface for TriangleMesh {
    fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    fn triangle(&self, id: u32, pose: Pose) -> Option<Triangle> {
        let [a, b, c] = *self.indices.get(id as usize)?;
        let data = self.pose(pose);
        Some(Triangle::new(
            self.vertex_point(data, a),
            self.vertex_point(data, b),
            self.vertex_point(data, c),
        ))
    }

    fn bounding_box(&self, pose: Pose) -> Aabb<3> {
        self.pose(pose).bounds
    }
}

/// Area-weighted smooth normals: the unnormalized face cross product already
/// carries twice the triangle area.
fn vertex_normals(positions: &[Vector3], indices: &[[u32; 3]]) -> Vec<Vector3> {
    let mut accum = vec![Vector3::ZERO; positions.len()];
    for &[a, b, c] in indices {
        let (pa, pb, pc) = (positions[a as usize], positions[b as usize], positions[c as usize]);
        let weighted = (pb - pa).cross(&(pc - pa));
        accum[a as usize] += weighted;
        accum[b as usize] += weighted;
        accum[c as usize] += weighted;
    }
    accum
        .into_iter()
        .map(|n| n.direction().unwrap_or(Vector3::Y))
        .collect()
}

/// Tangents whose part off the normal is below this fraction of their length
/// are treated as parallel to it.
const TANGENT_TOLERANCE: f64 = 1e-9;


/// Per-vertex dP/du, orthogonalized against the vertex normal.
fn vertex_tangents(
    positions: &[Vector3],
    uvs: &[Vector2],
    indices: &[[u32; 3]],
    normals: &[Vector3],
) -> Vec<Vector3> {
    let mut accum = vec![Vector3::ZERO; positions.len()];
    for &[a, b, c] in indices {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let e1 = positions[b] - positions[a];
        let e2 = positions[c] - positions[a];
        let d1 = uvs[b] - uvs[a];
        let d2 = uvs[c] - uvs[a];
        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < 1e-20 {
            continue;
        }
        let dp_du = (e1 * d2.y - e2 * d1.y) / det;
        accum[a] += dp_du;
        accum[b] += dp_du;
        accum[c] += dp_du;
    }
    accum
        .into_iter()
        .zip(normals)
        .map(|(t, n)| {
            let along = t - *n * t.dot(n);
            if along.norm() > TANGENT_TOLERANCE * t.norm() {
                along.direction().unwrap_or_else(|| n.any_perpendicular())
            } else {
                n.any_perpendicular()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_mesh_keeps_its_frame() {
        let mesh = TriangleMesh::plane(1e-5, 4).unwrap();
        let positions = mesh.positions(Pose::Rest);
        let normals = vertex_normals(positions, mesh.indices());
        assert!(normals.iter().all(|n| (*n - Vector3::Z).norm() < 1e-12));

        let tangents = vertex_tangents(positions, mesh.uvs(), mesh.indices(), &normals);
        assert!(tangents.iter().all(|t| (*t - Vector3::X).norm() < 1e-9));
    }

    #[test]
    fn degenerate_normal_falls_back() {
        let positions = [Vector3::ZERO, Vector3::X, Vector3::X * 2.0];
        let normals = vertex_normals(&positions, &[[0, 1, 2]]);
        assert_eq!(normals, vec![Vector3::Y; 3]);
    }
}
