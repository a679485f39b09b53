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
    geometry::{Vector2, Vector3, VectorOps, util::triangle_area},
    mesh::mesh_point::MeshPoint,
};

/// Three surface points and their cached barycenter.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [MeshPoint; 3],
    pub barycenter: Vector3,
}

impl Triangle {
    pub fn new(vertex1: MeshPoint, vertex2: MeshPoint, vertex3: MeshPoint) -> Self {
        let barycenter = (vertex1.position + vertex2.position + vertex3.position) / 3.0;
        Triangle {
            vertices: [vertex1, vertex2, vertex3],
            barycenter,
        }
    }

    pub fn area(&self) -> f64 {
        let [a, b, c] = &self.vertices;
        triangle_area(&a.position, &b.position, &c.position)
    }

    /// Zero for a degenerate triangle.
    pub fn face_normal(&self) -> Vector3 {
        let [a, b, c] = &self.vertices;
        (b.position - a.position)
            .cross(&(c.position - a.position))
            .direction()
            .unwrap_or(Vector3::ZERO)
    }

    pub fn uv_coords(&self) -> [Vector2; 3] {
        self.vertices.each_ref().map(MeshPoint::uv)
    }

    /// Texture coordinate at barycentric `(u, v)`.
    pub fn uv_at(&self, u: f64, v: f64) -> Vector2 {
        let [a, b, c] = self.uv_coords();
        let w = 1.0 - u - v;
        Vector2::new(w * a.x + u * b.x + v * c.x, w * a.y + u * b.y + v * c.y)
    }

    /// Evaluates the surface at barycentric `(u, v)`. Normal and tangent are
    /// interpolated then re-orthonormalized.
    pub fn point_at(&self, u: f64, v: f64) -> MeshPoint {
        let [a, b, c] = &self.vertices;
        let w = 1.0 - u - v;

        let position = a.position * w + b.position * u + c.position * v;

        let mut normal = (a.normal * w + b.normal * u + c.normal * v).normalized();
        if normal == Vector3::ZERO {
            normal = self.face_normal();
        }
        if normal == Vector3::ZERO {
            normal = Vector3::Y;
        }

        let mut tangent = (a.tangent * w + b.tangent * u + c.tangent * v).orthogonalized(&normal);
        if tangent == Vector3::ZERO {
            tangent = normal.any_perpendicular();
        }

        let uv = self.uv_at(u, v);
        MeshPoint {
            position,
            normal,
            tangent,
            u: uv.x,
            v: uv.y,
        }
    }
}
