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

use crate::geometry::{Matrix4, Vector2, Vector3, VectorOps};

/// A position on the surface with its local frame and texture coordinates.
///
/// The binormal is always derived from the tangent and normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshPoint {
    pub position: Vector3,
    pub normal: Vector3,
    pub tangent: Vector3,
    pub u: f64,
    pub v: f64,
}

impl MeshPoint {
    pub fn binormal(&self) -> Vector3 {
        self.tangent.cross(&self.normal).normalized()
    }

    pub fn uv(&self) -> Vector2 {
        Vector2::new(self.u, self.v)
    }

    /// Local frame with tangent as X, normal as Y and binormal as Z, centered
    /// on the position. Hair grows along local +Y.
    pub fn local_to_world(&self) -> Matrix4 {
        Matrix4::from_frame(self.tangent, self.normal, self.binormal(), self.position)
    }

    pub fn world_to_local(&self) -> Matrix4 {
        self.local_to_world().rigid_inverse()
    }
}

/// Barycentric location `(u, v)` inside triangle `triangle_id`; the weights of
/// the triangle's three vertices are `(1 - u - v, u, v)`.
///
/// `triangle_id == UvPoint::NOT_FOUND` marks a location that did not resolve
/// to any triangle. That is an ordinary outcome, not an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvPoint {
    pub u: f64,
    pub v: f64,
    pub triangle_id: u32,
}

impl UvPoint {
    pub const NOT_FOUND: u32 = u32::MAX;

    pub fn new(u: f64, v: f64, triangle_id: u32) -> Self {
        Self { u, v, triangle_id }
    }

    pub fn not_found() -> Self {
        Self::new(0.0, 0.0, Self::NOT_FOUND)
    }

    pub fn is_found(&self) -> bool {
        self.triangle_id != Self::NOT_FOUND
    }

    pub fn triangle(&self) -> Option<u32> {
        self.is_found().then_some(self.triangle_id)
    }

    /// Weights of vertex1, vertex2 and vertex3.
    pub fn weights(&self) -> [f64; 3] {
        [1.0 - self.u - self.v, self.u, self.v]
    }
}
