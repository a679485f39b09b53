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

use crate::geometry::vector::{Vector2, Vector3};

/// An axis‐aligned bounding box in N dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb<const N: usize> {
    pub min: [f64; N],
    pub max: [f64; N],
}

impl<const N: usize> Default for Aabb<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> Aabb<N> {
    pub fn new(min: [f64; N], max: [f64; N]) -> Self {
        Aabb { min, max }
    }

    /// Box containing nothing; the identity for `extend`.
    pub fn empty() -> Self {
        Aabb {
            min: [f64::INFINITY; N],
            max: [f64::NEG_INFINITY; N],
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..N).any(|i| self.min[i] > self.max[i])
    }

    pub fn extend(&mut self, p: &[f64; N]) {
        for i in 0..N {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    /// Length along axis `i`.
    pub fn extent(&self, i: usize) -> f64 {
        (self.max[i] - self.min[i]).max(0.0)
    }

    /// Return the axis index with largest extent.
    pub fn longest_axis(&self) -> usize {
        let mut best_i = 0usize;
        let mut best = self.extent(0);
        for i in 1..N {
            let e = self.extent(i);
            if e > best {
                best_i = i;
                best = e;
            }
        }
        best_i
    }
}

impl Aabb<2> {
    pub fn from_uvs(uvs: &[Vector2]) -> Self {
        let mut b = Self::empty();
        for uv in uvs {
            b.extend(&[uv.x, uv.y]);
        }
        b
    }
}

impl Aabb<3> {
    pub fn from_vectors<'a>(points: impl IntoIterator<Item = &'a Vector3>) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.extend(&p.to_array());
        }
        b
    }

    pub fn min_vector(&self) -> Vector3 {
        Vector3::from_array(self.min)
    }

    pub fn max_vector(&self) -> Vector3 {
        Vector3::from_array(self.max)
    }
}
