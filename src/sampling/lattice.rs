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

//! Regular triangular lattice of barycentric vertices shared by every
//! triangle. A sub-triangle at any subdivision depth up to `MAX_DEPTH` has its
//! corners on this lattice.

use once_cell::sync::Lazy;

pub const MAX_DEPTH: u32 = 8;

/// Lattice steps along each edge of the unit triangle.
pub const DIVISIONS: u32 = 1 << MAX_DEPTH;

pub static LATTICE: Lazy<BarycentricLattice> = Lazy::new(BarycentricLattice::build);

/// Vertex `(i, j)` with `i + j <= DIVISIONS` sits at barycentric
/// `(u, v) = (i, j) / DIVISIONS`.
pub struct BarycentricLattice {
    coords: Vec<(f64, f64)>,
}

impl BarycentricLattice {
    fn build() -> Self {
        let n = DIVISIONS;
        let mut coords = Vec::with_capacity(Self::vertex_count());
        for i in 0..=n {
            for j in 0..=(n - i) {
                coords.push((i as f64 / n as f64, j as f64 / n as f64));
            }
        }
        BarycentricLattice { coords }
    }

    pub const fn vertex_count() -> usize {
        let n = DIVISIONS as usize;
        (n + 1) * (n + 2) / 2
    }

    /// Closed-form index of vertex `(i, j)`: row `i` holds `DIVISIONS + 1 - i`
    /// vertices.
    #[inline]
    pub const fn index(i: u32, j: u32) -> u32 {
        let n = DIVISIONS;
        i * (n + 1) - i * (i.saturating_sub(1)) / 2 + j
    }

    #[inline]
    pub fn coords(&self, index: u32) -> (f64, f64) {
        self.coords[index as usize]
    }
}
