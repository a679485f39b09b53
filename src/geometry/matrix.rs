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

use std::{
    array,
    ops::{Index, IndexMut},
};

use crate::geometry::vector::Vector3;

/// Generic row-major matrix R x C
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix<const R: usize, const C: usize>(pub [[f64; C]; R]);

pub type Matrix4 = Matrix<4, 4>;

// ---------- Basics ----------
impl<const R: usize, const C: usize> Matrix<R, C> {
    #[inline]
    pub fn new(data: [[f64; C]; R]) -> Self {
        Matrix(data)
    }

    /// Matrix filled with a single value.
    #[inline]
    pub fn splat(val: f64) -> Self {
        Matrix([[val; C]; R])
    }

    #[inline]
    pub fn zero() -> Self {
        Self::splat(0.0)
    }

    /// Build from columns.
    #[inline]
    pub fn from_cols(cols: [[f64; R]; C]) -> Self {
        let mut m = Matrix::<R, C>::zero();
        for i in 0..R {
            for j in 0..C {
                m[i][j] = cols[j][i];
            }
        }
        m
    }
}

impl<const N: usize> Matrix<N, N> {
    pub fn identity() -> Self {
        Matrix(array::from_fn(|i| array::from_fn(|j| if i == j { 1.0 } else { 0.0 })))
    }
}

impl Matrix4 {
    /// Affine frame whose columns are the three axes followed by the origin.
    pub fn from_frame(x_axis: Vector3, y_axis: Vector3, z_axis: Vector3, origin: Vector3) -> Self {
        Matrix::from_cols([
            [x_axis.x, x_axis.y, x_axis.z, 0.0],
            [y_axis.x, y_axis.y, y_axis.z, 0.0],
            [z_axis.x, z_axis.y, z_axis.z, 0.0],
            [origin.x, origin.y, origin.z, 1.0],
        ])
    }

    /// Inverse of a rigid frame (orthonormal rotation plus translation).
    pub fn rigid_inverse(&self) -> Self {
        let mut inv = Matrix4::identity();
        for i in 0..3 {
            for j in 0..3 {
                inv[i][j] = self[j][i];
            }
        }
        for i in 0..3 {
            inv[i][3] = -(0..3).map(|k| inv[i][k] * self[k][3]).sum::<f64>();
        }
        inv
    }

    pub fn transform_point(&self, p: &Vector3) -> Vector3 {
        Vector3::new(
            self[0][0] * p.x + self[0][1] * p.y + self[0][2] * p.z + self[0][3],
            self[1][0] * p.x + self[1][1] * p.y + self[1][2] * p.z + self[1][3],
            self[2][0] * p.x + self[2][1] * p.y + self[2][2] * p.z + self[2][3],
        )
    }
}

// ---------- Indexing ----------
impl<const R: usize, const C: usize> Index<usize> for Matrix<R, C> {
    type Output = [f64; C];
    #[inline]
    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}
impl<const R: usize, const C: usize> IndexMut<usize> for Matrix<R, C> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.0[i]
    }
}
