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

use std::f64::consts::TAU;

/// Uniform point in a triangle from two uniforms via the square-root
/// transform. Returns the weights of the three corners.
#[inline]
pub fn uniform_triangle(xi1: f64, xi2: f64) -> [f64; 3] {
    let su = xi1.sqrt();
    let a = 1.0 - su;
    let b = xi2 * su;
    [a, b, 1.0 - a - b]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiskSample {
    pub cos: f64,
    pub sin: f64,
    pub radius: f64,
}

impl DiskSample {
    pub fn x(&self) -> f64 {
        self.radius * self.cos
    }

    pub fn y(&self) -> f64 {
        self.radius * self.sin
    }
}

/// Uniform point on the unit disk by polar mapping: the first uniform picks
/// the angle, the square root of the second the radius.
#[inline]
pub fn uniform_disk(xi1: f64, xi2: f64) -> DiskSample {
    let (sin, cos) = (TAU * xi1).sin_cos();
    DiskSample {
        cos,
        sin,
        radius: xi2.sqrt(),
    }
}
