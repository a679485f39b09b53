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

use num_traits::Float;

use crate::geometry::vector::{Vector2, Vector3, VectorOps};

pub const EPS: f64 = 1e-10;

/// Linear interpolation: (1-t)*a + t*b
#[inline(always)]
pub fn lerp<F: Float>(a: F, b: F, t: F) -> F {
    a + (b - a) * t
}

/// Piecewise linear interpolation through three control values placed at
/// t = 0, t = `center` and t = 1.
pub fn lerp3<F: Float>(root: F, center: F, tip: F, center_t: F, t: F) -> F {
    let t = num_traits::clamp(t, F::zero(), F::one());
    if center_t <= F::zero() {
        return lerp(center, tip, t);
    }
    if center_t >= F::one() {
        return lerp(root, center, t);
    }
    if t <= center_t {
        lerp(root, center, t / center_t)
    } else {
        lerp(center, tip, (t - center_t) / (F::one() - center_t))
    }
}

pub fn triangle_area(a: &Vector3, b: &Vector3, c: &Vector3) -> f64 {
    0.5 * (*b - *a).cross(&(*c - *a)).norm()
}

/// Point-in-triangle by signed area. All three unnormalized barycentric
/// numerators must share the sign of the determinant; points on an edge are
/// accepted.
pub fn point_in_triangle_2d(p: &Vector2, a: &Vector2, b: &Vector2, c: &Vector2) -> Option<(f64, f64, f64)> {
    let e1 = *b - *a;
    let e2 = *c - *a;
    let d = *p - *a;

    let det = e1.cross(&e2);
    if det.abs() <= EPS * EPS {
        return None;
    }

    let nb = d.cross(&e2);
    let nc = e1.cross(&d);
    let na = det - nb - nc;

    let inside = if det > 0.0 {
        na >= 0.0 && nb >= 0.0 && nc >= 0.0
    } else {
        na <= 0.0 && nb <= 0.0 && nc <= 0.0
    };
    inside.then(|| (na / det, nb / det, nc / det))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp3_hits_control_points() {
        assert_eq!(lerp3(1.0, 2.0, 4.0, 0.5, 0.0), 1.0);
        assert_eq!(lerp3(1.0, 2.0, 4.0, 0.5, 0.5), 2.0);
        assert_eq!(lerp3(1.0, 2.0, 4.0, 0.5, 1.0), 4.0);
        assert_eq!(lerp3(1.0, 2.0, 4.0, 0.5, 0.75), 3.0);
    }

    #[test]
    fn point_in_triangle_either_winding() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(1.0, 0.0);
        let c = Vector2::new(0.0, 1.0);
        let p = Vector2::new(0.25, 0.25);
        assert!(point_in_triangle_2d(&p, &a, &b, &c).is_some());
        assert!(point_in_triangle_2d(&p, &a, &c, &b).is_some());
        assert!(point_in_triangle_2d(&Vector2::new(0.8, 0.8), &a, &b, &c).is_none());
        assert!(point_in_triangle_2d(&p, &a, &a, &c).is_none());
    }
}
