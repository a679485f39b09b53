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

//! Turns deformed world-space points into output curves: frames along the
//! curve, per-vertex color, opacity and width.

use crate::{
    geometry::{Vector2, Vector3, VectorOps, util::{EPS, lerp}},
    hair::{deformation::{RootParameters, curve_t}, properties::HairProperties},
    mesh::{MeshPoint, UvPoint},
    numeric::{Hsv, Rgb, UniformRandom},
};

/// One output vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveVertex {
    pub position: Vector3,
    pub color: Rgb,
    pub opacity: f64,
    pub width: f64,
    pub normal: Vector3,
    /// Texture coordinates of the hair root.
    pub uv: Vector2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HairCurve {
    pub vertices: Vec<CurveVertex>,
    pub root_uv: UvPoint,
    pub group: u32,
    /// Collapsed to its root point.
    pub degenerate: bool,
}

/// Root and tip appearance of one hair. Colors stay in HSV until written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HairStyle {
    pub root_color: Hsv,
    pub tip_color: Hsv,
    pub root_opacity: f64,
    pub tip_opacity: f64,
    pub root_width: f64,
    pub tip_width: f64,
}

impl HairStyle {
    /// Consumes exactly three uniforms: mutant roll, hue jitter, value jitter.
    pub fn draw(props: &HairProperties, params: &RootParameters, rng: &mut UniformRandom) -> Self {
        let mutant = rng.uniform_number() < props.mutant_percent;
        let dh = props.hue_variation * (2.0 * rng.uniform_number() - 1.0);
        let dv = 1.0 + props.value_variation * (2.0 * rng.uniform_number() - 1.0);

        let (root, tip) = if mutant {
            let m = props.mutant_color.to_hsv();
            (m, m)
        } else {
            (params.root_color.to_hsv(), params.tip_color.to_hsv())
        };
        HairStyle {
            root_color: root.shifted(dh, dv),
            tip_color: tip.shifted(dh, dv),
            root_opacity: props.root_opacity,
            tip_opacity: props.tip_opacity,
            root_width: props.root_width,
            tip_width: props.tip_width,
        }
    }

    /// Color at curve parameter `t`, converted to RGB.
    pub fn color_at(&self, t: f64) -> Rgb {
        self.root_color.lerp(&self.tip_color, t).to_rgb()
    }
}

/// Unit tangents by finite differences: forward at the root, backward at the
/// tip, central in between. Zero-length differences reuse the previous
/// tangent, or `fallback` when there is none.
pub fn tangents(points: &[Vector3], fallback: &Vector3) -> Vec<Vector3> {
    let n = points.len();
    let mut out = Vec::with_capacity(n);
    let mut prev = *fallback;
    for i in 0..n {
        let (a, b) = (points[i.saturating_sub(1)], points[(i + 1).min(n - 1)]);
        let d = b - a;
        let t = if d.norm() > EPS { d.normalized() } else { prev };
        out.push(t);
        prev = t;
    }
    out
}

/// Normals carried along the curve: each is the previous one with its
/// component along the new tangent removed. When that vanishes any
/// perpendicular is taken.
pub fn transport_normals(tangents: &[Vector3], initial: &Vector3) -> Vec<Vector3> {
    let mut out = Vec::with_capacity(tangents.len());
    let mut prev = *initial;
    for t in tangents {
        let mut n = prev.orthogonalized(t);
        if n.norm() <= EPS {
            n = t.any_perpendicular();
        }
        out.push(n);
        prev = n;
    }
    out
}

/// Whether interior point `i` can be dropped: it lies within `threshold` of
/// the chord between its neighbours and the tangent barely turns.
fn skippable(points: &[Vector3], tangents: &[Vector3], prev: usize, i: usize, threshold: f64) -> bool {
    let (a, p, b) = (points[prev], points[i], points[i + 1]);
    let chord = b - a;
    let len = chord.norm();
    let off_line = if len > EPS {
        (p - a).cross(&chord).norm() / len
    } else {
        p.distance(&a)
    };
    let turn = 1.0 - tangents[prev].dot(&tangents[i + 1]);
    off_line < threshold && turn < threshold
}

/// Output vertices for world-space `points` of a hair rooted at `root`.
/// The root normal stands in for the tangent of a collapsed curve and the
/// root tangent seeds the transported normals. `skip` drops near-colinear
/// interior points.
pub fn assemble(points: &[Vector3], style: &HairStyle, root: &MeshPoint, skip: Option<f64>) -> Vec<CurveVertex> {
    let n = points.len();
    let tangents = tangents(points, &root.normal);
    let normals = transport_normals(&tangents, &root.tangent);

    let mut keep: Vec<usize> = Vec::with_capacity(n);
    for i in 0..n {
        if i > 0 && i + 1 < n {
            if let (Some(threshold), Some(&prev)) = (skip, keep.last()) {
                if skippable(points, &tangents, prev, i, threshold) {
                    continue;
                }
            }
        }
        keep.push(i);
    }

    keep.into_iter()
        .map(|i| {
            let t = curve_t(i, n);
            CurveVertex {
                position: points[i],
                color: style.color_at(t),
                opacity: lerp(style.root_opacity, style.tip_opacity, t),
                width: lerp(style.root_width, style.tip_width, t),
                normal: normals[i],
                uv: root.uv(),
            }
        })
        .collect()
}
