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

//! Procedural deformation stages applied to a blended hair in its root's
//! local frame (tangent X, normal Y, binormal Z; root at the origin).
//!
//! Every stage accepts curves with zero or one point and leaves them alone.
//! Stages whose parameters are neutral return without touching the points.

use std::f64::consts::TAU;

use crate::{
    geometry::{Vector3, VectorOps, util::{EPS, lerp}},
    hair::properties::HairProperties,
    numeric::Rgb,
};

/// Texture-modulated parameters evaluated once at a hair's root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootParameters {
    pub scale: f64,
    pub displacement: f64,
    pub root_frizz: f64,
    pub tip_frizz: f64,
    pub root_kink: f64,
    pub tip_kink: f64,
    pub cut: f64,
    pub root_color: Rgb,
    pub tip_color: Rgb,
}

impl RootParameters {
    pub fn sample(props: &HairProperties, u: f64, v: f64) -> Self {
        RootParameters {
            scale: props.scale.at(u, v),
            displacement: props.displacement.at(u, v),
            root_frizz: props.root_frizz.at(u, v),
            tip_frizz: props.tip_frizz.at(u, v),
            root_kink: props.root_kink.at(u, v),
            tip_kink: props.tip_kink.at(u, v),
            cut: props.cut.at(u, v).clamp(0.0, 1.0),
            root_color: props.root_color.at(u, v),
            tip_color: props.tip_color.at(u, v),
        }
    }
}

/// Curve parameter of point `i` out of `n`.
#[inline]
pub fn curve_t(i: usize, n: usize) -> f64 {
    if n <= 1 { 0.0 } else { i as f64 / (n - 1) as f64 }
}

pub fn scale(points: &mut [Vector3], s: f64) {
    if s == 1.0 {
        return;
    }
    for p in points.iter_mut() {
        *p *= s;
    }
}

/// Moves the whole hair along the root normal.
pub fn displace(points: &mut [Vector3], d: f64) {
    if d == 0.0 {
        return;
    }
    let offset = Vector3::Y * d;
    for p in points.iter_mut() {
        *p += offset;
    }
}

/// Adds `amplitude(t) * sin(TAU * frequency * t + phase)` per axis to every
/// point but the root, with the amplitude linear from root to tip.
pub fn wave(points: &mut [Vector3], root_amplitude: f64, tip_amplitude: f64, frequency: &Vector3, phase: &Vector3) {
    if root_amplitude == 0.0 && tip_amplitude == 0.0 {
        return;
    }
    let n = points.len();
    for (i, p) in points.iter_mut().enumerate().skip(1) {
        let t = curve_t(i, n);
        let amplitude = lerp(root_amplitude, tip_amplitude, t);
        let offset = Vector3::new(
            (TAU * frequency.x * t + phase.x).sin(),
            (TAU * frequency.y * t + phase.y).sin(),
            (TAU * frequency.z * t + phase.z).sin(),
        );
        *p += offset * amplitude;
    }
}

/// Frizz phase: decorrelated per hair through its rest root position and
/// advanced along the animation direction over time.
pub fn frizz_phase(props: &HairProperties, rest_root: &Vector3) -> Vector3 {
    let spatial = rest_root.component_mul(&props.frizz_frequency) * TAU;
    let anim = props.frizz_anim_direction.normalized() * (props.frizz_anim_speed * props.time * TAU);
    spatial + anim
}

pub fn frizz(points: &mut [Vector3], props: &HairProperties, params: &RootParameters, rest_root: &Vector3) {
    if params.root_frizz == 0.0 && params.tip_frizz == 0.0 {
        return;
    }
    let phase = frizz_phase(props, rest_root);
    wave(points, params.root_frizz, params.tip_frizz, &props.frizz_frequency, &phase);
}

/// Coherent across hairs: no per-root phase and no animation.
pub fn kink(points: &mut [Vector3], props: &HairProperties, params: &RootParameters) {
    wave(points, params.root_kink, params.tip_kink, &props.kink_frequency, &Vector3::ZERO);
}

/// Scale, displacement, frizz then kink.
pub fn shape(points: &mut [Vector3], props: &HairProperties, params: &RootParameters, rest_root: &Vector3) {
    scale(points, params.scale);
    displace(points, params.displacement);
    frizz(points, props, params, rest_root);
    kink(points, props, params);
}

pub fn arc_length(points: &[Vector3]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// One point or all points within `EPS` of the first.
pub fn is_degenerate(points: &[Vector3]) -> bool {
    match points.first() {
        None => true,
        Some(first) => points.iter().all(|p| p.distance(first) <= EPS),
    }
}

/// Removes the tip fraction `cut` of the arc length, ending on an
/// interpolated point. Degenerate results collapse to the root alone.
/// Returns whether the curve is degenerate.
pub fn cut(points: &mut Vec<Vector3>, cut: f64) -> bool {
    if points.len() > 1 && cut > 0.0 {
        let keep = arc_length(points) * (1.0 - cut.min(1.0));
        let mut walked = 0.0;
        let mut end = points.len();
        for i in 1..points.len() {
            let step = points[i - 1].distance(&points[i]);
            if walked + step >= keep {
                if step > 0.0 {
                    let f = (keep - walked) / step;
                    points[i] = points[i - 1].lerp(&points[i], f);
                }
                end = i + 1;
                break;
            }
            walked += step;
        }
        points.truncate(end);
    }

    let degenerate = is_degenerate(points);
    if degenerate {
        points.truncate(1);
    }
    degenerate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(n: usize) -> Vec<Vector3> {
        (0..n).map(|i| Vector3::new(0.0, i as f64, 0.0)).collect()
    }

    #[test]
    fn wave_keeps_root() {
        let mut pts = straight(5);
        wave(&mut pts, 0.5, 1.0, &Vector3::splat(2.0), &Vector3::splat(0.3));
        assert_eq!(pts[0], Vector3::ZERO);
        assert_ne!(pts[4], Vector3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn cut_half_of_straight_hair() {
        let mut pts = straight(5);
        assert!(!cut(&mut pts, 0.5));
        assert_eq!(pts.len(), 3);
        assert!((pts[2].y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn cut_between_points_interpolates() {
        let mut pts = straight(3);
        cut(&mut pts, 0.25);
        assert_eq!(pts.len(), 3);
        assert!((pts[2].y - 1.5).abs() < 1e-12);
    }

    #[test]
    fn full_cut_collapses() {
        let mut pts = straight(4);
        assert!(cut(&mut pts, 1.0));
        assert_eq!(pts, vec![Vector3::ZERO]);
    }

    #[test]
    fn empty_and_single_point_curves() {
        let mut empty: Vec<Vector3> = Vec::new();
        assert!(cut(&mut empty, 0.5));
        let mut one = vec![Vector3::X];
        wave(&mut one, 1.0, 1.0, &Vector3::splat(1.0), &Vector3::ZERO);
        assert_eq!(one, vec![Vector3::X]);
        assert!(cut(&mut one, 0.0));
    }
}
