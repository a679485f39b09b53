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

//! Expansion of one interpolated hair into a clump of child strands.

use std::f64::consts::TAU;

use crate::{
    geometry::{Vector3, VectorOps, util::lerp3},
    hair::{assembly, deformation::curve_t, properties::HairProperties},
    numeric::UniformRandom,
    sampling::warp::{DiskSample, uniform_disk},
};

/// Position of the center control point of the splay profile.
pub const SPLAY_CENTER_T: f64 = 0.5;

/// Per-strand random values, drawn in field order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrandJitter {
    pub disk: DiskSample,
    /// Multiplies the splay profile.
    pub splay: f64,
    /// Relative stretch of the strand at its tip.
    pub axial: f64,
}

impl StrandJitter {
    /// Consumes exactly four uniforms: disk angle, disk radius, splay, axial.
    pub fn draw(props: &HairProperties, rng: &mut UniformRandom) -> Self {
        let xi1 = rng.uniform_number();
        let xi2 = rng.uniform_number();
        let splay = rng.uniform_number();
        let axial = rng.uniform_number();
        StrandJitter {
            disk: uniform_disk(xi1, xi2),
            splay: 1.0 + props.randomize_strand * (2.0 * splay - 1.0),
            axial: props.strand_offset * (2.0 * axial - 1.0),
        }
    }
}

/// Child strand around `main`. Each point carries a frame transported along
/// the main hair, starting from the local X axis. The disk offset, scaled by
/// the splay profile and the binormal aspect, lies in that frame's
/// normal/binormal plane and turns about the hair by the twist angle. The
/// strand is stretched along itself by the axial jitter, growing toward the
/// tip.
pub fn strand(main: &[Vector3], props: &HairProperties, jitter: &StrandJitter) -> Vec<Vector3> {
    let n = main.len();
    let dx = jitter.disk.x();
    let dz = jitter.disk.y() * props.aspect;
    let tangents = assembly::tangents(main, &Vector3::Y);
    let normals = assembly::transport_normals(&tangents, &Vector3::X);

    main.iter()
        .zip(tangents.iter().zip(&normals))
        .enumerate()
        .map(|(i, (p, (tangent, normal)))| {
            let t = curve_t(i, n);
            let spread =
                lerp3(props.root_splay, props.center_splay, props.tip_splay, SPLAY_CENTER_T, t) * jitter.splay;
            let binormal = normal.cross(tangent);
            let (sin, cos) = (TAU * props.twist * t).sin_cos();
            let offset = (*normal * (dx * cos - dz * sin) + binormal * (dx * sin + dz * cos)) * spread;
            *p * (1.0 + jitter.axial * t) + offset
        })
        .collect()
}

/// Child strands of `main`, or `main` itself when fewer than two strands are
/// configured. Strands draw their jitter one after another.
pub fn expand(main: Vec<Vector3>, props: &HairProperties, rng: &mut UniformRandom) -> Vec<Vec<Vector3>> {
    if props.multi_strand_count <= 1 {
        return vec![main];
    }
    (0..props.multi_strand_count)
        .map(|_| {
            let jitter = StrandJitter::draw(props, rng);
            strand(&main, props, &jitter)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_hair() -> Vec<Vector3> {
        (0..5).map(|i| Vector3::new(0.0, i as f64, 0.0)).collect()
    }

    #[test]
    fn single_strand_is_main() {
        let props = HairProperties {
            multi_strand_count: 1,
            ..Default::default()
        };
        let mut rng = UniformRandom::default();
        assert_eq!(expand(main_hair(), &props, &mut rng), vec![main_hair()]);
    }

    #[test]
    fn strands_follow_splay_profile() {
        let props = HairProperties {
            multi_strand_count: 3,
            root_splay: 0.0,
            center_splay: 0.5,
            tip_splay: 1.0,
            ..Default::default()
        };
        let mut rng = UniformRandom::default();
        let strands = expand(main_hair(), &props, &mut rng);
        assert_eq!(strands.len(), 3);
        for s in &strands {
            assert_eq!(s.len(), 5);
            assert_eq!(s[0], Vector3::ZERO);
            let radial = (s[4].x * s[4].x + s[4].z * s[4].z).sqrt();
            assert!(radial <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn twist_rotates_offset() {
        let props = HairProperties {
            tip_splay: 1.0,
            center_splay: 1.0,
            root_splay: 1.0,
            twist: 0.25,
            ..Default::default()
        };
        let jitter = StrandJitter {
            disk: uniform_disk(0.0, 1.0),
            splay: 1.0,
            axial: 0.0,
        };
        let s = strand(&main_hair(), &props, &jitter);
        assert!((s[0].x - 1.0).abs() < 1e-12);
        // A quarter turn at the tip carries +X to +Z.
        assert!(s[4].x.abs() < 1e-12);
        assert!((s[4].z - 1.0).abs() < 1e-12);
    }
}
