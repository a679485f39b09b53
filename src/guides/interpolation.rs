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

//! Blends nearby guides into a new hair in the guides' local frames.

use smallvec::SmallVec;

use crate::{
    geometry::{Vector3, util::EPS},
    guides::{
        groups::InterpolationGroups,
        guide_set::GuideSet,
        spatial_hash::{GuideIndex, Neighbor, Neighbors},
    },
    mesh::{MeshPoint, MeshSurface, Pose, UvPoint},
};

pub type Weights = SmallVec<[f64; 8]>;

/// Normalized inverse-distance weights `1 / d^power` for `neighbors` sorted
/// nearest first. A neighbour closer than `EPS` takes all the weight.
pub fn interpolation_weights(neighbors: &[Neighbor], power: f64, out: &mut Weights) {
    out.clear();
    let Some(first) = neighbors.first() else {
        return;
    };
    if first.distance <= EPS {
        out.push(1.0);
        out.extend(std::iter::repeat_n(0.0, neighbors.len() - 1));
        return;
    }

    out.extend(neighbors.iter().map(|n| n.distance.powf(-power)));
    let sum: f64 = out.iter().sum();
    if !(sum > 0.0) || !sum.is_finite() {
        let even = 1.0 / neighbors.len() as f64;
        out.iter_mut().for_each(|w| *w = even);
        return;
    }
    out.iter_mut().for_each(|w| *w /= sum);
}

/// Restartable view of a guide's segment offsets stretched to a target
/// count: shorter guides repeat their last offset, longer ones are cut, and
/// a guide without segments yields zero offsets.
#[derive(Clone, Debug)]
pub struct GuideSegments<'a> {
    segments: &'a [Vector3],
    target: usize,
    index: usize,
}

impl<'a> GuideSegments<'a> {
    pub fn new(segments: &'a [Vector3], target: usize) -> Self {
        GuideSegments {
            segments,
            target,
            index: 0,
        }
    }

    pub fn restart(&mut self) {
        self.index = 0;
    }
}

impl Iterator for GuideSegments<'_> {
    type Item = Vector3;

    fn next(&mut self) -> Option<Vector3> {
        if self.index >= self.target {
            return None;
        }
        let i = self.index.min(self.segments.len().saturating_sub(1));
        self.index += 1;
        Some(self.segments.get(i).copied().unwrap_or(Vector3::ZERO))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.target - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for GuideSegments<'_> {}

/// A freshly blended hair before deformation.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolatedHair {
    pub uv: UvPoint,
    /// Root on the undeformed surface.
    pub rest: MeshPoint,
    /// Root on the live surface; its frame takes the hair to world space.
    pub root: MeshPoint,
    pub group: u32,
    /// Local-frame vertices, root at the origin; one more than the segment
    /// count of the group.
    pub points: Vec<Vector3>,
}

/// Per-worker buffers reused across hairs.
#[derive(Clone, Debug, Default)]
pub struct InterpolationScratch {
    pub neighbors: Neighbors,
    pub weights: Weights,
}

pub struct Interpolator<'a, M: MeshSurface> {
    pub mesh: &'a M,
    pub guides: &'a GuideSet,
    pub index: &'a GuideIndex,
    pub groups: &'a InterpolationGroups,
    pub neighbor_count: usize,
    pub falloff_power: f64,
}

impl<M: MeshSurface> Interpolator<'_, M> {
    /// Blends the nearest guides of the sample's group. `None` when the
    /// sample does not resolve, its group is hidden or has no guides.
    pub fn interpolate(&self, uv: &UvPoint, scratch: &mut InterpolationScratch) -> Option<InterpolatedHair> {
        let rest = self.mesh.mesh_point(uv, Pose::Rest)?;
        let root = self.mesh.mesh_point(uv, Pose::Current)?;
        let group = self.groups.group_at(rest.u, rest.v);
        if !self.groups.is_visible(group) {
            return None;
        }

        self.index
            .nearest(group, &rest.position, self.neighbor_count, &mut scratch.neighbors);
        if scratch.neighbors.is_empty() {
            return None;
        }
        interpolation_weights(&scratch.neighbors, self.falloff_power, &mut scratch.weights);

        let target = self.groups.segment_count(group) as usize;
        let points = blend(self.guides, &scratch.neighbors, &scratch.weights, target);
        Some(InterpolatedHair {
            uv: *uv,
            rest,
            root,
            group,
            points,
        })
    }
}

/// Weighted sum of segment offsets, accumulated into local-frame vertices.
pub fn blend(guides: &GuideSet, neighbors: &[Neighbor], weights: &[f64], target: usize) -> Vec<Vector3> {
    let mut points = vec![Vector3::ZERO; target + 1];
    for (neighbor, &w) in neighbors.iter().zip(weights) {
        if w == 0.0 {
            continue;
        }
        let segments = GuideSegments::new(guides.segments(neighbor.guide as usize), target);
        for (i, offset) in segments.enumerate() {
            points[i + 1] += offset * w;
        }
    }
    for i in 1..points.len() {
        let prev = points[i - 1];
        points[i] += prev;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_pad_by_repeating_last() {
        let segs = [Vector3::X, Vector3::Y];
        let mut it = GuideSegments::new(&segs, 4);
        let all: Vec<Vector3> = it.by_ref().collect();
        assert_eq!(all, vec![Vector3::X, Vector3::Y, Vector3::Y, Vector3::Y]);
        it.restart();
        assert_eq!(it.len(), 4);
    }

    #[test]
    fn segments_truncate_and_empty() {
        let segs = [Vector3::X, Vector3::Y, Vector3::Z];
        assert_eq!(GuideSegments::new(&segs, 1).collect::<Vec<_>>(), vec![Vector3::X]);
        assert_eq!(GuideSegments::new(&[], 2).collect::<Vec<_>>(), vec![Vector3::ZERO; 2]);
    }
}
