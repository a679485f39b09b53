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

//! Guide curves stored as index-aligned parallel arrays.

use log::{debug, warn};

use crate::{
    error::Result,
    geometry::{Matrix4, Vector3},
    guides::groups::InterpolationGroups,
    mesh::{MeshPoint, MeshSurface, Pose, UvLookup, UvPoint},
    numeric::UniformRandom,
    sampling::SurfaceSampler,
};

/// Anchor on the undeformed surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RestPosition {
    pub uv: UvPoint,
    pub point: MeshPoint,
    pub group: u32,
}

/// Anchor on the live surface with its cached frame transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurrentPosition {
    pub point: MeshPoint,
    pub local_to_world: Matrix4,
    pub world_to_local: Matrix4,
}

impl CurrentPosition {
    pub fn new(point: MeshPoint) -> Self {
        let local_to_world = point.local_to_world();
        CurrentPosition {
            point,
            local_to_world,
            world_to_local: local_to_world.rigid_inverse(),
        }
    }
}

/// Outcome of re-anchoring guides on a changed topology.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReanchorReport {
    /// Old indices of the guides that no longer resolve to a triangle.
    pub dropped: Vec<usize>,
    pub guide_count: usize,
}

/// Guide `i` is `rest[i]`, `current[i]` and `segments[i]`; the three arrays
/// always have the same length. Segments are per-segment offsets in the
/// guide's local frame (tangent X, normal Y, binormal Z).
#[derive(Clone, Debug, Default)]
pub struct GuideSet {
    rest: Vec<RestPosition>,
    current: Vec<CurrentPosition>,
    segments: Vec<Vec<Vector3>>,
}

impl GuideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    pub fn rest(&self, id: usize) -> &RestPosition {
        &self.rest[id]
    }

    pub fn rest_positions(&self) -> &[RestPosition] {
        &self.rest
    }

    pub fn current(&self, id: usize) -> &CurrentPosition {
        &self.current[id]
    }

    pub fn segments(&self, id: usize) -> &[Vector3] {
        &self.segments[id]
    }

    /// Swaps in new segments for guide `id`, returning the old ones.
    pub fn set_segments(&mut self, id: usize, segments: Vec<Vector3>) -> Option<Vec<Vector3>> {
        let slot = self.segments.get_mut(id)?;
        Some(std::mem::replace(slot, segments))
    }

    /// Adds a guide anchored at `uv`. Returns its id, or `None` when `uv`
    /// does not resolve on `mesh`.
    pub fn push<M: MeshSurface>(
        &mut self,
        mesh: &M,
        uv: UvPoint,
        group: u32,
        segments: Vec<Vector3>,
    ) -> Option<usize> {
        let rest = mesh.mesh_point(&uv, Pose::Rest)?;
        let current = mesh.mesh_point(&uv, Pose::Current)?;
        self.rest.push(RestPosition {
            uv,
            point: rest,
            group,
        });
        self.current.push(CurrentPosition::new(current));
        self.segments.push(segments);
        Some(self.rest.len() - 1)
    }

    /// Grows `count` straight guides of `length` along the surface normal at
    /// points drawn from `sampler`, each with its group's segment count.
    pub fn seed<M: MeshSurface>(
        mesh: &M,
        sampler: &SurfaceSampler,
        rng: &mut UniformRandom,
        groups: &InterpolationGroups,
        count: usize,
        length: f64,
    ) -> Result<Self> {
        let mut guides = GuideSet::new();
        for _ in 0..count {
            let uv = sampler.next(rng)?;
            let Some(point) = mesh.mesh_point(&uv, Pose::Rest) else {
                continue;
            };
            let group = groups.group_at(point.u, point.v);
            let n = groups.segment_count(group).max(1);
            let step = Vector3::new(0.0, length / n as f64, 0.0);
            guides.push(mesh, uv, group, vec![step; n as usize]);
        }
        debug!("seeded {} guides", guides.len());
        Ok(guides)
    }

    /// Re-evaluates current positions and frames on the mesh's current pose.
    pub fn update_current<M: MeshSurface>(&mut self, mesh: &M) {
        for (rest, current) in self.rest.iter().zip(self.current.iter_mut()) {
            if let Some(point) = mesh.mesh_point(&rest.uv, Pose::Current) {
                *current = CurrentPosition::new(point);
            }
        }
    }

    /// Re-anchors every guide on `mesh` after its topology changed, by looking
    /// up each rest texture coordinate. Guides that no longer land on a
    /// triangle are dropped from all arrays.
    ///
    /// The new arrays are built aside and moved in at the end.
    pub fn reanchor<M: MeshSurface>(&mut self, mesh: &M, lookup: &mut UvLookup) -> ReanchorReport {
        lookup.mark_dirty();

        let mut rest = Vec::with_capacity(self.rest.len());
        let mut current = Vec::with_capacity(self.rest.len());
        let mut segments = Vec::with_capacity(self.rest.len());
        let mut dropped = Vec::new();

        for (id, (old, segs)) in self.rest.iter().zip(self.segments.iter_mut()).enumerate() {
            let uv = lookup.uv_point(mesh, &old.point);
            let resolved = mesh
                .mesh_point(&uv, Pose::Rest)
                .zip(mesh.mesh_point(&uv, Pose::Current));
            match resolved {
                Some((rest_point, current_point)) => {
                    rest.push(RestPosition {
                        uv,
                        point: rest_point,
                        group: old.group,
                    });
                    current.push(CurrentPosition::new(current_point));
                    segments.push(std::mem::take(segs));
                }
                None => dropped.push(id),
            }
        }

        if !dropped.is_empty() {
            warn!(
                "dropped {} of {} guides no longer on the surface",
                dropped.len(),
                self.rest.len()
            );
        }

        self.rest = rest;
        self.current = current;
        self.segments = segments;
        ReanchorReport {
            dropped,
            guide_count: self.rest.len(),
        }
    }

    /// World-space vertices of guide `id`, root first.
    pub fn world_points(&self, id: usize) -> Vec<Vector3> {
        let frame = &self.current[id].local_to_world;
        let mut local = Vector3::ZERO;
        let mut points = Vec::with_capacity(self.segments[id].len() + 1);
        points.push(frame.transform_point(&local));
        for offset in &self.segments[id] {
            local += *offset;
            points.push(frame.transform_point(&local));
        }
        points
    }
}
