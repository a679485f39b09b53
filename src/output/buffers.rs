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

//! In-memory sinks.

use std::ops::Range;

use crate::{
    geometry::{Aabb, Vector2, Vector3},
    numeric::Rgb,
    output::sink::{HairSink, SinkCapabilities},
};

/// Keeps every stream in full precision, one flat vector per stream.
#[derive(Clone, Debug, Default)]
pub struct CurveBuffer {
    pub positions: Vec<Vector3>,
    pub colors: Vec<Rgb>,
    pub opacities: Vec<f64>,
    pub widths: Vec<f64>,
    pub normals: Vec<Vector3>,
    pub uvs: Vec<Vector2>,
    pub indices: Vec<u32>,
    /// Vertex offset of every hair followed by the total vertex count.
    offsets: Vec<usize>,
    start: usize,
}

impl CurveBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hair_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertex range of hair `i`.
    pub fn hair(&self, i: usize) -> Option<Range<usize>> {
        Some(*self.offsets.get(i)?..*self.offsets.get(i + 1)?)
    }

    fn resize(&mut self, len: usize) {
        self.positions.resize(len, Vector3::ZERO);
        self.colors.resize(len, Rgb::BLACK);
        self.opacities.resize(len, 0.0);
        self.widths.resize(len, 0.0);
        self.normals.resize(len, Vector3::ZERO);
        self.uvs.resize(len, Vector2::ZERO);
        self.indices.resize(len, 0);
    }
}

impl HairSink for CurveBuffer {
    fn capabilities(&self) -> SinkCapabilities {
        SinkCapabilities::all()
    }

    fn begin_output(&mut self, max_hairs: usize, _max_points_per_hair: usize) {
        self.resize(0);
        self.offsets.clear();
        self.offsets.reserve(max_hairs + 1);
        self.offsets.push(0);
        self.start = 0;
    }

    fn begin_hair(&mut self, max_points: usize) {
        self.start = self.positions.len();
        self.resize(self.start + max_points);
    }

    fn positions(&mut self) -> Option<&mut [Vector3]> {
        Some(&mut self.positions[self.start..])
    }

    fn colors(&mut self) -> Option<&mut [Rgb]> {
        Some(&mut self.colors[self.start..])
    }

    fn opacities(&mut self) -> Option<&mut [f64]> {
        Some(&mut self.opacities[self.start..])
    }

    fn widths(&mut self) -> Option<&mut [f64]> {
        Some(&mut self.widths[self.start..])
    }

    fn normals(&mut self) -> Option<&mut [Vector3]> {
        Some(&mut self.normals[self.start..])
    }

    fn uvs(&mut self) -> Option<&mut [Vector2]> {
        Some(&mut self.uvs[self.start..])
    }

    fn indices(&mut self) -> Option<&mut [u32]> {
        Some(&mut self.indices[self.start..])
    }

    fn end_hair(&mut self, point_count: usize) {
        let end = self.start + point_count.min(self.positions.len() - self.start);
        self.resize(end);
        self.offsets.push(end);
        self.start = end;
    }
}

/// GPU-ready vertex for preview drawing; opacity travels in the alpha.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewportVertex {
    pub position: [f32; 3],
    pub width: f32,
    pub color: [f32; 4],
}

/// Line strips of `ViewportVertex`. Normals, texture coordinates and indices
/// are not supported.
#[derive(Clone, Debug, Default)]
pub struct ViewportBuffer {
    vertices: Vec<ViewportVertex>,
    strips: Vec<Range<u32>>,
    positions: Vec<Vector3>,
    colors: Vec<Rgb>,
    opacities: Vec<f64>,
    widths: Vec<f64>,
}

impl ViewportBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[ViewportVertex] {
        &self.vertices
    }

    /// Vertex range of every hair.
    pub fn strips(&self) -> &[Range<u32>] {
        &self.strips
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl HairSink for ViewportBuffer {
    fn capabilities(&self) -> SinkCapabilities {
        SinkCapabilities::POSITIONS | SinkCapabilities::COLORS | SinkCapabilities::OPACITIES | SinkCapabilities::WIDTHS
    }

    fn begin_output(&mut self, max_hairs: usize, _max_points_per_hair: usize) {
        self.vertices.clear();
        self.strips.clear();
        self.strips.reserve(max_hairs);
    }

    fn begin_hair(&mut self, max_points: usize) {
        self.positions.clear();
        self.positions.resize(max_points, Vector3::ZERO);
        self.colors.clear();
        self.colors.resize(max_points, Rgb::WHITE);
        self.opacities.clear();
        self.opacities.resize(max_points, 1.0);
        self.widths.clear();
        self.widths.resize(max_points, 0.0);
    }

    fn positions(&mut self) -> Option<&mut [Vector3]> {
        Some(&mut self.positions)
    }

    fn colors(&mut self) -> Option<&mut [Rgb]> {
        Some(&mut self.colors)
    }

    fn opacities(&mut self) -> Option<&mut [f64]> {
        Some(&mut self.opacities)
    }

    fn widths(&mut self) -> Option<&mut [f64]> {
        Some(&mut self.widths)
    }

    fn end_hair(&mut self, point_count: usize) {
        let start = self.vertices.len() as u32;
        let count = point_count.min(self.positions.len());
        for i in 0..count {
            let [r, g, b] = self.colors[i].to_f32_array();
            self.vertices.push(ViewportVertex {
                position: self.positions[i].to_f32_array(),
                width: self.widths[i] as f32,
                color: [r, g, b, self.opacities[i] as f32],
            });
        }
        self.strips.push(start..start + count as u32);
    }
}

/// Accumulates the bounding box of every written position.
#[derive(Clone, Debug, Default)]
pub struct BoundsSink {
    pub bounds: Aabb<3>,
    pub hair_count: usize,
    pub point_count: usize,
    positions: Vec<Vector3>,
}

impl BoundsSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HairSink for BoundsSink {
    fn capabilities(&self) -> SinkCapabilities {
        SinkCapabilities::POSITIONS
    }

    fn begin_output(&mut self, _max_hairs: usize, _max_points_per_hair: usize) {
        self.bounds = Aabb::empty();
        self.hair_count = 0;
        self.point_count = 0;
    }

    fn begin_hair(&mut self, max_points: usize) {
        self.positions.clear();
        self.positions.resize(max_points, Vector3::ZERO);
    }

    fn positions(&mut self) -> Option<&mut [Vector3]> {
        Some(&mut self.positions)
    }

    fn end_hair(&mut self, point_count: usize) {
        for p in self.positions.iter().take(point_count) {
            self.bounds.extend(&p.to_array());
        }
        self.hair_count += 1;
        self.point_count += point_count.min(self.positions.len());
    }
}
