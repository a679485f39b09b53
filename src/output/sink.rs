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

use bitflags::bitflags;

use crate::{
    geometry::{Vector2, Vector3},
    numeric::Rgb,
};

bitflags! {
    /// Vertex streams a sink accepts.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct SinkCapabilities: u8 {
        const POSITIONS = 1 << 0;
        const COLORS = 1 << 1;
        const OPACITIES = 1 << 2;
        const WIDTHS = 1 << 3;
        const NORMALS = 1 << 4;
        const UVS = 1 << 5;
        const INDICES = 1 << 6;
    }
}

/// Receiver of generated curves.
///
/// The protocol is `begin_output`, then for every hair `begin_hair`, writes
/// through any of the stream accessors, and `end_hair` with the number of
/// points actually written; `end_output` closes the pass. Between
/// `begin_hair(max_points)` and `end_hair` every supported accessor returns
/// a slice of at least `max_points` elements. An accessor returning `None`
/// means the stream is not supported, which is not an error.
pub trait HairSink {
    fn capabilities(&self) -> SinkCapabilities;

    fn begin_output(&mut self, max_hairs: usize, max_points_per_hair: usize);

    fn begin_hair(&mut self, max_points: usize);

    fn positions(&mut self) -> Option<&mut [Vector3]> {
        None
    }

    fn colors(&mut self) -> Option<&mut [Rgb]> {
        None
    }

    fn opacities(&mut self) -> Option<&mut [f64]> {
        None
    }

    fn widths(&mut self) -> Option<&mut [f64]> {
        None
    }

    fn normals(&mut self) -> Option<&mut [Vector3]> {
        None
    }

    fn uvs(&mut self) -> Option<&mut [Vector2]> {
        None
    }

    /// Indices into the whole output's vertex sequence.
    fn indices(&mut self) -> Option<&mut [u32]> {
        None
    }

    fn end_hair(&mut self, point_count: usize);

    fn end_output(&mut self) {}
}
