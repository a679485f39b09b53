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

use serde::{Deserialize, Serialize};

use crate::{numeric::Rgb, texture::Texture};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationGroup {
    /// Segments of every hair interpolated in this group.
    pub segment_count: u32,
    /// Group texture color that selects this group.
    pub key: Rgb,
    pub selectable: bool,
    pub visible: bool,
}

impl Default for InterpolationGroup {
    fn default() -> Self {
        InterpolationGroup {
            segment_count: 10,
            key: Rgb::WHITE,
            selectable: true,
            visible: true,
        }
    }
}

/// Partition of the surface into groups that never interpolate across each
/// other, selected by an optional group texture.
#[derive(Clone, Debug)]
pub struct InterpolationGroups {
    groups: Vec<InterpolationGroup>,
    texture: Option<Texture>,
}

impl Default for InterpolationGroups {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InterpolationGroups {
    /// An empty list is replaced by one default group.
    pub fn new(mut groups: Vec<InterpolationGroup>) -> Self {
        if groups.is_empty() {
            groups.push(InterpolationGroup::default());
        }
        InterpolationGroups {
            groups,
            texture: None,
        }
    }

    pub fn single(segment_count: u32) -> Self {
        Self::new(vec![InterpolationGroup {
            segment_count,
            ..Default::default()
        }])
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&InterpolationGroup> {
        self.groups.get(id as usize)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut InterpolationGroup> {
        self.groups.get_mut(id as usize)
    }

    /// Unknown ids fall back to group 0.
    pub fn segment_count(&self, id: u32) -> u32 {
        self.get(id).unwrap_or(&self.groups[0]).segment_count
    }

    pub fn is_visible(&self, id: u32) -> bool {
        self.get(id).is_some_and(|g| g.visible)
    }

    /// Group whose key is nearest the group texture color at `(u, v)`; ties
    /// go to the lower id. Without a texture everything is group 0.
    pub fn group_at(&self, u: f64, v: f64) -> u32 {
        let Some(texture) = &self.texture else {
            return 0;
        };
        if self.groups.len() == 1 {
            return 0;
        }
        let color = texture.color_at_uv(u, v);
        let mut best = (0u32, f64::INFINITY);
        for (id, group) in self.groups.iter().enumerate() {
            let d = group.key.distance_squared(&color);
            if d < best.1 {
                best = (id as u32, d);
            }
        }
        best.0
    }
}
