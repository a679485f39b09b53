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

//! Per-frame bundle of procedural hair parameters.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::Vector3,
    numeric::Rgb,
    texture::Texture,
};

/// A scalar optionally modulated by a texture sampled at the root.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TexturedScalar {
    pub value: f64,
    #[serde(skip)]
    pub texture: Option<Texture>,
}

impl TexturedScalar {
    pub const fn new(value: f64) -> Self {
        TexturedScalar {
            value,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn at(&self, u: f64, v: f64) -> f64 {
        match &self.texture {
            Some(t) => self.value * t.real_at_uv(u, v),
            None => self.value,
        }
    }

    fn is_dirty(&self) -> bool {
        self.texture.as_ref().is_some_and(Texture::is_dirty)
    }
}

/// A color optionally modulated by a texture sampled at the root.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TexturedColor {
    pub value: Rgb,
    #[serde(skip)]
    pub texture: Option<Texture>,
}

impl TexturedColor {
    pub const fn new(value: Rgb) -> Self {
        TexturedColor {
            value,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn at(&self, u: f64, v: f64) -> Rgb {
        match &self.texture {
            Some(t) => self.value.mul(&t.color_at_uv(u, v)),
            None => self.value,
        }
    }

    fn is_dirty(&self) -> bool {
        self.texture.as_ref().is_some_and(Texture::is_dirty)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HairProperties {
    /// Multiplies every segment offset.
    pub scale: TexturedScalar,
    /// Offset of the whole hair along the surface normal.
    pub displacement: TexturedScalar,

    pub root_frizz: TexturedScalar,
    pub tip_frizz: TexturedScalar,
    /// Waves along the hair per local axis.
    pub frizz_frequency: Vector3,
    /// Phase advance per unit of `time`.
    pub frizz_anim_speed: f64,
    pub frizz_anim_direction: Vector3,

    pub root_kink: TexturedScalar,
    pub tip_kink: TexturedScalar,
    pub kink_frequency: Vector3,

    /// Child strands per interpolated hair; 0 or 1 keeps the single hair.
    pub multi_strand_count: u32,
    pub root_splay: f64,
    pub center_splay: f64,
    pub tip_splay: f64,
    /// Full turns about the strand axis from root to tip.
    pub twist: f64,
    /// Maximum axial jitter at the tip, as a fraction of hair length.
    pub strand_offset: f64,
    /// Scales the binormal axis of the strand disk.
    pub aspect: f64,
    /// Per-strand random variation of the splay, in `[0, 1]`.
    pub randomize_strand: f64,

    pub root_color: TexturedColor,
    pub tip_color: TexturedColor,
    pub mutant_color: Rgb,
    /// Probability in `[0, 1]` that a hair takes the mutant color.
    pub mutant_percent: f64,
    /// Maximum random hue shift, in turns.
    pub hue_variation: f64,
    /// Maximum random relative value change.
    pub value_variation: f64,

    pub root_opacity: f64,
    pub tip_opacity: f64,
    pub root_width: f64,
    pub tip_width: f64,

    /// Fraction of each hair removed from the tip, in `[0, 1]`.
    pub cut: TexturedScalar,

    /// Animation time for this frame.
    pub time: f64,
}

impl Default for HairProperties {
    fn default() -> Self {
        HairProperties {
            scale: TexturedScalar::new(1.0),
            displacement: TexturedScalar::new(0.0),
            root_frizz: TexturedScalar::new(0.0),
            tip_frizz: TexturedScalar::new(0.0),
            frizz_frequency: Vector3::splat(3.0),
            frizz_anim_speed: 0.0,
            frizz_anim_direction: Vector3::Y,
            root_kink: TexturedScalar::new(0.0),
            tip_kink: TexturedScalar::new(0.0),
            kink_frequency: Vector3::splat(1.0),
            multi_strand_count: 0,
            root_splay: 0.0,
            center_splay: 0.0,
            tip_splay: 0.0,
            twist: 0.0,
            strand_offset: 0.0,
            aspect: 1.0,
            randomize_strand: 0.0,
            root_color: TexturedColor::new(Rgb::new(0.25, 0.15, 0.08)),
            tip_color: TexturedColor::new(Rgb::new(0.55, 0.4, 0.25)),
            mutant_color: Rgb::new(0.9, 0.9, 0.85),
            mutant_percent: 0.0,
            hue_variation: 0.0,
            value_variation: 0.0,
            root_opacity: 1.0,
            tip_opacity: 1.0,
            root_width: 0.01,
            tip_width: 0.005,
            cut: TexturedScalar::new(0.0),
            time: 0.0,
        }
    }
}

impl HairProperties {
    /// Order of the scalar values in the flat binary property layout.
    pub const SCALAR_FIELDS: &'static [&'static str] = &[
        "scale",
        "displacement",
        "root_frizz",
        "tip_frizz",
        "frizz_frequency.x",
        "frizz_frequency.y",
        "frizz_frequency.z",
        "frizz_anim_speed",
        "frizz_anim_direction.x",
        "frizz_anim_direction.y",
        "frizz_anim_direction.z",
        "root_kink",
        "tip_kink",
        "kink_frequency.x",
        "kink_frequency.y",
        "kink_frequency.z",
        "multi_strand_count",
        "root_splay",
        "center_splay",
        "tip_splay",
        "twist",
        "strand_offset",
        "aspect",
        "randomize_strand",
        "root_color.r",
        "root_color.g",
        "root_color.b",
        "tip_color.r",
        "tip_color.g",
        "tip_color.b",
        "mutant_color.r",
        "mutant_color.g",
        "mutant_color.b",
        "mutant_percent",
        "hue_variation",
        "value_variation",
        "root_opacity",
        "tip_opacity",
        "root_width",
        "tip_width",
        "cut",
        "time",
    ];

    /// Calls `f` on every scalar in `SCALAR_FIELDS` order.
    fn visit_scalars(&mut self, mut f: impl FnMut(&mut f64)) {
        let mut strands = self.multi_strand_count as f64;
        let slots: [&mut f64; 42] = [
            &mut self.scale.value,
            &mut self.displacement.value,
            &mut self.root_frizz.value,
            &mut self.tip_frizz.value,
            &mut self.frizz_frequency.x,
            &mut self.frizz_frequency.y,
            &mut self.frizz_frequency.z,
            &mut self.frizz_anim_speed,
            &mut self.frizz_anim_direction.x,
            &mut self.frizz_anim_direction.y,
            &mut self.frizz_anim_direction.z,
            &mut self.root_kink.value,
            &mut self.tip_kink.value,
            &mut self.kink_frequency.x,
            &mut self.kink_frequency.y,
            &mut self.kink_frequency.z,
            &mut strands,
            &mut self.root_splay,
            &mut self.center_splay,
            &mut self.tip_splay,
            &mut self.twist,
            &mut self.strand_offset,
            &mut self.aspect,
            &mut self.randomize_strand,
            &mut self.root_color.value.r,
            &mut self.root_color.value.g,
            &mut self.root_color.value.b,
            &mut self.tip_color.value.r,
            &mut self.tip_color.value.g,
            &mut self.tip_color.value.b,
            &mut self.mutant_color.r,
            &mut self.mutant_color.g,
            &mut self.mutant_color.b,
            &mut self.mutant_percent,
            &mut self.hue_variation,
            &mut self.value_variation,
            &mut self.root_opacity,
            &mut self.tip_opacity,
            &mut self.root_width,
            &mut self.tip_width,
            &mut self.cut.value,
            &mut self.time,
        ];
        for slot in slots {
            f(slot);
        }
        self.multi_strand_count = strands.max(0.0).round() as u32;
    }

    pub fn scalar_values(&self) -> Vec<f64> {
        let mut copy = self.clone();
        let mut out = Vec::with_capacity(Self::SCALAR_FIELDS.len());
        copy.visit_scalars(|x| out.push(*x));
        out
    }

    /// Assigns scalars in `SCALAR_FIELDS` order; missing trailing values
    /// keep their current setting.
    pub fn set_scalar_values(&mut self, values: &[f64]) {
        let mut values = values.iter();
        self.visit_scalars(|x| {
            if let Some(&v) = values.next() {
                *x = v;
            }
        });
    }

    /// True when any attached texture awaits resampling.
    pub fn needs_refresh(&self) -> bool {
        [
            &self.scale,
            &self.displacement,
            &self.root_frizz,
            &self.tip_frizz,
            &self.root_kink,
            &self.tip_kink,
            &self.cut,
        ]
        .iter()
        .any(|s| s.is_dirty())
            || self.root_color.is_dirty()
            || self.tip_color.is_dirty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_layout_matches_field_list() {
        let props = HairProperties::default();
        assert_eq!(props.scalar_values().len(), HairProperties::SCALAR_FIELDS.len());
    }

    #[test]
    fn scalar_values_round_trip() {
        let mut props = HairProperties {
            multi_strand_count: 5,
            twist: 0.75,
            ..Default::default()
        };
        props.tip_color.value.g = 0.125;
        let values = props.scalar_values();

        let mut restored = HairProperties::default();
        restored.set_scalar_values(&values);
        assert_eq!(restored, props);
    }
}
