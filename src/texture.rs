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

//! 2D float fields sampled at texture coordinates.

use crate::{
    error::{HairError, Result},
    geometry::util::lerp,
    numeric::Rgb,
};

/// A `width x height` grid of texels with 1, 3 or 4 float components,
/// sampled bilinearly with clamped edges.
///
/// The dirty flag is raised by the owner when the data source changes and
/// cleared by `resample`; between resamples the texture is read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    components: u32,
    data: Vec<f32>,
    dirty: bool,
}

impl Texture {
    pub fn new(width: u32, height: u32, components: u32, data: Vec<f32>) -> Result<Self> {
        Self::validate(width, height, components, data.len())?;
        Ok(Texture {
            width,
            height,
            components,
            data,
            dirty: false,
        })
    }

    /// Single-texel texture that samples to `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Texture {
            width: 1,
            height: 1,
            components: 1,
            data: vec![value],
            dirty: false,
        }
    }

    pub fn constant_color(color: Rgb) -> Self {
        Texture {
            width: 1,
            height: 1,
            components: 3,
            data: color.to_f32_array().to_vec(),
            dirty: false,
        }
    }

    /// Single-component texture filled from `f(u, v)` at texel centers.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(f64, f64) -> f32) -> Result<Self> {
        Self::validate(width, height, 1, width as usize * height as usize)?;
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let u = (x as f64 + 0.5) / width as f64;
                let v = (y as f64 + 0.5) / height as f64;
                data.push(f(u, v));
            }
        }
        Self::new(width, height, 1, data)
    }

    fn validate(width: u32, height: u32, components: u32, len: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(HairError::InvalidTexture(format!(
                "empty dimensions {width}x{height}"
            )));
        }
        if !matches!(components, 1 | 3 | 4) {
            return Err(HairError::InvalidTexture(format!(
                "{components} components (expected 1, 3 or 4)"
            )));
        }
        let expected = width as usize * height as usize * components as usize;
        if len != expected {
            return Err(HairError::InvalidTexture(format!(
                "{len} floats for {width}x{height}x{components} (expected {expected})"
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn components(&self) -> u32 {
        self.components
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Replace the texel data from the data source and clear the dirty flag.
    pub fn resample(&mut self, width: u32, height: u32, components: u32, data: Vec<f32>) -> Result<()> {
        Self::validate(width, height, components, data.len())?;
        self.width = width;
        self.height = height;
        self.components = components;
        self.data = data;
        self.dirty = false;
        Ok(())
    }

    #[inline]
    fn texel(&self, x: u32, y: u32, c: u32) -> f64 {
        let idx = (y as usize * self.width as usize + x as usize) * self.components as usize + c as usize;
        self.data[idx] as f64
    }

    fn bilinear(&self, u: f64, v: f64, c: u32) -> f64 {
        let fx = (u.clamp(0.0, 1.0) * self.width as f64 - 0.5).clamp(0.0, (self.width - 1) as f64);
        let fy = (v.clamp(0.0, 1.0) * self.height as f64 - 0.5).clamp(0.0, (self.height - 1) as f64);
        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f64;
        let ty = fy - y0 as f64;

        let top = lerp(self.texel(x0, y0, c), self.texel(x1, y0, c), tx);
        let bottom = lerp(self.texel(x0, y1, c), self.texel(x1, y1, c), tx);
        lerp(top, bottom, ty)
    }

    /// Scalar value at `(u, v)`: the first component, or the channel average
    /// for color textures.
    pub fn real_at_uv(&self, u: f64, v: f64) -> f64 {
        match self.components {
            1 => self.bilinear(u, v, 0),
            _ => (0..3).map(|c| self.bilinear(u, v, c)).sum::<f64>() / 3.0,
        }
    }

    /// Color at `(u, v)`; single-component textures read as gray.
    pub fn color_at_uv(&self, u: f64, v: f64) -> Rgb {
        match self.components {
            1 => Rgb::gray(self.bilinear(u, v, 0)),
            _ => Rgb::new(
                self.bilinear(u, v, 0),
                self.bilinear(u, v, 1),
                self.bilinear(u, v, 2),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bilinear_clamps_and_interpolates() {
        let tex = Texture::new(2, 1, 1, vec![0.0, 1.0]).unwrap();
        assert_eq!(tex.real_at_uv(0.0, 0.5), 0.0);
        assert_eq!(tex.real_at_uv(1.0, 0.5), 1.0);
        assert!((tex.real_at_uv(0.5, 0.5) - 0.5).abs() < 1e-12);
        assert_eq!(tex.real_at_uv(-3.0, 9.0), 0.0);
    }

    #[test]
    fn rejects_bad_component_count() {
        assert!(Texture::new(1, 1, 2, vec![0.0, 0.0]).is_err());
        assert!(Texture::new(2, 2, 1, vec![0.0; 3]).is_err());
    }

    #[test]
    fn resample_clears_dirty() {
        let mut tex = Texture::constant(1.0);
        tex.mark_dirty();
        assert!(tex.is_dirty());
        assert!(tex.resample(2, 2, 1, vec![0.0; 3]).is_err());
        assert!(tex.is_dirty());
        tex.resample(1, 2, 3, vec![0.5; 6]).unwrap();
        assert!(!tex.is_dirty());
        assert_eq!(tex.color_at_uv(0.5, 0.5), Rgb::gray(0.5));
    }
}
