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

//! Flat little-endian layout shared with renderer adapters.
//!
//! There is no tag or version: a texture is `width`, `height` and
//! `components` as `u32` followed by the `f32` texels; properties are the
//! `f64` scalars in `HairProperties::SCALAR_FIELDS` order followed by one
//! texture per textured field (a neutral 1x1 texture when none is attached);
//! guides are a `u32` count then, per guide, a `u32` segment count and that
//! many `f64` triples.

use std::io::{Read, Write};

use crate::{
    error::{HairError, Result},
    geometry::Vector3,
    guides::GuideSet,
    hair::properties::{HairProperties, TexturedColor, TexturedScalar},
    numeric::Rgb,
    texture::Texture,
};

fn read_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f32<R: Read>(r: &mut R) -> Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_f64<R: Read>(r: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn write_u32<W: Write>(w: &mut W, v: u32) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_f64<W: Write>(w: &mut W, v: f64) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_vector<W: Write>(w: &mut W, v: &Vector3) -> Result<()> {
    for c in v.to_array() {
        write_f64(w, c)?;
    }
    Ok(())
}

fn read_vector<R: Read>(r: &mut R) -> Result<Vector3> {
    Ok(Vector3::new(read_f64(r)?, read_f64(r)?, read_f64(r)?))
}

pub fn write_texture<W: Write>(w: &mut W, texture: &Texture) -> Result<()> {
    write_u32(w, texture.width())?;
    write_u32(w, texture.height())?;
    write_u32(w, texture.components())?;
    for &x in texture.data() {
        w.write_all(&x.to_le_bytes())?;
    }
    Ok(())
}

pub fn read_texture<R: Read>(r: &mut R) -> Result<Texture> {
    let width = read_u32(r)?;
    let height = read_u32(r)?;
    let components = read_u32(r)?;
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(components as usize))
        .ok_or_else(|| HairError::InvalidTexture(format!("{width}x{height}x{components} overflows")))?;

    let mut data = Vec::new();
    data.try_reserve_exact(len)?;
    for _ in 0..len {
        data.push(read_f32(r)?);
    }
    Texture::new(width, height, components, data)
}

fn textured_scalars(props: &HairProperties) -> [&TexturedScalar; 7] {
    [
        &props.scale,
        &props.displacement,
        &props.root_frizz,
        &props.tip_frizz,
        &props.root_kink,
        &props.tip_kink,
        &props.cut,
    ]
}

fn textured_scalars_mut(props: &mut HairProperties) -> [&mut TexturedScalar; 7] {
    [
        &mut props.scale,
        &mut props.displacement,
        &mut props.root_frizz,
        &mut props.tip_frizz,
        &mut props.root_kink,
        &mut props.tip_kink,
        &mut props.cut,
    ]
}

fn textured_colors(props: &HairProperties) -> [&TexturedColor; 2] {
    [&props.root_color, &props.tip_color]
}

fn textured_colors_mut(props: &mut HairProperties) -> [&mut TexturedColor; 2] {
    [&mut props.root_color, &mut props.tip_color]
}

/// Neutral textures read back as no texture.
fn attached(texture: Texture, neutral: &Texture) -> Option<Texture> {
    (texture != *neutral).then_some(texture)
}

pub fn write_properties<W: Write>(w: &mut W, props: &HairProperties) -> Result<()> {
    for v in props.scalar_values() {
        write_f64(w, v)?;
    }
    let neutral = Texture::constant(1.0);
    for field in textured_scalars(props) {
        write_texture(w, field.texture.as_ref().unwrap_or(&neutral))?;
    }
    let neutral = Texture::constant_color(Rgb::WHITE);
    for field in textured_colors(props) {
        write_texture(w, field.texture.as_ref().unwrap_or(&neutral))?;
    }
    Ok(())
}

pub fn read_properties<R: Read>(r: &mut R) -> Result<HairProperties> {
    let mut values = Vec::with_capacity(HairProperties::SCALAR_FIELDS.len());
    for _ in HairProperties::SCALAR_FIELDS {
        values.push(read_f64(r)?);
    }
    let mut props = HairProperties::default();
    props.set_scalar_values(&values);

    let neutral = Texture::constant(1.0);
    for field in textured_scalars_mut(&mut props) {
        field.texture = attached(read_texture(r)?, &neutral);
    }
    let neutral = Texture::constant_color(Rgb::WHITE);
    for field in textured_colors_mut(&mut props) {
        field.texture = attached(read_texture(r)?, &neutral);
    }
    Ok(props)
}

pub fn write_guides<W: Write>(w: &mut W, guides: &GuideSet) -> Result<()> {
    write_u32(w, guides.len() as u32)?;
    for id in 0..guides.len() {
        let segments = guides.segments(id);
        write_u32(w, segments.len() as u32)?;
        for s in segments {
            write_vector(w, s)?;
        }
    }
    Ok(())
}

/// Segment offsets of every guide in file order. Anchors are not part of
/// the layout.
pub fn read_guide_segments<R: Read>(r: &mut R) -> Result<Vec<Vec<Vector3>>> {
    let count = read_u32(r)? as usize;
    let mut guides = Vec::new();
    guides.try_reserve(count)?;
    for _ in 0..count {
        let n = read_u32(r)? as usize;
        let mut segments = Vec::new();
        segments.try_reserve(n)?;
        for _ in 0..n {
            segments.push(read_vector(r)?);
        }
        guides.push(segments);
    }
    Ok(guides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_layout_is_header_then_floats() {
        let t = Texture::constant(0.5);
        let mut buf = Vec::new();
        write_texture(&mut buf, &t).unwrap();
        assert_eq!(buf.len(), 3 * 4 + 4);
        assert_eq!(&buf[..4], &1u32.to_le_bytes());
        assert_eq!(&buf[12..], &0.5f32.to_le_bytes());
    }

    #[test]
    fn truncated_input_is_an_io_error() {
        let bytes = [2u8, 0, 0, 0];
        let err = read_guide_segments(&mut &bytes[..]).unwrap_err();
        assert!(matches!(err, HairError::Io(_)));
    }
}
