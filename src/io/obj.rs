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

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use ahash::AHashMap;

use crate::{
    error::{HairError, Result},
    geometry::{Vector2, Vector3},
    hair::GeneratedHair,
    mesh::TriangleMesh,
};

fn parse_error(line: usize, message: impl Into<String>) -> HairError {
    HairError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_floats<const N: usize>(parts: &mut std::str::SplitWhitespace<'_>, line: usize) -> Result<[f64; N]> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        let token = parts.next().ok_or_else(|| parse_error(line, "missing coordinate"))?;
        *slot = token
            .parse()
            .map_err(|_| parse_error(line, format!("bad number `{token}`")))?;
    }
    Ok(out)
}

/// Resolves a 1-based or negative (relative) OBJ index.
fn resolve_index(token: &str, count: usize, line: usize) -> Result<usize> {
    let i: i64 = token
        .parse()
        .map_err(|_| parse_error(line, format!("bad index `{token}`")))?;
    let resolved = if i < 0 { count as i64 + i } else { i - 1 };
    if resolved < 0 || resolved as usize >= count {
        return Err(parse_error(line, format!("index {i} out of range")));
    }
    Ok(resolved as usize)
}

/// Parses `v`, `vt` and `f` records; polygons are fanned into triangles.
/// A position used with several texture coordinates becomes several
/// vertices. Faces without texture coordinates map to `(0, 0)`.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<TriangleMesh> {
    let mut positions: Vec<Vector3> = Vec::new();
    let mut tex: Vec<Vector2> = Vec::new();

    let mut vertex_map: AHashMap<(usize, Option<usize>), u32> = AHashMap::default();
    let mut out_positions = Vec::new();
    let mut out_uvs = Vec::new();
    let mut indices: Vec<[u32; 3]> = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line_no = n + 1;
        let l = line?;
        let mut parts = l.split_whitespace();
        match parts.next() {
            Some("v") => {
                let [x, y, z] = parse_floats::<3>(&mut parts, line_no)?;
                positions.push(Vector3::new(x, y, z));
            }
            Some("vt") => {
                let [u, v] = parse_floats::<2>(&mut parts, line_no)?;
                tex.push(Vector2::new(u, v));
            }
            Some("f") => {
                let mut face = Vec::new();
                for token in parts {
                    let mut refs = token.split('/');
                    let p = resolve_index(refs.next().unwrap_or(""), positions.len(), line_no)?;
                    let t = match refs.next() {
                        Some(s) if !s.is_empty() => Some(resolve_index(s, tex.len(), line_no)?),
                        _ => None,
                    };
                    let id = *vertex_map.entry((p, t)).or_insert_with(|| {
                        out_positions.push(positions[p]);
                        out_uvs.push(t.map_or(Vector2::ZERO, |t| tex[t]));
                        (out_positions.len() - 1) as u32
                    });
                    face.push(id);
                }
                if face.len() < 3 {
                    return Err(parse_error(line_no, "face with fewer than 3 vertices"));
                }
                for k in 1..face.len() - 1 {
                    indices.push([face[0], face[k], face[k + 1]]);
                }
            }
            _ => {
                // ignore comments, normals, groups, etc.
            }
        }
    }

    TriangleMesh::new(out_positions, out_uvs, indices)
}

/// Read a triangle mesh with texture coordinates from a Wavefront OBJ file.
pub fn read_obj<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    parse_obj(BufReader::new(File::open(path)?))
}

/// Writes every non-degenerate curve as a polyline (`v` records then one
/// `l` record per hair, 1-based).
pub fn write_curves<W: Write>(hair: &GeneratedHair, mut out: W) -> Result<()> {
    let curves = || hair.curves().iter().filter(|c| !c.degenerate);
    for curve in curves() {
        for v in &curve.vertices {
            let p = v.position;
            writeln!(out, "v {:?} {:?} {:?}", p.x, p.y, p.z)?;
        }
    }

    let mut next = 1usize;
    for curve in curves() {
        write!(out, "l")?;
        for i in next..next + curve.vertices.len() {
            write!(out, " {i}")?;
        }
        writeln!(out)?;
        next += curve.vertices.len();
    }
    out.flush()?;
    Ok(())
}

pub fn write_curves_obj<P: AsRef<Path>>(hair: &GeneratedHair, path: P) -> Result<()> {
    write_curves(hair, BufWriter::new(File::create(path)?))
}
