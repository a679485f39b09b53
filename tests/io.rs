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

use std::io::Cursor;

use hairgen::HairError;
use hairgen::geometry::{Vector2, Vector3};
use hairgen::guides::{GuideSet, InterpolationGroup};
use hairgen::hair::assembly::{CurveVertex, HairCurve};
use hairgen::hair::{GeneratedHair, HairProperties, TexturedColor, TexturedScalar};
use hairgen::io::{HairSettings, binary, load_json, obj, read_obj, save_json, write_curves_obj};
use hairgen::mesh::{MeshSurface, Pose, TriangleMesh, UvGrid, UvPoint};
use hairgen::numeric::Rgb;
use hairgen::texture::Texture;
use tempfile::tempdir;

#[test]
fn test_properties_binary_round_trip() {
    let mut props = HairProperties {
        scale: TexturedScalar::new(1.5).with_texture(Texture::from_fn(4, 2, |u, v| (u * v) as f32).unwrap()),
        tip_frizz: TexturedScalar::new(0.3),
        frizz_frequency: Vector3::new(1.0, 2.0, 3.0),
        multi_strand_count: 7,
        tip_color: TexturedColor::new(Rgb::new(0.1, 0.2, 0.3))
            .with_texture(Texture::constant_color(Rgb::new(0.5, 0.25, 1.0))),
        mutant_percent: 0.05,
        time: 2.5,
        ..Default::default()
    };
    props.cut = TexturedScalar::new(0.2);

    let mut buf = Vec::new();
    binary::write_properties(&mut buf, &props).unwrap();
    let back = binary::read_properties(&mut Cursor::new(&buf)).unwrap();

    assert_eq!(back.scalar_values(), props.scalar_values());
    assert_eq!(back.multi_strand_count, 7);
    assert_eq!(back.scale.texture, props.scale.texture);
    assert_eq!(back.tip_color.texture, props.tip_color.texture);
    assert!(back.displacement.texture.is_none());
    assert!(back.root_color.texture.is_none());
    assert_eq!(back, props);
}

#[test]
fn test_properties_layout_size() {
    let mut buf = Vec::new();
    binary::write_properties(&mut buf, &HairProperties::default()).unwrap();
    // 7 neutral scalar textures and 2 neutral color textures.
    let textures = 7 * (12 + 4) + 2 * (12 + 3 * 4);
    assert_eq!(buf.len(), HairProperties::SCALAR_FIELDS.len() * 8 + textures);
}

#[test]
fn test_guides_binary_round_trip() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let grid = UvGrid::build(&mesh, 16);
    let mut guides = GuideSet::new();
    guides
        .push(&mesh, grid.lookup(0.2, 0.3), 0, vec![Vector3::new(0.1, 0.2, 0.3), Vector3::Y])
        .unwrap();
    guides.push(&mesh, grid.lookup(0.7, 0.7), 0, Vec::new()).unwrap();

    let mut buf = Vec::new();
    binary::write_guides(&mut buf, &guides).unwrap();
    assert_eq!(buf.len(), 4 + (4 + 2 * 24) + 4);

    let segments = binary::read_guide_segments(&mut buf.as_slice()).unwrap();
    assert_eq!(segments, vec![vec![Vector3::new(0.1, 0.2, 0.3), Vector3::Y], Vec::new()]);
}

#[test]
fn test_oversized_texture_header_is_rejected() {
    let mut buf = Vec::new();
    for v in [u32::MAX, u32::MAX, 4] {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    assert!(binary::read_texture(&mut buf.as_slice()).is_err());
}

const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

#[test]
fn test_parse_quad_with_texture_coordinates() {
    let mesh = obj::parse_obj(QUAD.as_bytes()).unwrap();
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.uvs()[2], Vector2::new(1.0, 1.0));

    let grid = UvGrid::build(&mesh, 8);
    let p = mesh.mesh_point(&grid.lookup(0.25, 0.75), Pose::Rest).unwrap();
    assert!(p.position.distance(&Vector3::new(0.25, 0.75, 0.0)) < 1e-12);
    assert!(p.normal.distance(&Vector3::Z) < 1e-12);
}

#[test]
fn test_negative_indices_and_shared_positions() {
    let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvt 0.5 0.5\nf -3/1 -2/2 -1/3\nf 1/4 2/2 3/3\n";
    let mesh = obj::parse_obj(src.as_bytes()).unwrap();
    assert_eq!(mesh.triangle_count(), 2);
    // Position 1 is used with two texture coordinates.
    assert_eq!(mesh.vertex_count(), 4);
}

#[test]
fn test_bad_index_reports_line() {
    let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
    match obj::parse_obj(src.as_bytes()) {
        Err(HairError::Parse { line, .. }) => assert_eq!(line, 4),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        obj::parse_obj("v 0 0\n".as_bytes()),
        Err(HairError::Parse { line: 1, .. })
    ));
    assert!(matches!(
        obj::parse_obj("v 0 0 0\nf 1 1\n".as_bytes()),
        Err(HairError::Parse { line: 2, .. })
    ));
}

fn polyline(points: &[Vector3], degenerate: bool) -> HairCurve {
    HairCurve {
        vertices: points
            .iter()
            .map(|&position| CurveVertex {
                position,
                color: Rgb::WHITE,
                opacity: 1.0,
                width: 0.01,
                normal: Vector3::X,
                uv: Vector2::ZERO,
            })
            .collect(),
        root_uv: UvPoint::new(0.0, 0.0, 0),
        group: 0,
        degenerate,
    }
}

#[test]
fn test_write_curves_as_polylines() {
    let hair = GeneratedHair::new(vec![
        polyline(&[Vector3::ZERO, Vector3::Y, Vector3::Y * 2.0], false),
        polyline(&[Vector3::X], true),
        polyline(&[Vector3::Z, Vector3::Z * 2.0], false),
    ]);
    let mut out = Vec::new();
    obj::write_curves(&hair, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 5);
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("l ")).copied().collect::<Vec<_>>(),
        vec!["l 1 2 3", "l 4 5"]
    );
}

#[test]
fn test_files_round_trip() {
    let dir = tempdir().unwrap();

    let mesh_path = dir.path().join("quad.obj");
    std::fs::write(&mesh_path, QUAD).unwrap();
    let mesh = read_obj(&mesh_path).unwrap();
    assert_eq!(mesh.positions(Pose::Rest).len(), 4);

    let curves_path = dir.path().join("hair.obj");
    let hair = GeneratedHair::new(vec![polyline(&[Vector3::ZERO, Vector3::Y], false)]);
    write_curves_obj(&hair, &curves_path).unwrap();
    let written = std::fs::read_to_string(&curves_path).unwrap();
    assert!(written.ends_with("l 1 2\n"));

    assert!(matches!(read_obj(dir.path().join("missing.obj")), Err(HairError::Io(_))));
}

#[test]
fn test_settings_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut settings = HairSettings::default();
    settings.generator.hair_count = 123;
    settings.generator.seed_a = 42;
    settings.properties.root_kink = TexturedScalar::new(0.25);
    settings.properties.root_color = TexturedColor::new(Rgb::new(0.1, 0.0, 0.5));
    settings.groups = vec![
        InterpolationGroup::default(),
        InterpolationGroup {
            segment_count: 4,
            key: Rgb::BLACK,
            visible: false,
            ..Default::default()
        },
    ];

    save_json(&settings, &path).unwrap();
    let back: HairSettings = load_json(&path).unwrap();
    assert_eq!(back, settings);
    assert_eq!(back.interpolation_groups().len(), 2);
    assert!(!back.interpolation_groups().is_visible(1));
}

#[test]
fn test_partial_settings_use_defaults() {
    let json = r#"{ "generator": { "hair_count": 9 }, "properties": { "scale": 2.0 } }"#;
    let settings: HairSettings = hairgen::io::config::from_reader(json.as_bytes()).unwrap();
    assert_eq!(settings.generator.hair_count, 9);
    assert_eq!(settings.generator.seed_a, 1802);
    assert_eq!(settings.properties.scale.value, 2.0);
    assert_eq!(settings.properties.root_width, 0.01);
    assert_eq!(settings.interpolation_groups().len(), 1);

    let bad = hairgen::io::config::from_reader::<HairSettings, _>("{ nope".as_bytes());
    assert!(matches!(bad, Err(HairError::Json(_))));
}
