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

use hairgen::geometry::{Vector2, Vector3};
use hairgen::guides::{
    GuideIndex, GuideSet, InterpolationGroup, InterpolationGroups, InterpolationScratch, Interpolator, Neighbor,
    interpolation_weights,
};
use hairgen::guides::interpolation::Weights;
use hairgen::guides::spatial_hash::Neighbors;
use hairgen::mesh::{MeshSurface, Pose, TriangleMesh, UvLookup, UvPoint};
use hairgen::numeric::{Rgb, UniformRandom};
use hairgen::sampling::SurfaceSampler;
use hairgen::texture::Texture;

fn neighbors(distances: &[f64]) -> Vec<Neighbor> {
    distances
        .iter()
        .enumerate()
        .map(|(i, &distance)| Neighbor {
            guide: i as u32,
            distance,
        })
        .collect()
}

#[test]
fn test_weights_are_normalized() {
    let mut w = Weights::new();
    for power in [1.0, 2.0, 3.5] {
        interpolation_weights(&neighbors(&[0.1, 0.4, 0.5, 2.0]), power, &mut w);
        assert_eq!(w.len(), 4);
        assert!(w.iter().all(|&x| x >= 0.0));
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(w[0] > w[1] && w[1] > w[2] && w[2] > w[3]);
    }
}

#[test]
fn test_inverse_square_weights() {
    let mut w = Weights::new();
    interpolation_weights(&neighbors(&[1.0, 2.0]), 2.0, &mut w);
    assert!((w[0] - 0.8).abs() < 1e-12);
    assert!((w[1] - 0.2).abs() < 1e-12);
}

#[test]
fn test_zero_distance_takes_all_weight() {
    let mut w = Weights::new();
    interpolation_weights(&neighbors(&[0.0, 0.3, 0.7]), 2.0, &mut w);
    assert_eq!(w.as_slice(), &[1.0, 0.0, 0.0]);

    interpolation_weights(&[], 2.0, &mut w);
    assert!(w.is_empty());
}

/// Two guides on a unit plane: a straight one at (0.25, 0.25) and a bent one
/// at (0.75, 0.75).
fn two_guides(mesh: &TriangleMesh) -> GuideSet {
    let mut guides = GuideSet::new();
    let grid = hairgen::mesh::UvGrid::build(mesh, 16);
    let a = grid.lookup(0.25, 0.25);
    let b = grid.lookup(0.75, 0.75);
    guides.push(mesh, a, 0, vec![Vector3::new(0.0, 0.1, 0.0); 4]).unwrap();
    guides
        .push(mesh, b, 0, vec![Vector3::new(0.05, 0.1, 0.0), Vector3::new(0.1, 0.0, 0.0)])
        .unwrap();
    guides
}

#[test]
fn test_sample_on_guide_root_reproduces_guide() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let guides = two_guides(&mesh);
    let index = GuideIndex::build(&guides);
    let groups = InterpolationGroups::single(4);
    let interpolator = Interpolator {
        mesh: &mesh,
        guides: &guides,
        index: &index,
        groups: &groups,
        neighbor_count: 2,
        falloff_power: 2.0,
    };

    let mut scratch = InterpolationScratch::default();
    let hair = interpolator.interpolate(&guides.rest(0).uv, &mut scratch).unwrap();
    assert_eq!(hair.points.len(), 5);
    for (i, p) in hair.points.iter().enumerate() {
        assert!((p.y - 0.1 * i as f64).abs() < 1e-12);
        assert!(p.x.abs() < 1e-12 && p.z.abs() < 1e-12);
    }
}

#[test]
fn test_shorter_guide_is_padded_to_group_segment_count() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let guides = two_guides(&mesh);
    let index = GuideIndex::build(&guides);
    let groups = InterpolationGroups::single(4);
    let interpolator = Interpolator {
        mesh: &mesh,
        guides: &guides,
        index: &index,
        groups: &groups,
        neighbor_count: 1,
        falloff_power: 2.0,
    };

    let mut scratch = InterpolationScratch::default();
    let hair = interpolator.interpolate(&guides.rest(1).uv, &mut scratch).unwrap();
    let expected = [
        Vector3::ZERO,
        Vector3::new(0.05, 0.1, 0.0),
        Vector3::new(0.15, 0.1, 0.0),
        Vector3::new(0.25, 0.1, 0.0),
        Vector3::new(0.35, 0.1, 0.0),
    ];
    for (p, e) in hair.points.iter().zip(expected) {
        assert!(p.distance(&e) < 1e-12, "{p:?} vs {e:?}");
    }
}

#[test]
fn test_blend_between_guides_is_weighted() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let guides = two_guides(&mesh);
    let index = GuideIndex::build(&guides);
    let groups = InterpolationGroups::single(1);
    let interpolator = Interpolator {
        mesh: &mesh,
        guides: &guides,
        index: &index,
        groups: &groups,
        neighbor_count: 2,
        falloff_power: 2.0,
    };

    // Halfway between both roots the weights are equal.
    let mid = hairgen::mesh::UvGrid::build(&mesh, 16).lookup(0.5, 0.5);
    let mut scratch = InterpolationScratch::default();
    let hair = interpolator.interpolate(&mid, &mut scratch).unwrap();
    assert!((scratch.weights[0] - 0.5).abs() < 1e-9);
    let tip = hair.points[1];
    assert!((tip.x - 0.025).abs() < 1e-9);
    assert!((tip.y - 0.1).abs() < 1e-9);
}

fn split_groups() -> InterpolationGroups {
    let groups = vec![
        InterpolationGroup {
            key: Rgb::BLACK,
            ..Default::default()
        },
        InterpolationGroup {
            key: Rgb::WHITE,
            segment_count: 3,
            ..Default::default()
        },
    ];
    let texture = Texture::from_fn(16, 16, |u, _| if u < 0.5 { 0.0 } else { 1.0 }).unwrap();
    InterpolationGroups::new(groups).with_texture(texture)
}

#[test]
fn test_groups_never_mix() {
    let mesh = TriangleMesh::plane(1.0, 4).unwrap();
    let groups = split_groups();
    assert_eq!(groups.group_at(0.1, 0.5), 0);
    assert_eq!(groups.group_at(0.9, 0.5), 1);

    // Guides only on the left half.
    let grid = hairgen::mesh::UvGrid::build(&mesh, 16);
    let mut guides = GuideSet::new();
    for v in [0.2, 0.5, 0.8] {
        guides.push(&mesh, grid.lookup(0.2, v), 0, vec![Vector3::Y * 0.1; 2]).unwrap();
    }
    let index = GuideIndex::build(&guides);
    let interpolator = Interpolator {
        mesh: &mesh,
        guides: &guides,
        index: &index,
        groups: &groups,
        neighbor_count: 3,
        falloff_power: 2.0,
    };
    let mut scratch = InterpolationScratch::default();
    assert!(interpolator.interpolate(&grid.lookup(0.3, 0.5), &mut scratch).is_some());
    assert!(interpolator.interpolate(&grid.lookup(0.9, 0.5), &mut scratch).is_none());
}

#[test]
fn test_hidden_group_produces_nothing() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let guides = two_guides(&mesh);
    let index = GuideIndex::build(&guides);
    let mut groups = InterpolationGroups::single(4);
    groups.get_mut(0).unwrap().visible = false;
    let interpolator = Interpolator {
        mesh: &mesh,
        guides: &guides,
        index: &index,
        groups: &groups,
        neighbor_count: 2,
        falloff_power: 2.0,
    };
    let mut scratch = InterpolationScratch::default();
    assert!(interpolator.interpolate(&guides.rest(0).uv, &mut scratch).is_none());
}

#[test]
fn test_nearest_matches_brute_force() {
    let mesh = TriangleMesh::plane(3.0, 6).unwrap();
    let sampler = SurfaceSampler::build(&mesh, &Texture::constant(1.0)).unwrap();
    let mut rng = UniformRandom::new(5, 6);
    let groups = InterpolationGroups::single(2);
    let guides = GuideSet::seed(&mesh, &sampler, &mut rng, &groups, 200, 0.5).unwrap();
    assert_eq!(guides.len(), 200);
    let index = GuideIndex::build(&guides);

    let mut out = Neighbors::new();
    for _ in 0..50 {
        let q = Vector3::new(rng.uniform_f64(-0.5, 3.5), rng.uniform_f64(-0.5, 3.5), rng.uniform_f64(-0.2, 0.2));
        index.nearest(0, &q, 5, &mut out);

        let mut brute: Vec<(f64, u32)> = guides
            .rest_positions()
            .iter()
            .enumerate()
            .map(|(i, r)| (r.point.position.distance(&q), i as u32))
            .collect();
        brute.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let got: Vec<u32> = out.iter().map(|n| n.guide).collect();
        let want: Vec<u32> = brute.iter().take(5).map(|b| b.1).collect();
        assert_eq!(got, want);
    }
}

#[test]
fn test_seeded_guides_grow_along_normal() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let sampler = SurfaceSampler::build(&mesh, &Texture::constant(1.0)).unwrap();
    let mut rng = UniformRandom::default();
    let guides = GuideSet::seed(&mesh, &sampler, &mut rng, &InterpolationGroups::single(5), 10, 1.0).unwrap();
    for id in 0..guides.len() {
        let pts = guides.world_points(id);
        assert_eq!(pts.len(), 6);
        // The plane faces +Z.
        let tip = pts[5] - pts[0];
        assert!((tip.z - 1.0).abs() < 1e-9, "{tip:?}");
    }
}

#[test]
fn test_guide_dropped_when_topology_no_longer_covers_it() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let grid = hairgen::mesh::UvGrid::build(&mesh, 16);
    let mut guides = GuideSet::new();
    for (u, v) in [(0.1, 0.1), (0.9, 0.5), (0.3, 0.7), (0.8, 0.9)] {
        guides.push(&mesh, grid.lookup(u, v), 0, vec![Vector3::Y; 3]).unwrap();
    }
    let old_count = guides.len();

    // Left half of the UV square only.
    let edited = TriangleMesh::new(
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.5, 0.0, 0.0),
            Vector3::new(0.5, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ],
        vec![Vector2::new(0.0, 0.0), Vector2::new(0.5, 0.0), Vector2::new(0.5, 1.0), Vector2::new(0.0, 1.0)],
        vec![[0, 1, 2], [0, 2, 3]],
    )
    .unwrap();

    let mut lookup = UvLookup::new(32);
    let report = guides.reanchor(&edited, &mut lookup);
    assert_eq!(report.dropped, vec![1, 3]);
    assert_eq!(report.guide_count, old_count - report.dropped.len());
    assert_eq!(guides.len(), 2);
    for id in 0..guides.len() {
        assert!(guides.rest(id).uv.triangle_id < edited.triangle_count() as u32);
        assert_eq!(guides.segments(id).len(), 3);
        assert!(edited.mesh_point(&guides.rest(id).uv, Pose::Current).is_some());
    }
}

#[test]
fn test_update_current_follows_deformed_pose() {
    let mut mesh = TriangleMesh::plane(1.0, 1).unwrap();
    let grid = hairgen::mesh::UvGrid::build(&mesh, 8);
    let mut guides = GuideSet::new();
    guides.push(&mesh, grid.lookup(0.6, 0.3), 0, vec![Vector3::Y]).unwrap();

    let lifted: Vec<Vector3> = mesh.positions(Pose::Rest).iter().map(|p| *p + Vector3::Z * 2.0).collect();
    mesh.set_current_positions(lifted).unwrap();
    guides.update_current(&mesh);

    let current = guides.current(0).point.position;
    let rest = guides.rest(0).point.position;
    assert!((current - rest - Vector3::Z * 2.0).norm_squared() < 1e-18);

    let old = guides.set_segments(0, vec![Vector3::Y * 2.0]).unwrap();
    assert_eq!(old, vec![Vector3::Y]);
    assert!(guides.set_segments(5, Vec::new()).is_none());
}

#[test]
fn test_not_found_sample_is_skipped() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let guides = two_guides(&mesh);
    let index = GuideIndex::build(&guides);
    let groups = InterpolationGroups::single(4);
    let interpolator = Interpolator {
        mesh: &mesh,
        guides: &guides,
        index: &index,
        groups: &groups,
        neighbor_count: 2,
        falloff_power: 2.0,
    };
    let mut scratch = InterpolationScratch::default();
    assert!(interpolator.interpolate(&UvPoint::not_found(), &mut scratch).is_none());
}

fn brute_nearest(guides: &GuideSet, q: &Vector3, k: usize) -> Vec<u32> {
    let mut all: Vec<(f64, u32)> = guides
        .rest_positions()
        .iter()
        .enumerate()
        .map(|(i, r)| (r.point.position.distance(q), i as u32))
        .collect();
    all.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    all.iter().take(k).map(|a| a.1).collect()
}

#[test]
fn test_single_guide_found_from_far_corner() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let grid = hairgen::mesh::UvGrid::build(&mesh, 16);
    let mut guides = GuideSet::new();
    guides.push(&mesh, grid.lookup(0.2, 0.2), 0, vec![Vector3::Y]).unwrap();

    let mut out = Neighbors::new();
    for index in [GuideIndex::build(&guides), GuideIndex::build_over(&guides, &mesh.bounding_box(Pose::Rest))] {
        assert!(index.cell_size() >= 1.0 / 1024.0);
        for q in [Vector3::new(0.1, 0.1, 0.0), Vector3::new(1.0, 1.0, 0.0), Vector3::new(-50.0, 80.0, 3.0)] {
            index.nearest(0, &q, 4, &mut out);
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].guide, 0);
        }
    }
}

#[test]
fn test_clustered_guides_found_from_far_corner() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let grid = hairgen::mesh::UvGrid::build(&mesh, 64);
    let mut guides = GuideSet::new();
    for i in 0..8 {
        let u = 0.5 + 0.000125 * i as f64;
        let v = 0.5 + 0.001 * (i % 2) as f64;
        guides.push(&mesh, grid.lookup(u, v), 0, vec![Vector3::Y]).unwrap();
    }
    // Two coincident guides.
    guides.push(&mesh, grid.lookup(0.5, 0.5), 0, vec![Vector3::Y]).unwrap();

    let mut out = Neighbors::new();
    for index in [GuideIndex::build(&guides), GuideIndex::build_over(&guides, &mesh.bounding_box(Pose::Rest))] {
        for q in [Vector3::new(0.01, 0.01, 0.0), Vector3::new(0.99, 0.0, 0.0), Vector3::new(0.5005, 0.5, 0.0)] {
            index.nearest(0, &q, 4, &mut out);
            let got: Vec<u32> = out.iter().map(|n| n.guide).collect();
            assert_eq!(got, brute_nearest(&guides, &q, 4));
        }
    }
}
