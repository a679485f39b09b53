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

use hairgen::HairError;
use hairgen::mesh::{MeshSurface, Pose, TriangleMesh};
use hairgen::numeric::UniformRandom;
use hairgen::sampling::SurfaceSampler;
use hairgen::texture::Texture;

fn quad() -> TriangleMesh {
    TriangleMesh::plane(1.0, 1).unwrap()
}

#[test]
fn test_cdf_is_monotonic_and_ends_at_total() {
    let mesh = TriangleMesh::plane(2.0, 3).unwrap();
    let density = Texture::from_fn(32, 32, |u, v| (u * v) as f32).unwrap();
    let sampler = SurfaceSampler::build(&mesh, &density).unwrap();

    let entries = sampler.sub_triangles();
    assert!(!entries.is_empty());
    for w in entries.windows(2) {
        assert!(w[0].cdf <= w[1].cdf);
    }
    let last = entries.last().unwrap().cdf;
    assert_eq!(last, sampler.total_density());
    assert!(entries.iter().all(|e| (e.triangle_id as usize) < mesh.triangle_count()));
}

#[test]
fn test_triangle_pdf_sums_to_one() {
    let mesh = TriangleMesh::plane(1.0, 4).unwrap();
    let density = Texture::from_fn(16, 16, |u, _| 0.1 + u as f32).unwrap();
    let sampler = SurfaceSampler::build(&mesh, &density).unwrap();
    let sum: f64 = sampler.triangle_pdf().iter().map(|(_, p)| p).sum();
    assert!((sum - 1.0).abs() < 1e-12);
    assert_eq!(sampler.triangle_pdf().len(), mesh.triangle_count());
}

#[test]
fn test_zero_density_is_reported() {
    let err = SurfaceSampler::build(&quad(), &Texture::constant(0.0)).unwrap_err();
    assert!(matches!(err, HairError::ZeroDensity { triangles: 2 }));
}

#[test]
fn test_uniform_density_merges_to_one_entry_per_triangle() {
    let density = Texture::from_fn(256, 256, |_, _| 1.0).unwrap();
    let sampler = SurfaceSampler::build(&quad(), &density).unwrap();
    assert_eq!(sampler.sub_triangles().len(), 2);
    assert!((sampler.total_density() - 1.0).abs() < 1e-12);
}

#[test]
fn test_equal_area_triangles_split_evenly() {
    let mesh = quad();
    let sampler = SurfaceSampler::build(&mesh, &Texture::constant(1.0)).unwrap();
    let mut rng = UniformRandom::new(1802, 9373);

    let mut counts = [0usize; 2];
    for _ in 0..1000 {
        let uv = sampler.next(&mut rng).unwrap();
        counts[uv.triangle_id as usize] += 1;
    }
    for c in counts {
        assert!((450..=550).contains(&c), "counts {counts:?}");
    }
}

#[test]
fn test_samples_follow_density_gradient() {
    let mesh = TriangleMesh::plane(1.0, 4).unwrap();
    let density = Texture::from_fn(64, 64, |u, _| u as f32).unwrap();
    let sampler = SurfaceSampler::build(&mesh, &density).unwrap();
    let mut rng = UniformRandom::default();

    let n = 4000;
    let mut mean_u = 0.0;
    for _ in 0..n {
        let uv = sampler.next(&mut rng).unwrap();
        let p = mesh.mesh_point(&uv, Pose::Rest).unwrap();
        assert!((0.0..=1.0).contains(&p.u) && (0.0..=1.0).contains(&p.v));
        mean_u += p.u;
    }
    mean_u /= n as f64;
    // Density proportional to u has mean 2/3.
    assert!((mean_u - 2.0 / 3.0).abs() < 0.03, "mean u {mean_u}");
}

#[test]
fn test_samples_are_valid_barycentrics() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let density = Texture::from_fn(8, 8, |u, v| (1.0 + u - v) as f32).unwrap();
    let sampler = SurfaceSampler::build(&mesh, &density).unwrap();
    let mut rng = UniformRandom::default();
    for _ in 0..500 {
        let uv = sampler.next(&mut rng).unwrap();
        let [a, b, c] = uv.weights();
        assert!(a >= -1e-12 && b >= -1e-12 && c >= -1e-12);
        assert!((a + b + c - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_same_seed_same_samples() {
    let mesh = TriangleMesh::plane(1.0, 3).unwrap();
    let density = Texture::from_fn(8, 8, |u, v| (u + v) as f32).unwrap();
    let sampler = SurfaceSampler::build(&mesh, &density).unwrap();
    let mut a = UniformRandom::new(11, 22);
    let mut b = UniformRandom::new(11, 22);
    for _ in 0..200 {
        assert_eq!(sampler.next(&mut a).unwrap(), sampler.next(&mut b).unwrap());
    }
}

#[test]
fn test_subset_only_samples_selection() {
    let mesh = TriangleMesh::plane(1.0, 2).unwrap();
    let sampler = SurfaceSampler::build_subset(&mesh, &Texture::constant(1.0), Some(&[5, 2]), 8).unwrap();
    let ids: Vec<u32> = sampler.triangle_pdf().iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![5, 2]);

    let mut rng = UniformRandom::default();
    for _ in 0..100 {
        let t = sampler.next(&mut rng).unwrap().triangle_id;
        assert!(t == 5 || t == 2);
    }
}
