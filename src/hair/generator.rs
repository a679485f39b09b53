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

//! Generation driver: voxelized sampling, interpolation, deformation and
//! assembly of a full set of hair curves.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use log::{debug, info, warn};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{HairError, Result},
    geometry::Vector3,
    guides::{GuideIndex, GuideSet, InterpolatedHair, InterpolationGroups, InterpolationScratch, Interpolator},
    hair::{
        assembly::{self, HairCurve, HairStyle},
        deformation::{self, RootParameters},
        multi_strand,
        properties::HairProperties,
        voxel::{self, Voxel},
    },
    mesh::{MeshSurface, Pose},
    numeric::{
        UniformRandom,
        random::{DEFAULT_SEED_A, DEFAULT_SEED_B, MAX_SEED_A, MAX_SEED_B},
    },
    output::{HairSink, SinkCapabilities},
    sampling::{SurfaceSampler, lattice::MAX_DEPTH},
    texture::Texture,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed_a: i32,
    pub seed_b: i32,
    /// Interpolated hairs before multi-strand expansion.
    pub hair_count: usize,
    /// Guides blended per hair.
    pub neighbor_count: usize,
    /// Exponent of the inverse-distance weights.
    pub falloff_power: f64,
    /// Voxels per axis over the rest bounding box.
    pub voxel_resolution: u32,
    pub skip_points: bool,
    pub skip_threshold: f64,
    pub max_depth: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed_a: DEFAULT_SEED_A,
            seed_b: DEFAULT_SEED_B,
            hair_count: 1000,
            neighbor_count: 4,
            falloff_power: 2.0,
            voxel_resolution: 4,
            skip_points: false,
            skip_threshold: 1e-4,
            max_depth: MAX_DEPTH,
        }
    }
}

/// Shared flag to abandon a generation pass between voxels.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(HairError::Cancelled);
        }
        Ok(())
    }
}

/// Result of one generation pass, ready to be written to any sink.
#[derive(Clone, Debug, Default)]
pub struct GeneratedHair {
    curves: Vec<HairCurve>,
}

impl GeneratedHair {
    pub fn new(curves: Vec<HairCurve>) -> Self {
        GeneratedHair { curves }
    }

    pub fn curves(&self) -> &[HairCurve] {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn degenerate_count(&self) -> usize {
        self.curves.iter().filter(|c| c.degenerate).count()
    }

    pub fn max_points(&self) -> usize {
        self.curves.iter().map(|c| c.vertices.len()).max().unwrap_or(0)
    }

    /// Drives the sink protocol over every non-degenerate curve. Colors are
    /// already RGB; indices run over the whole output.
    pub fn write_to(&self, sink: &mut dyn HairSink) {
        let caps = sink.capabilities();
        let emitted: Vec<&HairCurve> = self.curves.iter().filter(|c| !c.degenerate).collect();
        sink.begin_output(emitted.len(), self.max_points());

        let mut next_index = 0u32;
        for curve in emitted {
            let vs = &curve.vertices;
            sink.begin_hair(vs.len());
            if caps.contains(SinkCapabilities::POSITIONS) {
                fill(sink.positions(), vs, |v| v.position);
            }
            if caps.contains(SinkCapabilities::COLORS) {
                fill(sink.colors(), vs, |v| v.color);
            }
            if caps.contains(SinkCapabilities::OPACITIES) {
                fill(sink.opacities(), vs, |v| v.opacity);
            }
            if caps.contains(SinkCapabilities::WIDTHS) {
                fill(sink.widths(), vs, |v| v.width);
            }
            if caps.contains(SinkCapabilities::NORMALS) {
                fill(sink.normals(), vs, |v| v.normal);
            }
            if caps.contains(SinkCapabilities::UVS) {
                fill(sink.uvs(), vs, |v| v.uv);
            }
            if caps.contains(SinkCapabilities::INDICES) {
                if let Some(out) = sink.indices() {
                    for (slot, i) in out.iter_mut().zip(next_index..next_index + vs.len() as u32) {
                        *slot = i;
                    }
                }
            }
            next_index += vs.len() as u32;
            sink.end_hair(vs.len());
        }
        sink.end_output();
    }
}

fn fill<T>(out: Option<&mut [T]>, vertices: &[assembly::CurveVertex], f: impl Fn(&assembly::CurveVertex) -> T) {
    if let Some(out) = out {
        for (slot, v) in out.iter_mut().zip(vertices) {
            *slot = f(v);
        }
    }
}

/// Everything one generation pass reads. Nothing here is mutated while
/// generating; guide editing happens between passes.
pub struct HairGenerator<'a, M: MeshSurface> {
    mesh: &'a M,
    density: &'a Texture,
    guides: &'a GuideSet,
    groups: &'a InterpolationGroups,
    properties: &'a HairProperties,
    config: GeneratorConfig,
    cancel: CancelToken,
}

struct VoxelJob {
    sampler: SurfaceSampler,
    hairs: usize,
    seed: (i32, i32),
}

impl<'a, M: MeshSurface> HairGenerator<'a, M> {
    pub fn new(
        mesh: &'a M,
        density: &'a Texture,
        guides: &'a GuideSet,
        groups: &'a InterpolationGroups,
        properties: &'a HairProperties,
    ) -> Self {
        HairGenerator {
            mesh,
            density,
            guides,
            groups,
            properties,
            config: GeneratorConfig::default(),
            cancel: CancelToken::default(),
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Runs one pass.
    ///
    /// Each voxel owns a sampler and a random stream seeded from the master
    /// stream in voxel order, so the output only depends on the inputs and
    /// the configured seeds. Per hair the stream is consumed as: three draws
    /// for the surface sample, three for the style (mutant, hue, value), then
    /// four per child strand.
    pub fn generate(&self) -> Result<GeneratedHair> {
        if self.guides.is_empty() {
            warn!("no guides to interpolate from");
            return Ok(GeneratedHair::default());
        }

        let voxels = voxel::voxelize(self.mesh, self.config.voxel_resolution);
        let jobs = self.plan(&voxels)?;

        let index = GuideIndex::build_over(self.guides, &self.mesh.bounding_box(Pose::Rest));
        let interpolator = Interpolator {
            mesh: self.mesh,
            guides: self.guides,
            index: &index,
            groups: self.groups,
            neighbor_count: self.config.neighbor_count,
            falloff_power: self.config.falloff_power,
        };

        let per_voxel: Vec<Vec<HairCurve>> = jobs
            .par_iter()
            .map(|job| self.run_voxel(job, &interpolator))
            .collect::<Result<_>>()?;

        let curves: Vec<HairCurve> = per_voxel.into_iter().flatten().collect();
        let hair = GeneratedHair::new(curves);
        info!(
            "generated {} curves ({} degenerate) over {} voxels",
            hair.len(),
            hair.degenerate_count(),
            jobs.len()
        );
        Ok(hair)
    }

    /// Builds voxel samplers in parallel, drops empty voxels and apportions
    /// the hair count by density.
    fn plan(&self, voxels: &[Voxel]) -> Result<Vec<VoxelJob>> {
        let samplers: Vec<Option<SurfaceSampler>> = voxels
            .par_iter()
            .map(|v| {
                self.cancel.check()?;
                match SurfaceSampler::build_subset(self.mesh, self.density, Some(&v.triangles), self.config.max_depth) {
                    Ok(s) => Ok(Some(s)),
                    Err(HairError::ZeroDensity { .. }) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .collect::<Result<_>>()?;

        let empty = samplers.iter().filter(|s| s.is_none()).count();
        if empty == samplers.len() {
            return Err(HairError::ZeroDensity {
                triangles: self.mesh.triangle_count(),
            });
        }
        debug!("{} voxels, {empty} without density", voxels.len());

        let weights: Vec<f64> = samplers
            .iter()
            .map(|s| s.as_ref().map_or(0.0, SurfaceSampler::total_density))
            .collect();
        let shares = voxel::apportion(&weights, self.config.hair_count);

        let mut master = UniformRandom::new(self.config.seed_a, self.config.seed_b);
        let mut jobs = Vec::with_capacity(samplers.len() - empty);
        for (sampler, hairs) in samplers.into_iter().zip(shares) {
            let seed = (master.random_range(0..=MAX_SEED_A), master.random_range(0..=MAX_SEED_B));
            if let Some(sampler) = sampler {
                jobs.push(VoxelJob { sampler, hairs, seed });
            }
        }
        Ok(jobs)
    }

    fn run_voxel(&self, job: &VoxelJob, interpolator: &Interpolator<'_, M>) -> Result<Vec<HairCurve>> {
        self.cancel.check()?;
        let mut rng = UniformRandom::new(job.seed.0, job.seed.1);
        let mut scratch = InterpolationScratch::default();
        let mut curves = Vec::with_capacity(job.hairs * (self.properties.multi_strand_count.max(1) as usize));
        for _ in 0..job.hairs {
            let uv = job.sampler.next(&mut rng)?;
            if let Some(hair) = interpolator.interpolate(&uv, &mut scratch) {
                self.grow(hair, &mut rng, &mut curves);
            }
        }
        Ok(curves)
    }

    /// Deforms one interpolated hair and appends its finished curves.
    pub fn grow(&self, hair: InterpolatedHair, rng: &mut UniformRandom, out: &mut Vec<HairCurve>) {
        let props = self.properties;
        let params = RootParameters::sample(props, hair.rest.u, hair.rest.v);

        let mut points = hair.points;
        deformation::shape(&mut points, props, &params, &hair.rest.position);
        let style = HairStyle::draw(props, &params, rng);

        let frame = hair.root.local_to_world();
        let skip = self.config.skip_points.then_some(self.config.skip_threshold);
        for mut strand in multi_strand::expand(points, props, rng) {
            let degenerate = deformation::cut(&mut strand, params.cut);
            let world: Vec<Vector3> = strand.iter().map(|p| frame.transform_point(p)).collect();
            out.push(HairCurve {
                vertices: assembly::assemble(&world, &style, &hair.root, skip),
                root_uv: hair.uv,
                group: hair.group,
                degenerate,
            });
        }
    }
}
