pub mod lattice;
pub mod sampler;
pub mod warp;

pub use sampler::{SubTriangle, SurfaceSampler};
