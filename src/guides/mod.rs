pub mod groups;
pub mod guide_set;
pub mod interpolation;
pub mod spatial_hash;

pub use groups::{InterpolationGroup, InterpolationGroups};
pub use guide_set::{CurrentPosition, GuideSet, ReanchorReport, RestPosition};
pub use interpolation::{InterpolatedHair, InterpolationScratch, Interpolator, interpolation_weights};
pub use spatial_hash::{GuideIndex, Neighbor};
