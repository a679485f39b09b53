pub mod assembly;
pub mod deformation;
pub mod generator;
pub mod multi_strand;
pub mod properties;
pub mod voxel;

pub use assembly::{CurveVertex, HairCurve, HairStyle};
pub use deformation::RootParameters;
pub use generator::{CancelToken, GeneratedHair, GeneratorConfig, HairGenerator};
pub use properties::{HairProperties, TexturedColor, TexturedScalar};
pub use voxel::Voxel;
