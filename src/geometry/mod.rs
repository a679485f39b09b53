pub mod aabb;
pub mod matrix;
pub mod util;
pub mod vector;

pub use aabb::Aabb;
pub use matrix::{Matrix, Matrix4};
pub use vector::{Vector2, Vector3, VectorOps};
