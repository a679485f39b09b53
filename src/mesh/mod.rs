pub mod mesh_point;
pub mod surface;
pub mod triangle;
pub mod uv_grid;

pub use mesh_point::{MeshPoint, UvPoint};
pub use surface::{MeshSurface, Pose, TriangleMesh};
pub use triangle::Triangle;
pub use uv_grid::{UvGrid, UvLookup};
