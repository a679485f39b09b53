pub mod color;
pub mod random;

pub use color::{Hsv, Rgb};
pub use random::UniformRandom;
