pub mod binary;
pub mod config;
pub mod obj;

pub use config::{HairSettings, load_json, save_json};
pub use obj::{read_obj, write_curves_obj};
