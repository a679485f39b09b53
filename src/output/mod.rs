pub mod buffers;
pub mod sink;

pub use buffers::{BoundsSink, CurveBuffer, ViewportBuffer, ViewportVertex};
pub use sink::{HairSink, SinkCapabilities};
