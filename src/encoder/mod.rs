// Embedding boundary — trait, backends, and model download.

pub mod download;
pub mod hashed;
pub mod onnx;
pub mod traits;
