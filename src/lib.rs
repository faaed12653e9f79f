// Newsfold: near-duplicate news article clustering.
//
// This is the library root. Each module corresponds to a major subsystem
// of the deduplication pipeline.

pub mod article;
pub mod config;
pub mod encoder;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod similarity;
