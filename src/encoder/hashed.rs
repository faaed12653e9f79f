// Deterministic offline encoder.
//
// Derives a sinusoid vector from a hash of the input text, then
// L2-normalizes it. Identical texts land on identical unit vectors (inner
// product 1.0), different texts land effectively orthogonal — so exact
// duplicates still cluster without any model on disk. Useful for smoke runs
// and tests; it carries no semantics, and the CLI says so when selected.

use std::hash::{DefaultHasher, Hash, Hasher};

use anyhow::Result;
use async_trait::async_trait;

use super::traits::TextEncoder;

/// Vector dimension for the hashed encoder. Matches the ONNX encoder so the
/// two are interchangeable downstream.
pub const HASHED_DIM: usize = 384;

/// Text encoder that needs no model files. Purely deterministic.
#[derive(Debug, Default)]
pub struct HashedEncoder;

impl HashedEncoder {
    fn embed_one(text: &str) -> Vec<f64> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let h = hasher.finish();

        let mut v: Vec<f64> = (0..HASHED_DIM)
            .map(|i| (((h >> (i % 32)) as u32 as f64) * 1e-4 + i as f64 * 0.37).sin())
            .collect();
        l2_normalize_in_place(&mut v);
        v
    }
}

#[async_trait]
impl TextEncoder for HashedEncoder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts.iter().map(|t| Self::embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        HASHED_DIM
    }
}

/// Scale a vector to unit L2 norm. A zero vector is left untouched.
pub fn l2_normalize_in_place(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
