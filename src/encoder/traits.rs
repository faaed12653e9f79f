// Text encoder trait — the swap-ready embedding boundary.
//
// The clustering core never talks to a model directly; it consumes anything
// that maps an ordered batch of texts to an ordered batch of vectors. The
// default implementation runs all-MiniLM-L6-v2 locally via ONNX; a hashed
// deterministic encoder is available for offline runs and tests.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for turning texts into embedding vectors.
///
/// The contract is batch-atomic and order-preserving: one call for the whole
/// input list, output vector `i` corresponds to input text `i`, and all
/// vectors share one space and dimension. Implementations must be async
/// because inference is offloaded off the runtime thread (or may be remote).
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Embed a batch of texts, returning one vector per text in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;

    /// Output dimension of this encoder's vectors.
    fn dimension(&self) -> usize;
}
