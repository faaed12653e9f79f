// Error taxonomy for the clustering core.
//
// The core surfaces typed errors so callers can tell a malformed input file
// apart from an encoder failure. The CLI layer wraps these in anyhow like
// everything else; conversion is free via the std Error impl.

use thiserror::Error;

/// Errors surfaced by the similarity builder and grouping engine.
///
/// All failures propagate to the caller immediately — no partial results,
/// no silent skipping of malformed articles.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// An input record is malformed: missing field, unparseable date, or the
    /// payload is not a JSON array of records. Raised before any encoder call.
    #[error("invalid input: {0}")]
    Input(String),

    /// The embedding boundary failed, returned the wrong number of vectors,
    /// or returned non-finite values. Retry is a caller policy, not ours.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// A supplied similarity threshold is outside [-1, 1].
    #[error("invalid similarity threshold {0}: must lie within [-1, 1]")]
    ThresholdConfig(f64),
}
