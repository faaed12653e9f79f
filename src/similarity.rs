// Similarity relation over a batch of texts.
//
// One encoder call for the whole ordered batch (a single vector space, one
// round trip), then an all-pairs inner-product comparison. Every index maps
// to the ascending-sorted set of indices whose similarity meets the
// threshold. The relation is built once and read-only afterward; there is no
// caching across calls — callers who want caching do it outside.

use crate::encoder::traits::TextEncoder;
use crate::error::ClusterError;

/// Inner-product similarity at or above this counts as a near-duplicate.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.75;

/// Per-index similarity sets: `neighbors(i)` is every `j` with
/// `dot(e_i, e_j) >= threshold`, ascending, always including `i` itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMap {
    sets: Vec<Vec<usize>>,
}

impl SimilarityMap {
    /// Build the relation from precomputed embeddings.
    ///
    /// Self-inclusion is forced: mean-pooled vectors are not unit-norm, so a
    /// degenerate row could otherwise fail to match even itself and break the
    /// sweep's partition invariant.
    pub fn build(embeddings: &[Vec<f64>], threshold: f64) -> Result<Self, ClusterError> {
        validate_threshold(threshold)?;

        let dim = embeddings.first().map(|v| v.len()).unwrap_or(0);
        for (i, v) in embeddings.iter().enumerate() {
            if v.len() != dim {
                return Err(ClusterError::Encoding(format!(
                    "vector {i} has dimension {}, expected {dim}",
                    v.len()
                )));
            }
            if v.iter().any(|x| !x.is_finite()) {
                return Err(ClusterError::Encoding(format!(
                    "vector {i} contains non-finite values"
                )));
            }
        }

        let n = embeddings.len();
        let mut sets = Vec::with_capacity(n);
        for i in 0..n {
            let row: Vec<usize> = (0..n)
                .filter(|&j| i == j || inner_product(&embeddings[i], &embeddings[j]) >= threshold)
                .collect();
            sets.push(row);
        }

        Ok(Self { sets })
    }

    /// Build directly from index sets. Rows are sorted and deduplicated;
    /// self-inclusion is forced, mirroring `build`.
    pub fn from_sets(mut sets: Vec<Vec<usize>>) -> Self {
        for (i, row) in sets.iter_mut().enumerate() {
            row.push(i);
            row.sort_unstable();
            row.dedup();
        }
        Self { sets }
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Ascending similarity set for index `i`.
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.sets[i]
    }
}

/// Embed the texts in one batch call and derive the similarity relation.
///
/// Encoder failures and cardinality mismatches surface as `Encoding` errors;
/// nothing is padded or truncated.
pub async fn compute_similarity(
    encoder: &dyn TextEncoder,
    texts: &[String],
    threshold: f64,
) -> Result<SimilarityMap, ClusterError> {
    validate_threshold(threshold)?;
    if texts.is_empty() {
        return Err(ClusterError::Input("no texts to compare".into()));
    }

    let embeddings = encoder
        .embed_batch(texts)
        .await
        .map_err(|e| ClusterError::Encoding(format!("{e:#}")))?;

    if embeddings.len() != texts.len() {
        return Err(ClusterError::Encoding(format!(
            "encoder returned {} vectors for {} texts",
            embeddings.len(),
            texts.len()
        )));
    }

    let declared = encoder.dimension();
    for (i, v) in embeddings.iter().enumerate() {
        if v.len() != declared {
            return Err(ClusterError::Encoding(format!(
                "vector {i} has dimension {}, encoder declares {declared}",
                v.len()
            )));
        }
    }

    SimilarityMap::build(&embeddings, threshold)
}

/// Plain dot product. The reference comparison — note this is NOT cosine:
/// magnitudes matter unless the encoder normalizes.
pub fn inner_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Thresholds only make sense within [-1, 1] for inner-product similarity on
/// normalized vectors.
pub fn validate_threshold(threshold: f64) -> Result<(), ClusterError> {
    if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
        return Err(ClusterError::ThresholdConfig(threshold));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_product_basics() {
        assert_eq!(inner_product(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(inner_product(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
    }

    #[test]
    fn build_groups_identical_unit_vectors() {
        let e1 = vec![1.0, 0.0];
        let e2 = vec![1.0, 0.0];
        let e3 = vec![0.0, 1.0];
        let map = SimilarityMap::build(&[e1, e2, e3], 0.75).unwrap();
        assert_eq!(map.neighbors(0), &[0, 1]);
        assert_eq!(map.neighbors(1), &[0, 1]);
        assert_eq!(map.neighbors(2), &[2]);
    }

    #[test]
    fn build_threshold_boundary_is_inclusive() {
        // dot = exactly 0.75
        let a = vec![1.0, 0.0];
        let b = vec![0.75, 0.0];
        let map = SimilarityMap::build(&[a, b], 0.75).unwrap();
        assert!(map.neighbors(0).contains(&1));
    }

    #[test]
    fn build_forces_self_inclusion_for_sub_threshold_norm() {
        // Self inner product is 0.25, below the 0.75 threshold.
        let v = vec![0.5, 0.0];
        let map = SimilarityMap::build(&[v], 0.75).unwrap();
        assert_eq!(map.neighbors(0), &[0]);
    }

    #[test]
    fn build_rejects_nan_vectors() {
        let err = SimilarityMap::build(&[vec![f64::NAN, 0.0]], 0.75).unwrap_err();
        assert!(matches!(err, ClusterError::Encoding(_)));
    }

    #[test]
    fn build_rejects_mixed_dimensions() {
        let err = SimilarityMap::build(&[vec![1.0, 0.0], vec![1.0]], 0.75).unwrap_err();
        assert!(matches!(err, ClusterError::Encoding(_)));
    }

    #[test]
    fn build_rejects_out_of_range_threshold() {
        assert!(matches!(
            SimilarityMap::build(&[vec![1.0]], 1.5),
            Err(ClusterError::ThresholdConfig(_))
        ));
        assert!(matches!(
            SimilarityMap::build(&[vec![1.0]], f64::NAN),
            Err(ClusterError::ThresholdConfig(_))
        ));
    }

    #[test]
    fn from_sets_sorts_and_forces_self() {
        let map = SimilarityMap::from_sets(vec![vec![1], vec![0], vec![]]);
        assert_eq!(map.neighbors(0), &[0, 1]);
        assert_eq!(map.neighbors(1), &[0, 1]);
        assert_eq!(map.neighbors(2), &[2]);
    }

    #[test]
    fn build_is_symmetric() {
        // Random-ish fixed vectors; inner product is symmetric so the
        // relation must be too.
        let vs: Vec<Vec<f64>> = vec![
            vec![0.9, 0.1, 0.2],
            vec![0.85, 0.2, 0.15],
            vec![0.1, 0.95, 0.0],
            vec![0.0, 0.9, 0.3],
        ];
        let map = SimilarityMap::build(&vs, 0.75).unwrap();
        for i in 0..map.len() {
            for &j in map.neighbors(i) {
                assert!(
                    map.neighbors(j).contains(&i),
                    "asymmetry: {j} in sim({i}) but not vice versa"
                );
            }
        }
    }
}
