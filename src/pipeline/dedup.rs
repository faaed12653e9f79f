// Deduplication pipeline: embed, compare, sweep, merge.
//
// One forward pass over the articles in input order. Each unvisited index
// seeds a new group and absorbs every still-unassigned index reachable
// within two similarity hops (its neighbors' neighbor sets — one widening
// hop, deliberately not a transitive closure to a fixpoint). The seed record
// keeps the group: texts newline-joined, duplicate counts summed, publish
// dates collapsed to a min/max range. Absorbed members drop out of the
// output.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info};

use crate::article::{Article, GROUP_UNASSIGNED};
use crate::encoder::traits::TextEncoder;
use crate::error::ClusterError;
use crate::similarity::{compute_similarity, SimilarityMap};

/// Run the full pipeline: one batch encoder call, then the grouping sweep.
///
/// An empty input returns an empty output without touching the encoder.
/// Encoder failures propagate unchanged; there are no retries and no partial
/// results.
pub async fn run(
    encoder: &dyn TextEncoder,
    articles: Vec<Article>,
    threshold: f64,
) -> Result<Vec<Article>, ClusterError> {
    if articles.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<String> = articles
        .iter()
        .map(|a| a.contentdescription.clone())
        .collect();

    let similar = compute_similarity(encoder, &texts, threshold).await?;
    info!(
        articles = articles.len(),
        threshold, "Similarity relation computed"
    );

    Ok(group_articles(articles, &similar))
}

/// The grouping sweep. Pure: consumes the article list and a similarity
/// relation covering every index, returns the merged records sorted by
/// duplicate count descending (ties keep original relative order).
///
/// State machine per article: unvisited → seed, or unvisited → absorbed
/// member. Terminal either way — the skip set guarantees no index is ever
/// reconsidered, so group ids come out 0,1,2,… in seed order with no gaps.
pub fn group_articles(mut articles: Vec<Article>, similar: &SimilarityMap) -> Vec<Article> {
    debug_assert_eq!(similar.len(), articles.len());

    let n = articles.len();
    let mut skipped: HashSet<usize> = HashSet::with_capacity(n);
    let mut removed = vec![false; n];
    let mut group_id: i64 = 0;

    for i in 0..n {
        if skipped.contains(&i) || articles[i].group != GROUP_UNASSIGNED {
            continue;
        }

        // i seeds a new group.
        articles[i].group = group_id;
        let mut members = vec![i];

        // Two-hop candidates: the union of the similarity sets of everything
        // similar to i. BTreeSet gives deduplication plus a deterministic
        // ascending absorption order, which fixes the merged-text order.
        let mut candidates: BTreeSet<usize> = BTreeSet::new();
        for &j in similar.neighbors(i) {
            candidates.extend(similar.neighbors(j).iter().copied());
        }

        for c in candidates {
            if skipped.contains(&c) {
                continue;
            }
            if articles[c].group == GROUP_UNASSIGNED {
                articles[c].group = group_id;
                members.push(c);
            }
        }

        // Merge onto the seed: joined text, summed duplicates, date range.
        let merged_text = members
            .iter()
            .map(|&m| articles[m].contentdescription.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let merged_duplicates: u64 = members.iter().map(|&m| articles[m].duplicates).sum();
        let start = members
            .iter()
            .map(|&m| articles[m].publisheddate)
            .min()
            .unwrap_or(articles[i].publisheddate);
        let latest = members
            .iter()
            .map(|&m| articles[m].publisheddate)
            .max()
            .unwrap_or(articles[i].publisheddate);

        articles[i].contentdescription = merged_text;
        articles[i].duplicates = merged_duplicates;
        articles[i].startdate = Some(start);
        articles[i].latestdate = Some(latest);

        debug!(
            group = group_id,
            seed = i,
            size = members.len(),
            "Group formed"
        );

        for &m in &members {
            skipped.insert(m);
            if m != i {
                removed[m] = true;
            }
        }
        group_id += 1;
    }

    let mut surviving: Vec<Article> = articles
        .into_iter()
        .zip(removed)
        .filter_map(|(a, gone)| (!gone).then_some(a))
        .collect();

    // Stable: equal duplicate counts keep their original relative order.
    surviving.sort_by(|a, b| b.duplicates.cmp(&a.duplicates));
    surviving
}
