// Input loading — a JSON array of article records.
//
// The upstream scraper writes query result files like `data/query1302_1902.json`:
// a flat JSON array where each element carries at least `contentdescription`,
// `publisheddate`, and `duplicates`. Anything malformed is an Input error and
// nothing downstream runs — fail fast, before the encoder is ever touched.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::article::Article;
use crate::error::ClusterError;

/// Load an article list from a JSON file.
pub fn load_articles(path: &Path) -> Result<Vec<Article>, ClusterError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ClusterError::Input(format!("cannot read {}: {e}", path.display())))?;
    parse_articles(&raw)
}

/// Parse an article list from a JSON string.
///
/// Errors name the offending record index so a 400-row export with one bad
/// date is debuggable without bisection.
pub fn parse_articles(raw: &str) -> Result<Vec<Article>, ClusterError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ClusterError::Input(format!("not valid JSON: {e}")))?;

    let rows = value
        .as_array()
        .ok_or_else(|| ClusterError::Input("expected a JSON array of article records".into()))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            serde_json::from_value::<Article>(row.clone())
                .map_err(|e| ClusterError::Input(format!("record {i}: {e}")))
        })
        .collect()
}
