// Article records — the tabular contract that flows through the pipeline.
//
// Field names (`contentdescription`, `publisheddate`, `duplicates`) match the
// JSON exports of the upstream news scraper, so its files deserialize
// directly. The three derived fields (`group`, `startdate`, `latestdate`) are
// written by the grouping sweep; on input they default to the unassigned
// sentinel and the article's own publish date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel group id for an article the sweep has not yet assigned.
pub const GROUP_UNASSIGNED: i64 = -1;

/// One news article, before or after grouping.
///
/// Identity is positional: an article is referred to everywhere by its index
/// in the original input list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Description text; after grouping, the representative carries the
    /// newline-joined texts of the whole group.
    pub contentdescription: String,
    /// Original publish date (unchanged by grouping).
    #[serde(with = "flexible_date")]
    pub publisheddate: NaiveDate,
    /// Duplicate count; after grouping, the sum over the group.
    pub duplicates: u64,
    /// Group id assigned by the sweep, or -1 if unassigned.
    #[serde(default = "unassigned")]
    pub group: i64,
    /// Earliest publish date in the article's group.
    #[serde(default, with = "optional_flexible_date")]
    pub startdate: Option<NaiveDate>,
    /// Latest publish date in the article's group.
    #[serde(default, with = "optional_flexible_date")]
    pub latestdate: Option<NaiveDate>,
}

fn unassigned() -> i64 {
    GROUP_UNASSIGNED
}

impl Article {
    /// Build a fresh input record with derived fields at their defaults.
    pub fn new(contentdescription: impl Into<String>, publisheddate: NaiveDate, duplicates: u64) -> Self {
        Self {
            contentdescription: contentdescription.into(),
            publisheddate,
            duplicates,
            group: GROUP_UNASSIGNED,
            startdate: None,
            latestdate: None,
        }
    }
}

/// Accepts both plain dates (`2022-01-01`) and RFC 3339 datetimes
/// (`2022-01-01T08:30:00Z`) — the scraper's exports carry both shapes.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(format!("unparseable date '{s}' (expected YYYY-MM-DD or RFC 3339)"))
}

mod flexible_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(de)?;
        super::parse_date(&s).map_err(serde::de::Error::custom)
    }
}

mod optional_flexible_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, ser: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => ser.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveDate>, D::Error> {
        let s = Option::<String>::deserialize(de)?;
        match s {
            Some(s) => super::parse_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
