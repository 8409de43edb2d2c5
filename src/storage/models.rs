use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short link entry: one short code pointing at one original URL
///
/// `short_url` is unique across every entry regardless of `active` or
/// `autogenerated`. For autogenerated entries it is derived from `id` and
/// never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLinkEntry {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub autogenerated: bool,
    pub active: bool,
    pub create_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}
