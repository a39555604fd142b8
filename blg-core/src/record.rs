//! Serialized shape of the collection snapshot.
//!
//! A snapshot is a JSON array of records:
//!
//! ```json
//! [{"id":1723716000000,"title":"Hello","content":"Body","tags":["a","b"],
//!   "createdDate":"2025-08-15T10:00:00.000Z","updatedDate":"2025-08-15T10:00:00.000Z"}]
//! ```
//!
//! Older snapshots stored `tags` as one comma joined string, or left it out.

use crate::entry::{Entry, EntryId, parse_tags};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WrittenEntry<'a> {
    id: EntryId,
    title: &'a str,
    content: &'a str,
    tags: &'a [String],
    created_date: String,
    updated_date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    id: EntryId,
    title: String,
    content: String,
    #[serde(default)]
    tags: Option<StoredTags>,
    created_date: StoredTimestamp,
    #[serde(default)]
    updated_date: Option<StoredTimestamp>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTags {
    List(Vec<String>),
    Joined(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTimestamp {
    Text(DateTime<Utc>),
    Millis(i64),
}

impl StoredTimestamp {
    fn into_datetime(self) -> Result<DateTime<Utc>> {
        match self {
            StoredTimestamp::Text(dt) => Ok(dt),
            StoredTimestamp::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| anyhow!("timestamp {ms} is out of range")),
        }
    }
}

impl StoredEntry {
    fn into_entry(self) -> Result<Entry> {
        // both historical shapes go through the same split/trim/drop-empty rule
        let tags = match self.tags {
            Some(StoredTags::List(tags)) => parse_tags(&tags.join(",")),
            Some(StoredTags::Joined(raw)) => parse_tags(&raw),
            None => Vec::new(),
        };
        let created_date = self
            .created_date
            .into_datetime()
            .with_context(|| format!("createdDate of post {}", self.id))?;
        let updated_date = match self.updated_date {
            Some(ts) => ts
                .into_datetime()
                .with_context(|| format!("updatedDate of post {}", self.id))?,
            None => created_date,
        }
        // updated >= created holds for every loaded entry
        .max(created_date);
        Ok(Entry {
            id: self.id,
            title: self.title,
            content: self.content,
            tags,
            created_date,
            updated_date,
        })
    }
}

fn format_stored_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serializes the whole collection. Tags are always written as an array.
pub fn encode_snapshot(entries: &[Entry]) -> Result<String> {
    let written: Vec<WrittenEntry> = entries
        .iter()
        .map(|e| WrittenEntry {
            id: e.id,
            title: &e.title,
            content: &e.content,
            tags: &e.tags,
            created_date: format_stored_timestamp(&e.created_date),
            updated_date: format_stored_timestamp(&e.updated_date),
        })
        .collect();
    serde_json::to_string(&written).context("serializing posts")
}

/// Parses a snapshot written by [`encode_snapshot`] or by an older version.
/// Any malformed record fails the whole snapshot.
pub fn decode_snapshot(raw: &str) -> Result<Vec<Entry>> {
    let stored: Vec<StoredEntry> = serde_json::from_str(raw).context("parsing stored posts")?;
    stored.into_iter().map(StoredEntry::into_entry).collect()
}
