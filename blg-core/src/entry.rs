//! A single post and the rules for building one from user input.

use crate::render::{TimestampFormat, format_timestamp};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of an [`Entry`], derived from its creation time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl EntryId {
    /// Next id for an entry created at `now`, strictly above `last` when given.
    /// Fails once `last` is the largest representable id.
    pub fn next(now: DateTime<Utc>, last: Option<EntryId>) -> Result<Self> {
        let candidate = now.timestamp_millis();
        match last {
            Some(EntryId(last)) if candidate <= last => last
                .checked_add(1)
                .map(EntryId)
                .ok_or_else(|| anyhow!("no post id left after {last}")),
            _ => Ok(EntryId(candidate)),
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let id = s
            .trim()
            .parse::<i64>()
            .with_context(|| format!("`{s}` is not a valid post id"))?;
        Ok(EntryId(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl Entry {
    /// Builds a new entry. Both timestamps are set to `now`, `tags_raw` is a
    /// comma separated list (see [`parse_tags`]).
    pub fn create(
        id: EntryId,
        title: &str,
        content: &str,
        tags_raw: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.to_string(),
            content: content.to_string(),
            tags: parse_tags(tags_raw),
            created_date: now,
            updated_date: now,
        }
    }

    /// Replaces title, content and tags and refreshes `updated_date`.
    /// `created_date` never moves.
    pub fn edit(&mut self, title: &str, content: &str, tags_raw: &str, now: DateTime<Utc>) {
        self.title = title.to_string();
        self.content = content.to_string();
        self.tags = parse_tags(tags_raw);
        // a clock that went backwards must not break updated >= created
        self.updated_date = now.max(self.created_date);
    }

    /// `updated_date` rendered in the local time zone.
    pub fn formatted_update_timestamp(&self, format: &TimestampFormat) -> String {
        self.formatted_update_timestamp_in(&Local, format)
    }

    pub fn formatted_update_timestamp_in<Tz>(&self, tz: &Tz, format: &TimestampFormat) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        format_timestamp(&self.updated_date.with_timezone(tz), format)
    }
}

/// Splits a comma separated tag list. Tokens are trimmed, empty ones dropped,
/// order and duplicates kept.
///
/// ```
/// # use blg_core::entry::parse_tags;
/// assert_eq!(parse_tags("a, b ,,c"), vec!["a", "b", "c"]);
/// assert!(parse_tags("").is_empty());
/// ```
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
