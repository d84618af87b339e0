//! Core data structures for the sidenotes application.
//!
//! This module contains the `Note` record and the timestamp decoding used
//! when reading persisted collections.
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a note. Stable for the note's lifetime and never renumbered.
pub type NoteId = u64;

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: NoteId,
    /// Note title, may be empty when content is not
    pub title: String,
    /// Plain text body, may be empty when title is not
    pub content: String,
    /// When the note was created. Never changes afterwards.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note with the given id, title and content
    pub fn new(id: NoteId, title: String, content: String, created_at: DateTime<Utc>) -> Self {
        Note {
            id,
            title,
            content,
            created_at,
        }
    }

    /// The title, or `fallback` when the note has none.
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.title.is_empty() {
            fallback
        } else {
            &self.title
        }
    }
}

/// Format the browser version of the widget stored dates in
/// (`toLocaleString("de-DE")`), in local time.
pub const LOCALE_TIMESTAMP_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// Accepts RFC 3339 strings and the local `dd.mm.yyyy, hh:mm:ss` form.
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(&text, LOCALE_TIMESTAMP_FORMAT)
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{text}': {e}")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| serde::de::Error::custom(format!("nonexistent local time '{text}'")))
}
