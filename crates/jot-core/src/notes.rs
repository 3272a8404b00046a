use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single user-authored note. `updated_at` serializes as epoch
/// milliseconds, which is the on-disk format for note blobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(draft: NoteDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            body: draft.body,
            image_uri: draft.image_uri,
            updated_at: Utc::now(),
        }
    }
}

/// Input for creating a note; id and timestamp are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
    pub image_uri: Option<String>,
}

/// Partial update. `None` fields are left untouched; `image_uri` is
/// tri-state so an attached image can also be cleared (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_uri: Option<Option<String>>,
}

/// Display orderings for the notes list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    NewestFirst,
    OldestFirst,
    TitleAsc,
    TitleDesc,
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::NewestFirst
    }
}

/// Repository contract for per-user note persistence.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn list(&self, username: &str) -> anyhow::Result<Vec<Note>>;
    async fn add(&self, username: &str, draft: NoteDraft) -> anyhow::Result<Note>;
    async fn update(&self, username: &str, id: Uuid, patch: NotePatch) -> anyhow::Result<Note>;
    async fn delete(&self, username: &str, id: Uuid) -> anyhow::Result<()>;
}

/// Derived view over an in-memory collection: case-insensitive substring
/// filter on title or body (empty search matches everything), then the
/// requested ordering. Recomputed on demand, never persisted.
pub fn search_and_sort(notes: &[Note], search: &str, sort: SortMode) -> Vec<Note> {
    let needle = search.to_lowercase();
    let mut result: Vec<Note> = notes
        .iter()
        .filter(|n| {
            needle.is_empty()
                || n.title.to_lowercase().contains(&needle)
                || n.body.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    match sort {
        SortMode::NewestFirst => result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortMode::OldestFirst => result.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
        SortMode::TitleAsc => result.sort_by(|a, b| a.title.cmp(&b.title)),
        SortMode::TitleDesc => result.sort_by(|a, b| b.title.cmp(&a.title)),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn note(title: &str, body: &str, at_ms: i64) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: body.to_string(),
            image_uri: None,
            updated_at: Utc.timestamp_millis_opt(at_ms).unwrap(),
        }
    }

    #[test]
    fn search_matches_title_or_body_case_insensitively() {
        let notes = vec![
            note("Groceries", "milk, eggs", 1),
            note("Work", "ship the MILK feature", 2),
            note("Travel", "pack bags", 3),
        ];

        let hits = search_and_sort(&notes, "milk", SortMode::NewestFirst);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|n| n.title != "Travel"));
    }

    #[test]
    fn empty_search_matches_all() {
        let notes = vec![note("a", "", 1), note("b", "", 2)];
        assert_eq!(search_and_sort(&notes, "", SortMode::NewestFirst).len(), 2);
    }

    #[test]
    fn sorts_by_each_mode() {
        let notes = vec![
            note("banana", "", 100),
            note("apple", "", 300),
            note("cherry", "", 200),
        ];

        let newest = search_and_sort(&notes, "", SortMode::NewestFirst);
        assert_eq!(newest[0].title, "apple");
        assert_eq!(newest[2].title, "banana");

        let oldest = search_and_sort(&notes, "", SortMode::OldestFirst);
        assert_eq!(oldest[0].title, "banana");
        assert_eq!(oldest[2].title, "apple");

        let az = search_and_sort(&notes, "", SortMode::TitleAsc);
        assert_eq!(az[0].title, "apple");
        assert_eq!(az[2].title, "cherry");

        let za = search_and_sort(&notes, "", SortMode::TitleDesc);
        assert_eq!(za[0].title, "cherry");
        assert_eq!(za[2].title, "apple");
    }

    #[test]
    fn updated_at_serializes_as_epoch_millis() {
        let n = note("t", "b", 1_700_000_000_123);
        let json = serde_json::to_value(&n).expect("serialize");
        assert_eq!(json["updated_at"], 1_700_000_000_123i64);

        let back: Note = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, n);
    }
}
