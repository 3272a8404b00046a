//! Note repository backed by a `KvStore`: one blob per user, holding that
//! user's whole note collection in insertion order.
//!
//! Every mutation re-serializes the full collection. Collections are
//! hand-authored and small, so the round trip is not a concern.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use jot_core::{
    notes::{Note, NoteDraft, NotePatch, NoteRepository},
    storage::{KvError, KvStore},
};
use tracing::instrument;
use uuid::Uuid;

fn notes_key(username: &str) -> String {
    format!("@notes_{username}")
}

/// `NoteRepository` backed by any `KvStore`.
pub struct KvNoteRepo<S: KvStore> {
    store: Arc<S>,
}

impl<S: KvStore> KvNoteRepo<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    async fn load(&self, username: &str) -> Result<Vec<Note>> {
        match self.store.get(&notes_key(username)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(KvError::NotFound { .. }) => Ok(Vec::new()),
            Err(err) => Err(anyhow::anyhow!(err.to_string())),
        }
    }

    async fn save(&self, username: &str, notes: &[Note]) -> Result<()> {
        let bytes = serde_json::to_vec(notes)?;
        self.store
            .put(&notes_key(username), &bytes)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))
    }
}

#[async_trait]
impl<S: KvStore> NoteRepository for KvNoteRepo<S> {
    #[instrument(skip(self))]
    async fn list(&self, username: &str) -> Result<Vec<Note>> {
        self.load(username).await
    }

    #[instrument(skip(self, draft))]
    async fn add(&self, username: &str, draft: NoteDraft) -> Result<Note> {
        let mut notes = self.load(username).await?;
        let note = Note::new(draft);
        notes.push(note.clone());
        self.save(username, &notes).await?;
        Ok(note)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, username: &str, id: Uuid, patch: NotePatch) -> Result<Note> {
        let mut notes = self.load(username).await?;
        let pos = notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| anyhow::anyhow!("note not found: {id}"))?;

        let note = &mut notes[pos];
        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(body) = patch.body {
            note.body = body;
        }
        if let Some(image_uri) = patch.image_uri {
            note.image_uri = image_uri;
        }
        note.updated_at = chrono::Utc::now();
        let updated = note.clone();

        self.save(username, &notes).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, username: &str, id: Uuid) -> Result<()> {
        let mut notes = self.load(username).await?;
        // Removing an unknown id is a no-op on purpose.
        notes.retain(|n| n.id != id);
        self.save(username, &notes).await
    }
}
