//! Free-text study notes with search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique note identifier.
pub type NoteId = Uuid;

/// A single study note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier.
    pub id: NoteId,
    /// Note body.
    pub content: String,
    /// Creation or last-edit time.
    pub timestamp: DateTime<Utc>,
    /// Tags.
    pub tags: Vec<String>,
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Note collection for one module session.
///
/// Persisted as a plain string list on the progress snapshot; identifiers,
/// timestamps and tags live only as long as the session.
#[derive(Debug, Clone, Default)]
pub struct Notebook {
    notes: Vec<Note>,
}

impl Notebook {
    /// Create an empty notebook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a notebook from persisted note bodies.
    pub fn hydrate(contents: &[String]) -> Self {
        let now = Utc::now();
        Self {
            notes: contents
                .iter()
                .map(|content| Note {
                    id: Uuid::new_v4(),
                    content: content.clone(),
                    timestamp: now,
                    tags: Vec::new(),
                })
                .collect(),
        }
    }

    /// Add a note. Blank content is rejected.
    pub fn add(&mut self, content: impl Into<String>, tags: Vec<String>) -> Option<NoteId> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return None;
        }
        let id = Uuid::new_v4();
        self.notes.push(Note {
            id,
            content,
            timestamp: Utc::now(),
            tags,
        });
        Some(id)
    }

    /// Replace a note's content in place, refreshing its timestamp.
    /// Blank content is rejected.
    pub fn edit(&mut self, id: NoteId, content: impl Into<String>) -> bool {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return false;
        }
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        note.content = content;
        note.timestamp = Utc::now();
        true
    }

    /// Delete a note. Returns whether it existed.
    pub fn remove(&mut self, id: NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    /// Look a note up by id.
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// All notes, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the notebook is empty.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Case-insensitive substring search over content and tags.
    /// An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Note> {
        let term = term.to_lowercase();
        self.notes
            .iter()
            .filter(|n| {
                n.content.to_lowercase().contains(&term)
                    || n.tags.iter().any(|t| t.to_lowercase().contains(&term))
            })
            .collect()
    }

    /// Flatten to the persisted string list.
    pub fn contents(&self) -> Vec<String> {
        self.notes.iter().map(|n| n.content.clone()).collect()
    }

    /// Render all notes as a plain-text document.
    pub fn export_text(&self) -> String {
        self.notes
            .iter()
            .map(|n| {
                format!(
                    "{}\n{}\nTags: {}\n",
                    n.timestamp.format("%Y-%m-%d %H:%M"),
                    n.content,
                    n.tags.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n---\n\n")
    }
}
