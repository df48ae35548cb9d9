use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A note confirmed by the remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WireNote")]
pub struct NoteEntry {
    pub id: String,
    pub title: String,
    pub description: String,
}

// The hosted resource keys records by `_id`; plain `id` is accepted too.
// When both are present `_id` wins.
#[derive(Deserialize)]
struct WireNote {
    #[serde(rename = "_id")]
    underscore_id: Option<String>,
    id: Option<String>,
    title: String,
    description: String,
}

impl TryFrom<WireNote> for NoteEntry {
    type Error = String;

    fn try_from(wire: WireNote) -> Result<Self, Self::Error> {
        let id = wire
            .underscore_id
            .or(wire.id)
            .ok_or_else(|| String::from("record has no `_id` or `id`"))?;
        Ok(NoteEntry::new(id, wire.title, wire.description))
    }
}

impl NoteEntry {
    pub fn new(id: String, title: String, description: String) -> Self {
        NoteEntry {
            id,
            title,
            description,
        }
    }
}

/// A note that has passed local validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    title: String,
    description: String,
}

impl NoteDraft {
    pub fn new(title: &str, description: &str) -> Result<Self, ValidationError> {
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        Ok(NoteDraft {
            title: title.to_owned(),
            description: description.to_owned(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
