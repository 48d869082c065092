use serde::{Deserialize, Serialize};

/// A free-form note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Identifier assigned by storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Short heading.
    pub title: String,
    /// Note text.
    pub body: String,
}
