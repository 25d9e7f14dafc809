use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{timestamp, Id};

/// Metadata of a stored recording. The payload itself is fetched separately
/// from `GET /api/audio/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: Id,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Recording {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() { "Untitled Recording" } else { &self.title }
    }
}

#[derive(Debug, Clone)]
pub struct NewRecording {
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub content: Bytes,
}

#[derive(Debug, Clone)]
pub struct RecordingUpdate {
    pub title: String,
    pub description: Option<String>,
}
