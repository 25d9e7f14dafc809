use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{timestamp, Id};

/// Shared document metadata from `GET /api/files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: Id,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}
