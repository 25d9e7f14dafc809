use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::photo::Photo;
use crate::model::{timestamp, Id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vignette {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Body of `POST /api/vignettes` and `PUT /api/vignettes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VignetteDraft {
    pub title: String,
    pub content: String,
    pub photo_ids: Vec<Id>,
}
