use std::fmt;
use std::fmt::Formatter;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{timestamp, Id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Id,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Photo {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() { "Photo" } else { &self.title }
    }
}

impl fmt::Display for Photo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(id={}, title={})", self.id, self.display_title())
    }
}

/// A local image queued for upload. The file name doubles as the title.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    pub(crate) content: Bytes,
    pub(crate) content_type: &'static str,
}

impl PhotoUpload {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, content: impl Into<Bytes>, content_type: &'static str) -> Self {
        PhotoUpload {
            name: name.into(),
            path: path.into(),
            content: content.into(),
            content_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl fmt::Display for PhotoUpload {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(name={}, len={})", self.name, self.content.len())
    }
}
