//! Landing-page aggregation: counts of everything plus the latest activity.

use chrono::{DateTime, Utc};

use crate::model::audio::Recording;
use crate::model::file_entry::FileEntry;
use crate::model::photo::Photo;
use crate::model::vignette::Vignette;
use crate::model::Id;
use crate::store::MediaStore;
use crate::sync_error::Result;

pub const RECENT_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub vignettes: usize,
    pub photos: usize,
    pub audio: usize,
    pub files: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecentItem {
    Vignette(Vignette),
    Audio(Recording),
    File(FileEntry),
}

impl RecentItem {
    pub fn id(&self) -> &Id {
        match self {
            RecentItem::Vignette(v) => &v.id,
            RecentItem::Audio(a) => &a.id,
            RecentItem::File(f) => &f.id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            RecentItem::Vignette(v) => v.created_at,
            RecentItem::Audio(a) => a.created_at,
            RecentItem::File(f) => f.created_at,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            RecentItem::Vignette(v) => &v.title,
            RecentItem::Audio(a) => a.display_title(),
            RecentItem::File(f) => &f.title,
        }
    }

    /// Content for vignettes, description for audio and files.
    pub fn summary(&self) -> Option<&str> {
        match self {
            RecentItem::Vignette(v) => v.content.as_deref(),
            RecentItem::Audio(a) => a.description.as_deref(),
            RecentItem::File(f) => f.description.as_deref(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RecentItem::Vignette(_) => "vignette",
            RecentItem::Audio(_) => "audio",
            RecentItem::File(_) => "file",
        }
    }
}

/// The newest items across vignettes, audio and files, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentActivity {
    items: Vec<RecentItem>,
}

impl RecentActivity {
    /// Merges the three lists, orders by `created_at` descending and keeps the
    /// first `limit`. Equal timestamps keep their fetch order.
    pub fn merge(vignettes: Vec<Vignette>, audio: Vec<Recording>, files: Vec<FileEntry>, limit: usize) -> Self {
        let mut items: Vec<RecentItem> = vignettes
            .into_iter()
            .map(RecentItem::Vignette)
            .chain(audio.into_iter().map(RecentItem::Audio))
            .chain(files.into_iter().map(RecentItem::File))
            .collect();

        items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        items.truncate(limit);

        RecentActivity { items }
    }

    pub fn items(&self) -> &[RecentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn vignettes(&self) -> impl Iterator<Item = &Vignette> {
        self.items.iter().filter_map(|item| match item {
            RecentItem::Vignette(v) => Some(v),
            _ => None,
        })
    }

    pub fn audio(&self) -> impl Iterator<Item = &Recording> {
        self.items.iter().filter_map(|item| match item {
            RecentItem::Audio(a) => Some(a),
            _ => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.items.iter().filter_map(|item| match item {
            RecentItem::File(f) => Some(f),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent: RecentActivity,
}

impl Dashboard {
    /// Fetches the four lists concurrently. Any failure fails the whole load.
    pub async fn load<S: MediaStore + ?Sized>(store: &S) -> Result<Dashboard> {
        let (vignettes, photos, audio, files) = tokio::try_join!(
            store.list_vignettes(),
            store.list_photos(),
            store.list_recordings(),
            store.list_files(),
        )?;
        tracing::debug!(
            vignettes = vignettes.len(),
            photos = photos.len(),
            audio = audio.len(),
            files = files.len(),
            "dashboard lists fetched"
        );

        Ok(Self::assemble(vignettes, photos, audio, files))
    }

    pub fn assemble(vignettes: Vec<Vignette>, photos: Vec<Photo>, audio: Vec<Recording>, files: Vec<FileEntry>) -> Dashboard {
        let stats = DashboardStats {
            vignettes: vignettes.len(),
            photos: photos.len(),
            audio: audio.len(),
            files: files.len(),
        };

        Dashboard { stats, recent: RecentActivity::merge(vignettes, audio, files, RECENT_LIMIT) }
    }
}
