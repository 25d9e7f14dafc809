//! In-process [`MediaStore`] with the same observable behaviour as the API:
//! set-semantics album membership, server-derived `photo_count`, album
//! deletion that leaves photos alone, and `{detail}`-style rejections.
//!
//! Used by the integration tests and handy for exercising view managers
//! without a running server.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};

use crate::model::audio::{NewRecording, Recording, RecordingUpdate};
use crate::model::file_entry::FileEntry;
use crate::model::photo::{Photo, PhotoUpload};
use crate::model::photo_album::{Album, AlbumDetail, NewAlbum};
use crate::model::vignette::{Vignette, VignetteDraft};
use crate::model::Id;
use crate::store::MediaStore;
use crate::sync_error::{Result, SyncError};

struct AlbumRecord {
    id: Id,
    name: String,
    description: Option<String>,
    members: Vec<Id>,
}

struct VignetteRecord {
    id: Id,
    title: String,
    content: Option<String>,
    created_at: DateTime<Utc>,
    photo_ids: Vec<Id>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    photos: Vec<(Photo, Bytes)>,
    albums: Vec<AlbumRecord>,
    recordings: Vec<(Recording, Bytes)>,
    vignettes: Vec<VignetteRecord>,
    files: Vec<FileEntry>,
    offline: bool,
    listing_offline: bool,
    rejected_titles: HashSet<String>,
    requests: usize,
}

impl State {
    fn allocate(&mut self) -> (Id, DateTime<Utc>) {
        self.next_id += 1;
        // logical clock: every allocation is one minute after the previous one
        let created_at = DateTime::<Utc>::default() + Duration::minutes(self.next_id as i64);
        (Id::from(self.next_id), created_at)
    }

    fn album(&self, id: &Id) -> Result<&AlbumRecord> {
        self.albums.iter().find(|a| &a.id == id).ok_or_else(|| not_found("Album"))
    }

    fn album_mut(&mut self, id: &Id) -> Result<&mut AlbumRecord> {
        self.albums.iter_mut().find(|a| &a.id == id).ok_or_else(|| not_found("Album"))
    }

    fn photo(&self, id: &Id) -> Result<&Photo> {
        self.photos.iter().map(|(p, _)| p).find(|p| &p.id == id).ok_or_else(|| not_found("Photo"))
    }

    fn album_view(&self, record: &AlbumRecord) -> Album {
        Album {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            photo_count: record.members.len() as u32,
        }
    }

    fn vignette_view(&self, record: &VignetteRecord) -> Vignette {
        let photos = record
            .photo_ids
            .iter()
            .filter_map(|id| self.photo(id).ok().cloned())
            .collect();
        Vignette {
            id: record.id.clone(),
            title: record.title.clone(),
            content: record.content.clone(),
            created_at: record.created_at,
            photos,
        }
    }

    fn validate_draft(&self, draft: &VignetteDraft) -> Result<()> {
        if draft.title.trim().is_empty() {
            return Err(rejected(422, "Title is required"));
        }
        for id in &draft.photo_ids {
            self.photo(id)?;
        }
        Ok(())
    }
}

fn not_found(entity: &str) -> SyncError {
    SyncError::Api { status: 404, detail: format!("{} not found", entity) }
}

fn rejected(status: u16, detail: &str) -> SyncError {
    SyncError::Api { status, detail: detail.to_string() }
}

fn blank_to_none(value: &str) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value.to_string()) }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls received so far, including failed ones.
    pub fn requests(&self) -> usize {
        self.lock().requests
    }

    /// While offline every call fails with [`SyncError::Network`].
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// While set, only the `list_*` calls fail with [`SyncError::Network`].
    pub fn set_listing_offline(&self, offline: bool) {
        self.lock().listing_offline = offline;
    }

    /// Uploads with this title are rejected with a 415.
    pub fn reject_title(&self, title: &str) {
        self.lock().rejected_titles.insert(title.to_string());
    }

    pub fn insert_file(&self, title: &str, created_at: DateTime<Utc>) -> FileEntry {
        let mut state = self.lock();
        let (id, _) = state.allocate();
        let entry = FileEntry { id, title: title.to_string(), description: None, created_at };
        state.files.push(entry.clone());
        entry
    }

    pub fn insert_recording(&self, title: &str, created_at: DateTime<Utc>) -> Recording {
        let mut state = self.lock();
        let (id, _) = state.allocate();
        let recording = Recording { id, title: title.to_string(), description: None, created_at };
        state.recordings.push((recording.clone(), Bytes::new()));
        recording
    }

    pub fn insert_vignette(&self, title: &str, created_at: DateTime<Utc>) -> Vignette {
        let mut state = self.lock();
        let (id, _) = state.allocate();
        let record = VignetteRecord {
            id,
            title: title.to_string(),
            content: None,
            created_at,
            photo_ids: vec![],
        };
        let view = state.vignette_view(&record);
        state.vignettes.push(record);
        view
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Counts the call and fails it when offline.
    fn begin(&self) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.requests += 1;
        if state.offline {
            return Err(SyncError::Network("connection refused".to_string()));
        }
        Ok(state)
    }

    fn begin_listing(&self) -> Result<MutexGuard<'_, State>> {
        let state = self.begin()?;
        if state.listing_offline {
            return Err(SyncError::Network("connection reset".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn list_photos(&self) -> Result<Vec<Photo>> {
        let state = self.begin_listing()?;
        Ok(state.photos.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn upload_photo(&self, upload: &PhotoUpload) -> Result<Photo> {
        let mut state = self.begin()?;
        if state.rejected_titles.contains(upload.name()) {
            return Err(rejected(415, "Unsupported image format"));
        }
        let (id, created_at) = state.allocate();
        let photo = Photo { id, title: upload.name().to_string(), description: None, created_at };
        state.photos.push((photo.clone(), upload.content.clone()));
        Ok(photo)
    }

    async fn delete_photo(&self, id: &Id) -> Result<()> {
        let mut state = self.begin()?;
        state.photo(id)?;
        state.photos.retain(|(p, _)| &p.id != id);
        for album in state.albums.iter_mut() {
            album.members.retain(|m| m != id);
        }
        for vignette in state.vignettes.iter_mut() {
            vignette.photo_ids.retain(|m| m != id);
        }
        Ok(())
    }

    async fn list_albums(&self) -> Result<Vec<Album>> {
        let state = self.begin_listing()?;
        Ok(state.albums.iter().map(|a| state.album_view(a)).collect())
    }

    async fn create_album(&self, album: &NewAlbum) -> Result<Album> {
        let mut state = self.begin()?;
        if album.name.trim().is_empty() {
            return Err(rejected(422, "Album name is required"));
        }
        let (id, _) = state.allocate();
        let record = AlbumRecord {
            id,
            name: album.name.clone(),
            description: blank_to_none(&album.description),
            members: vec![],
        };
        let view = state.album_view(&record);
        state.albums.push(record);
        Ok(view)
    }

    async fn get_album(&self, id: &Id) -> Result<AlbumDetail> {
        let state = self.begin()?;
        let record = state.album(id)?;
        let photos = record
            .members
            .iter()
            .filter_map(|m| state.photo(m).ok().cloned())
            .collect();
        Ok(AlbumDetail { album: state.album_view(record), photos })
    }

    async fn delete_album(&self, id: &Id) -> Result<()> {
        let mut state = self.begin()?;
        state.album(id)?;
        state.albums.retain(|a| &a.id != id);
        Ok(())
    }

    async fn add_photo_to_album(&self, album_id: &Id, photo_id: &Id) -> Result<()> {
        let mut state = self.begin()?;
        state.photo(photo_id)?;
        let album = state.album_mut(album_id)?;
        if !album.members.contains(photo_id) {
            album.members.push(photo_id.clone());
        }
        Ok(())
    }

    async fn remove_photo_from_album(&self, album_id: &Id, photo_id: &Id) -> Result<()> {
        let mut state = self.begin()?;
        let album = state.album_mut(album_id)?;
        album.members.retain(|m| m != photo_id);
        Ok(())
    }

    async fn list_recordings(&self) -> Result<Vec<Recording>> {
        let state = self.begin_listing()?;
        Ok(state.recordings.iter().map(|(r, _)| r.clone()).collect())
    }

    async fn download_recording(&self, id: &Id) -> Result<Bytes> {
        let state = self.begin()?;
        state
            .recordings
            .iter()
            .find(|(r, _)| &r.id == id)
            .map(|(_, payload)| payload.clone())
            .ok_or_else(|| not_found("Recording"))
    }

    async fn upload_recording(&self, recording: &NewRecording) -> Result<Recording> {
        let mut state = self.begin()?;
        if recording.content.is_empty() {
            return Err(rejected(400, "Empty audio file"));
        }
        if state.rejected_titles.contains(&recording.title) {
            return Err(rejected(415, "Unsupported audio format"));
        }
        let (id, created_at) = state.allocate();
        let stored = Recording {
            id,
            title: recording.title.clone(),
            description: recording.description.clone(),
            created_at,
        };
        state.recordings.push((stored.clone(), recording.content.clone()));
        Ok(stored)
    }

    async fn update_recording(&self, id: &Id, update: &RecordingUpdate) -> Result<Recording> {
        let mut state = self.begin()?;
        let (recording, _) = state
            .recordings
            .iter_mut()
            .find(|(r, _)| &r.id == id)
            .ok_or_else(|| not_found("Recording"))?;
        recording.title = update.title.clone();
        recording.description = update.description.clone();
        Ok(recording.clone())
    }

    async fn delete_recording(&self, id: &Id) -> Result<()> {
        let mut state = self.begin()?;
        let before = state.recordings.len();
        state.recordings.retain(|(r, _)| &r.id != id);
        if state.recordings.len() == before {
            return Err(not_found("Recording"));
        }
        Ok(())
    }

    async fn list_vignettes(&self) -> Result<Vec<Vignette>> {
        let state = self.begin_listing()?;
        Ok(state.vignettes.iter().map(|v| state.vignette_view(v)).collect())
    }

    async fn get_vignette(&self, id: &Id) -> Result<Vignette> {
        let state = self.begin()?;
        state
            .vignettes
            .iter()
            .find(|v| &v.id == id)
            .map(|v| state.vignette_view(v))
            .ok_or_else(|| not_found("Vignette"))
    }

    async fn create_vignette(&self, draft: &VignetteDraft) -> Result<Vignette> {
        let mut state = self.begin()?;
        state.validate_draft(draft)?;
        let (id, created_at) = state.allocate();
        let record = VignetteRecord {
            id,
            title: draft.title.clone(),
            content: blank_to_none(&draft.content),
            created_at,
            photo_ids: draft.photo_ids.clone(),
        };
        let view = state.vignette_view(&record);
        state.vignettes.push(record);
        Ok(view)
    }

    async fn update_vignette(&self, id: &Id, draft: &VignetteDraft) -> Result<Vignette> {
        let mut state = self.begin()?;
        state.validate_draft(draft)?;
        let record = state
            .vignettes
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| not_found("Vignette"))?;
        record.title = draft.title.clone();
        record.content = blank_to_none(&draft.content);
        record.photo_ids = draft.photo_ids.clone();

        let record = state.vignettes.iter().find(|v| &v.id == id).ok_or_else(|| not_found("Vignette"))?;
        Ok(state.vignette_view(record))
    }

    async fn delete_vignette(&self, id: &Id) -> Result<()> {
        let mut state = self.begin()?;
        let before = state.vignettes.len();
        state.vignettes.retain(|v| &v.id != id);
        if state.vignettes.len() == before {
            return Err(not_found("Vignette"));
        }
        Ok(())
    }

    async fn list_files(&self) -> Result<Vec<FileEntry>> {
        let state = self.begin_listing()?;
        Ok(state.files.clone())
    }
}
