//! The seam between the view managers and the family media API.

use async_trait::async_trait;
use bytes::Bytes;

use crate::model::audio::{NewRecording, Recording, RecordingUpdate};
use crate::model::file_entry::FileEntry;
use crate::model::photo::{Photo, PhotoUpload};
use crate::model::photo_album::{Album, AlbumDetail, NewAlbum};
use crate::model::vignette::{Vignette, VignetteDraft};
use crate::model::Id;
use crate::sync_error::Result;

/// One method per `/api/*` endpoint. Implementations do not cache; every
/// call reflects the server's current state.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn list_photos(&self) -> Result<Vec<Photo>>;
    async fn upload_photo(&self, upload: &PhotoUpload) -> Result<Photo>;
    async fn delete_photo(&self, id: &Id) -> Result<()>;

    async fn list_albums(&self) -> Result<Vec<Album>>;
    async fn create_album(&self, album: &NewAlbum) -> Result<Album>;
    async fn get_album(&self, id: &Id) -> Result<AlbumDetail>;
    async fn delete_album(&self, id: &Id) -> Result<()>;
    async fn add_photo_to_album(&self, album_id: &Id, photo_id: &Id) -> Result<()>;
    async fn remove_photo_from_album(&self, album_id: &Id, photo_id: &Id) -> Result<()>;

    async fn list_recordings(&self) -> Result<Vec<Recording>>;
    async fn download_recording(&self, id: &Id) -> Result<Bytes>;
    async fn upload_recording(&self, recording: &NewRecording) -> Result<Recording>;
    async fn update_recording(&self, id: &Id, update: &RecordingUpdate) -> Result<Recording>;
    async fn delete_recording(&self, id: &Id) -> Result<()>;

    async fn list_vignettes(&self) -> Result<Vec<Vignette>>;
    async fn get_vignette(&self, id: &Id) -> Result<Vignette>;
    async fn create_vignette(&self, draft: &VignetteDraft) -> Result<Vignette>;
    async fn update_vignette(&self, id: &Id, draft: &VignetteDraft) -> Result<Vignette>;
    async fn delete_vignette(&self, id: &Id) -> Result<()>;

    async fn list_files(&self) -> Result<Vec<FileEntry>>;
}
