//! Photo gallery and album organisation.
//!
//! The server owns photos, albums and membership. [`GalleryView`] keeps a
//! read-only copy of the last fetch plus explicit view state, and after
//! every mutation it re-fetches instead of patching its copy, so counts and
//! membership always show what the server acknowledged.

use crate::model::photo::{Photo, PhotoUpload};
use crate::model::photo_album::{Album, AlbumDetail, NewAlbum};
use crate::model::Id;
use crate::store::MediaStore;
use crate::sync_error::{Result, SyncError};
use crate::utils::Confirm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoLayout {
    Grid,
    Chronological,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlbumPane {
    Index,
    Open(AlbumDetail),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryTab {
    Photos { layout: PhotoLayout },
    Albums(AlbumPane),
}

/// Result of an action gated behind a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Decision {
    Applied,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: Vec<Photo>,
    pub failed: Vec<(String, SyncError)>,
}

pub struct GalleryView<'s, S: MediaStore + ?Sized> {
    store: &'s S,
    photos: Vec<Photo>,
    albums: Vec<Album>,
    tab: GalleryTab,
    selected_photo: Option<Photo>,
}

impl<'s, S: MediaStore + ?Sized> GalleryView<'s, S> {
    pub fn new(store: &'s S) -> Self {
        GalleryView {
            store,
            photos: vec![],
            albums: vec![],
            tab: GalleryTab::Photos { layout: PhotoLayout::Grid },
            selected_photo: None,
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn tab(&self) -> &GalleryTab {
        &self.tab
    }

    pub fn selected_photo(&self) -> Option<&Photo> {
        self.selected_photo.as_ref()
    }

    pub fn open_album(&self) -> Option<&AlbumDetail> {
        match &self.tab {
            GalleryTab::Albums(AlbumPane::Open(detail)) => Some(detail),
            _ => None,
        }
    }

    /// Switching to photos closes whatever album was open.
    pub fn show_photos(&mut self, layout: PhotoLayout) {
        self.tab = GalleryTab::Photos { layout };
    }

    pub fn show_albums(&mut self) {
        if !matches!(self.tab, GalleryTab::Albums(_)) {
            self.tab = GalleryTab::Albums(AlbumPane::Index);
        }
    }

    pub fn close_album(&mut self) {
        self.tab = GalleryTab::Albums(AlbumPane::Index);
    }

    pub fn select_photo(&mut self, photo_id: &Id) -> Option<&Photo> {
        let found = self
            .photos
            .iter()
            .chain(self.open_album().into_iter().flat_map(|a| a.photos.iter()))
            .find(|p| &p.id == photo_id)
            .cloned();
        self.selected_photo = found;
        self.selected_photo.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected_photo = None;
    }

    /// Newest first.
    pub fn sorted_photos(&self) -> Vec<&Photo> {
        let mut sorted: Vec<&Photo> = self.photos.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }

    /// Re-fetches the photo list. On failure the previous list is kept.
    pub async fn list_photos(&mut self) -> Result<&[Photo]> {
        match self.store.list_photos().await {
            Ok(photos) => {
                tracing::debug!(count = photos.len(), "photos fetched");
                self.photos = photos;
                Ok(&self.photos)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch photos");
                Err(err)
            }
        }
    }

    /// Re-fetches the album list. On failure the previous list is kept.
    pub async fn list_albums(&mut self) -> Result<&[Album]> {
        match self.store.list_albums().await {
            Ok(albums) => {
                tracing::debug!(count = albums.len(), "albums fetched");
                self.albums = albums;
                Ok(&self.albums)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch albums");
                Err(err)
            }
        }
    }

    pub async fn create_album(&mut self, name: &str, description: &str) -> Result<Album> {
        if name.trim().is_empty() {
            return Err(SyncError::validation("Please enter an album name"));
        }

        let album = self
            .store
            .create_album(&NewAlbum { name: name.to_string(), description: description.to_string() })
            .await?;
        tracing::info!(id = %album.id, name = %album.name, "album created");

        // the album exists now; a failed refresh only leaves the list stale
        if let Err(err) = self.list_albums().await {
            tracing::warn!(id = %album.id, error = %err, "album list not refreshed after create");
        }
        Ok(album)
    }

    /// Fetches the album with its photos and opens it. Membership is never
    /// loaded with the album list, only here.
    pub async fn view_album(&mut self, album_id: &Id) -> Result<AlbumDetail> {
        let detail = self.store.get_album(album_id).await.map_err(|err| {
            tracing::warn!(album = %album_id, error = %err, "failed to load album");
            err
        })?;
        self.tab = GalleryTab::Albums(AlbumPane::Open(detail.clone()));
        Ok(detail)
    }

    pub async fn add_photo_to_album(&mut self, photo_id: &Id, album_id: &Id) -> Result<()> {
        self.store.add_photo_to_album(album_id, photo_id).await?;
        tracing::info!(photo = %photo_id, album = %album_id, "photo added to album");

        if self.open_album().map(|a| a.id() == album_id).unwrap_or(false) {
            self.view_album(album_id).await?;
        }
        self.list_albums().await?;
        Ok(())
    }

    pub async fn remove_photo_from_album(
        &mut self,
        photo_id: &Id,
        album_id: &Id,
        confirm: &dyn Confirm,
    ) -> Result<Decision> {
        if !confirm.confirm("Remove this photo from the album?") {
            return Ok(Decision::Cancelled);
        }

        self.store.remove_photo_from_album(album_id, photo_id).await?;
        tracing::info!(photo = %photo_id, album = %album_id, "photo removed from album");

        self.view_album(album_id).await?;
        self.list_albums().await?;
        Ok(Decision::Applied)
    }

    pub async fn delete_photo(&mut self, photo_id: &Id, confirm: &dyn Confirm) -> Result<Decision> {
        if !confirm.confirm("Are you sure you want to delete this photo? This action cannot be undone.") {
            return Ok(Decision::Cancelled);
        }

        self.store.delete_photo(photo_id).await?;
        tracing::info!(photo = %photo_id, "photo deleted");

        self.list_photos().await?;
        self.selected_photo = None;
        Ok(Decision::Applied)
    }

    /// Deletes the album only; its photos stay in the library.
    pub async fn delete_album(&mut self, album_id: &Id, confirm: &dyn Confirm) -> Result<Decision> {
        if !confirm.confirm("Are you sure you want to delete this album? This will not delete the photos.") {
            return Ok(Decision::Cancelled);
        }

        self.store.delete_album(album_id).await?;
        tracing::info!(album = %album_id, "album deleted");

        self.list_albums().await?;
        if self.open_album().map(|a| a.id() == album_id).unwrap_or(false) {
            self.close_album();
        }
        Ok(Decision::Applied)
    }

    /// Uploads each file with its own request. A failed file is logged and
    /// reported but does not stop the rest. `progress` gets `(done, total)`.
    pub async fn upload_photos<F>(&mut self, uploads: &[PhotoUpload], mut progress: F) -> Result<UploadReport>
    where
        F: FnMut(usize, usize),
    {
        let mut report = UploadReport::default();
        for (i, upload) in uploads.iter().enumerate() {
            match self.store.upload_photo(upload).await {
                Ok(photo) => report.uploaded.push(photo),
                Err(err) => {
                    tracing::warn!(path = %upload.path().display(), error = %err, "failed to upload photo");
                    report.failed.push((upload.name().to_string(), err));
                }
            }
            progress(i + 1, uploads.len());
        }

        self.list_photos().await?;
        Ok(report)
    }
}
