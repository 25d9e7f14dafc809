//! HTTP implementation of [`MediaStore`] using [`reqwest`].

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::model::audio::{NewRecording, Recording, RecordingUpdate};
use crate::model::file_entry::FileEntry;
use crate::model::photo::{Photo, PhotoUpload};
use crate::model::photo_album::{Album, AlbumDetail, NewAlbum};
use crate::model::vignette::{Vignette, VignetteDraft};
use crate::model::{ErrorBody, Id};
use crate::store::MediaStore;
use crate::sync_error::{Result, SyncError};

#[derive(Clone)]
pub struct StoreClient {
    inner: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl StoreClient {
    pub fn new(config: &Config) -> Result<StoreClient> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|err| SyncError::Config(format!("failed to build HTTP client: {}", err)))?;

        Ok(StoreClient {
            inner,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.inner.request(method, self.url(path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let response = req.send().await?;
        ensure_success(response).await
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = self.send(req).await?;
        Ok(response.json::<T>().await?)
    }

    async fn execute(&self, req: RequestBuilder) -> Result<()> {
        self.send(req).await?;
        Ok(())
    }
}

/// Turns non-2xx responses into [`SyncError::Api`], reading `detail` from the
/// body when the server sent one.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(status.canonical_reason(), &body);
    tracing::debug!(status = status.as_u16(), %detail, "request rejected");
    Err(SyncError::Api { status: status.as_u16(), detail })
}

fn error_detail(reason: Option<&str>, body: &str) -> String {
    if let Ok(parsed) = json::from_str::<ErrorBody>(body) {
        return parsed.detail;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("request failed").to_string()
    } else {
        trimmed.to_string()
    }
}

fn file_part(file_name: &str, content: &Bytes, content_type: &str) -> Result<Part> {
    Ok(Part::bytes(content.to_vec())
        .file_name(file_name.to_string())
        .mime_str(content_type)?)
}

#[async_trait]
impl MediaStore for StoreClient {
    async fn list_photos(&self) -> Result<Vec<Photo>> {
        self.fetch(self.request(Method::GET, "photos")).await
    }

    async fn upload_photo(&self, upload: &PhotoUpload) -> Result<Photo> {
        let form = Form::new()
            .part("file", file_part(&upload.name, &upload.content, upload.content_type)?)
            .text("title", upload.name.clone());
        self.fetch(self.request(Method::POST, "photos").multipart(form)).await
    }

    async fn delete_photo(&self, id: &Id) -> Result<()> {
        self.execute(self.request(Method::DELETE, &format!("photos/{}", id))).await
    }

    async fn list_albums(&self) -> Result<Vec<Album>> {
        self.fetch(self.request(Method::GET, "albums")).await
    }

    async fn create_album(&self, album: &NewAlbum) -> Result<Album> {
        self.fetch(self.request(Method::POST, "albums").json(album)).await
    }

    async fn get_album(&self, id: &Id) -> Result<AlbumDetail> {
        self.fetch(self.request(Method::GET, &format!("albums/{}", id))).await
    }

    async fn delete_album(&self, id: &Id) -> Result<()> {
        self.execute(self.request(Method::DELETE, &format!("albums/{}", id))).await
    }

    async fn add_photo_to_album(&self, album_id: &Id, photo_id: &Id) -> Result<()> {
        let path = format!("albums/{}/photos/{}", album_id, photo_id);
        self.execute(self.request(Method::POST, &path)).await
    }

    async fn remove_photo_from_album(&self, album_id: &Id, photo_id: &Id) -> Result<()> {
        let path = format!("albums/{}/photos/{}", album_id, photo_id);
        self.execute(self.request(Method::DELETE, &path)).await
    }

    async fn list_recordings(&self) -> Result<Vec<Recording>> {
        self.fetch(self.request(Method::GET, "audio")).await
    }

    async fn download_recording(&self, id: &Id) -> Result<Bytes> {
        let response = self.send(self.request(Method::GET, &format!("audio/{}", id))).await?;
        Ok(response.bytes().await?)
    }

    async fn upload_recording(&self, recording: &NewRecording) -> Result<Recording> {
        let mut form = Form::new()
            .part(
                "file",
                file_part(&recording.file_name, &recording.content, &recording.content_type)?,
            )
            .text("title", recording.title.clone());
        if let Some(description) = &recording.description {
            form = form.text("description", description.clone());
        }
        self.fetch(self.request(Method::POST, "audio").multipart(form)).await
    }

    async fn update_recording(&self, id: &Id, update: &RecordingUpdate) -> Result<Recording> {
        let form = Form::new()
            .text("title", update.title.clone())
            .text("description", update.description.clone().unwrap_or_default());
        self.fetch(self.request(Method::PUT, &format!("audio/{}", id)).multipart(form)).await
    }

    async fn delete_recording(&self, id: &Id) -> Result<()> {
        self.execute(self.request(Method::DELETE, &format!("audio/{}", id))).await
    }

    async fn list_vignettes(&self) -> Result<Vec<Vignette>> {
        self.fetch(self.request(Method::GET, "vignettes")).await
    }

    async fn get_vignette(&self, id: &Id) -> Result<Vignette> {
        self.fetch(self.request(Method::GET, &format!("vignettes/{}", id))).await
    }

    async fn create_vignette(&self, draft: &VignetteDraft) -> Result<Vignette> {
        self.fetch(self.request(Method::POST, "vignettes").json(draft)).await
    }

    async fn update_vignette(&self, id: &Id, draft: &VignetteDraft) -> Result<Vignette> {
        self.fetch(self.request(Method::PUT, &format!("vignettes/{}", id)).json(draft)).await
    }

    async fn delete_vignette(&self, id: &Id) -> Result<()> {
        self.execute(self.request(Method::DELETE, &format!("vignettes/{}", id))).await
    }

    async fn list_files(&self) -> Result<Vec<FileEntry>> {
        self.fetch(self.request(Method::GET, "files")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_read_from_json_bodies() {
        assert_eq!(error_detail(Some("Bad Request"), r#"{"detail": "Album name is required"}"#), "Album name is required");
    }

    #[test]
    fn detail_falls_back_to_body_then_reason() {
        assert_eq!(error_detail(Some("Bad Gateway"), "upstream down\n"), "upstream down");
        assert_eq!(error_detail(Some("Not Found"), ""), "Not Found");
        assert_eq!(error_detail(None, "  "), "request failed");
    }

    #[test]
    fn urls_are_rooted_under_api() {
        let config = Config {
            api_url: "http://localhost:8000/".into(),
            token: None,
            timeout: None,
            record_command: vec![],
            unsent_dir: ".".into(),
        };
        let client = StoreClient::new(&config).unwrap();
        assert_eq!(client.url("albums/4/photos/9"), "http://localhost:8000/api/albums/4/photos/9");
    }
}
