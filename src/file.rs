use std::fs;
use std::path::{Path, PathBuf};

use crate::model::photo::PhotoUpload;
use crate::sync_error::Result;

const IMAGE_TYPES: [(&str, &str); 7] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

const AUDIO_TYPES: [(&str, &str); 6] = [
    ("webm", "audio/webm"),
    ("wav", "audio/wav"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
];

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

fn lookup(table: &[(&str, &'static str)], path: &Path) -> Option<&'static str> {
    let ext = extension(path);
    table.iter().find(|(e, _)| *e == ext).map(|(_, mime)| *mime)
}

pub fn image_content_type(path: &Path) -> Option<&'static str> {
    lookup(&IMAGE_TYPES, path)
}

pub fn audio_content_type(path: &Path) -> Option<&'static str> {
    lookup(&AUDIO_TYPES, path)
}

/// Guesses an audio file extension from the first bytes of the payload.
pub fn sniff_audio_extension(content: &[u8]) -> &'static str {
    if content.starts_with(b"RIFF") {
        "wav"
    } else if content.starts_with(b"OggS") {
        "ogg"
    } else if content.starts_with(b"fLaC") {
        "flac"
    } else if content.starts_with(b"ID3") || content.starts_with(&[0xff, 0xfb]) {
        "mp3"
    } else if content.len() > 8 && &content[4..8] == b"ftyp" {
        "m4a"
    } else {
        "webm"
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Entries of `path`, sorted by name. Unreadable entries are logged and skipped.
pub fn list_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = vec![];
    for entry in fs::read_dir(path)? {
        match entry {
            Ok(e) => paths.push(e.path()),
            Err(e) => tracing::warn!(error = %e, "failed to read a directory entry"),
        }
    }
    paths.sort();

    Ok(paths)
}

/// Loads every image in `folder` for upload. Returns the uploads and the paths
/// that were skipped because they are not images.
pub async fn read_photos(folder: &Path) -> Result<(Vec<PhotoUpload>, Vec<PathBuf>)> {
    let mut photos = Vec::new();
    let mut skipped = Vec::new();

    for path in list_files(folder)? {
        let meta = tokio::fs::metadata(&path).await?;
        match image_content_type(&path) {
            Some(content_type) if meta.is_file() => {
                let content = tokio::fs::read(&path).await?;
                photos.push(PhotoUpload::new(file_name(&path), path, content, content_type));
            }
            _ => {
                tracing::debug!(path = %path.display(), "not an image, skipping");
                skipped.push(path);
            }
        }
    }

    Ok((photos, skipped))
}
