use serde::{Deserialize, Serialize};

use crate::model::photo::Photo;
use crate::model::Id;

/// Album as returned by `GET /api/albums`. `photo_count` is derived by the
/// server from the membership relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo_count: u32,
}

/// Album together with its resolved membership, from `GET /api/albums/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumDetail {
    #[serde(flatten)]
    pub album: Album,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl AlbumDetail {
    pub fn id(&self) -> &Id {
        &self.album.id
    }

    pub fn contains(&self, photo_id: &Id) -> bool {
        self.photos.iter().any(|p| &p.id == photo_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAlbum {
    pub name: String,
    pub description: String,
}
