//! Writing and editing vignettes: short stories with photos attached.

use crate::model::photo::Photo;
use crate::model::vignette::{Vignette, VignetteDraft};
use crate::model::Id;
use crate::store::MediaStore;
use crate::sync_error::{Result, SyncError};

pub const SAVE_FAILED: &str = "Failed to save vignette";

/// Form state for creating a vignette or editing an existing one.
#[derive(Debug, Clone, Default)]
pub struct VignetteEditor {
    editing: Option<Id>,
    title: String,
    content: String,
    selected: Vec<Id>,
    available: Vec<Photo>,
}

impl VignetteEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `vignette`, keeping its attached photos in their order.
    pub fn edit(vignette: &Vignette) -> Self {
        VignetteEditor {
            editing: Some(vignette.id.clone()),
            title: vignette.title.clone(),
            content: vignette.content.clone().unwrap_or_default(),
            selected: vignette.photos.iter().map(|p| p.id.clone()).collect(),
            available: vec![],
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn selected(&self) -> &[Id] {
        &self.selected
    }

    pub fn available(&self) -> &[Photo] {
        &self.available
    }

    pub fn is_selected(&self, photo_id: &Id) -> bool {
        self.selected.contains(photo_id)
    }

    /// Loads the photos that can be attached. A failed fetch is logged and
    /// leaves the picker empty; the draft itself stays usable.
    pub async fn load_photos<S: MediaStore + ?Sized>(&mut self, store: &S) {
        match store.list_photos().await {
            Ok(photos) => self.available = photos,
            Err(err) => tracing::warn!(error = %err, "failed to fetch photos for vignette"),
        }
    }

    /// Selects or deselects a photo. Newly selected photos go last. Returns
    /// whether the photo is now selected.
    pub fn toggle_photo(&mut self, photo_id: &Id) -> bool {
        if let Some(pos) = self.selected.iter().position(|id| id == photo_id) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(photo_id.clone());
            true
        }
    }

    pub fn draft(&self) -> Result<VignetteDraft> {
        if self.title.trim().is_empty() {
            return Err(SyncError::validation("Please enter a title"));
        }
        Ok(VignetteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            photo_ids: self.selected.clone(),
        })
    }

    /// Creates or updates, depending on how the editor was started.
    pub async fn save<S: MediaStore + ?Sized>(&self, store: &S) -> Result<Vignette> {
        let draft = self.draft()?;
        let saved = match &self.editing {
            Some(id) => store.update_vignette(id, &draft).await,
            None => store.create_vignette(&draft).await,
        };

        match saved {
            Ok(vignette) => {
                tracing::info!(id = %vignette.id, photos = vignette.photos.len(), "vignette saved");
                Ok(vignette)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save vignette");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    #[test]
    fn toggling_appends_and_removes() {
        let mut editor = VignetteEditor::new();
        let (a, b, c) = (Id::from("1"), Id::from("2"), Id::from("3"));

        assert!(editor.toggle_photo(&b));
        assert!(editor.toggle_photo(&a));
        assert!(editor.toggle_photo(&c));
        assert!(!editor.toggle_photo(&a));
        assert_eq!(editor.selected(), &[b.clone(), c.clone()]);

        assert!(editor.toggle_photo(&a));
        assert_eq!(editor.selected(), &[b, c, a]);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut editor = VignetteEditor::new();
        editor.set_title("   ");
        assert_matches!(editor.draft(), Err(SyncError::Validation(_)));
    }

    #[test]
    fn editing_keeps_attached_photo_order() {
        let photo = |id: &str| Photo { id: Id::from(id), title: id.into(), description: None, created_at: Utc::now() };
        let vignette = Vignette {
            id: Id::from("v1"),
            title: "Grandma's kitchen".into(),
            content: None,
            created_at: Utc::now(),
            photos: vec![photo("9"), photo("4")],
        };

        let editor = VignetteEditor::edit(&vignette);
        assert!(editor.is_editing());
        assert_eq!(editor.content(), "");
        let draft = editor.draft().unwrap();
        assert_eq!(draft.photo_ids, vec![Id::from("9"), Id::from("4")]);
    }
}
