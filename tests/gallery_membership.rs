use assert_matches::assert_matches;

use famsync::gallery::{AlbumPane, Decision, GalleryTab, GalleryView};
use famsync::memory_store::MemoryStore;
use famsync::model::photo::PhotoUpload;
use famsync::model::Id;
use famsync::store::MediaStore;
use famsync::sync_error::SyncError;
use famsync::utils::{AssumeYes, Confirm};

struct Decline;

impl Confirm for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

fn jpeg(name: &str) -> PhotoUpload {
    PhotoUpload::new(name, format!("/photos/{}", name), b"\xff\xd8\xff\xe0".to_vec(), "image/jpeg")
}

async fn seeded(store: &MemoryStore) -> (Id, Id) {
    let photo = store.upload_photo(&jpeg("Beach.jpg")).await.unwrap();
    let mut gallery = GalleryView::new(store);
    let album = gallery.create_album("Summer 2024", "").await.unwrap();
    (album.id, photo.id)
}

#[tokio::test]
async fn new_album_starts_empty() {
    let store = MemoryStore::new();
    let mut gallery = GalleryView::new(&store);

    let album = gallery.create_album("Summer 2024", "").await.unwrap();

    assert_eq!(album.name, "Summer 2024");
    assert_eq!(album.photo_count, 0);
    assert_eq!(album.description, None);
    assert_eq!(gallery.albums().len(), 1);
}

#[tokio::test]
async fn created_album_is_returned_even_if_the_refresh_fails() {
    let store = MemoryStore::new();
    let mut gallery = GalleryView::new(&store);
    store.set_listing_offline(true);

    let album = gallery.create_album("Summer 2024", "").await.unwrap();

    assert_eq!(album.name, "Summer 2024");
    assert!(gallery.albums().is_empty());
    store.set_listing_offline(false);
    assert_eq!(gallery.list_albums().await.unwrap()[0].id, album.id);
}

#[tokio::test]
async fn uploaded_photo_is_titled_after_the_file() {
    let store = MemoryStore::new();
    let mut gallery = GalleryView::new(&store);

    let report = gallery.upload_photos(&[jpeg("Beach.jpg")], |_, _| {}).await.unwrap();

    assert_eq!(report.uploaded.len(), 1);
    assert!(report.failed.is_empty());
    assert_eq!(gallery.photos()[0].title, "Beach.jpg");
}

#[tokio::test]
async fn adding_the_same_photo_twice_counts_once() {
    let store = MemoryStore::new();
    let (album, photo) = seeded(&store).await;
    let mut gallery = GalleryView::new(&store);

    gallery.add_photo_to_album(&photo, &album).await.unwrap();
    gallery.add_photo_to_album(&photo, &album).await.unwrap();

    assert_eq!(gallery.albums()[0].photo_count, 1);
    let detail = gallery.view_album(&album).await.unwrap();
    assert_eq!(detail.photos.len(), 1);
    assert!(detail.contains(&photo));
}

#[tokio::test]
async fn removed_photo_is_gone_from_the_album_view() {
    let store = MemoryStore::new();
    let (album, photo) = seeded(&store).await;
    let mut gallery = GalleryView::new(&store);
    gallery.add_photo_to_album(&photo, &album).await.unwrap();

    let decision = gallery.remove_photo_from_album(&photo, &album, &AssumeYes).await.unwrap();

    assert_eq!(decision, Decision::Applied);
    let open = gallery.open_album().unwrap();
    assert!(!open.contains(&photo));
    assert_eq!(gallery.albums()[0].photo_count, 0);
    assert_eq!(gallery.list_photos().await.unwrap().len(), 1);
}

#[tokio::test]
async fn removing_a_photo_that_is_not_a_member_changes_nothing() {
    let store = MemoryStore::new();
    let (album, photo) = seeded(&store).await;
    let mut gallery = GalleryView::new(&store);

    let decision = gallery.remove_photo_from_album(&photo, &album, &AssumeYes).await.unwrap();

    assert_eq!(decision, Decision::Applied);
    assert_eq!(gallery.albums()[0].photo_count, 0);
    assert_eq!(gallery.open_album().map(|a| a.photos.len()), Some(0));
}

#[tokio::test]
async fn deleting_an_album_keeps_its_photos() {
    let store = MemoryStore::new();
    let (album, photo) = seeded(&store).await;
    let mut gallery = GalleryView::new(&store);
    gallery.add_photo_to_album(&photo, &album).await.unwrap();
    gallery.view_album(&album).await.unwrap();

    let decision = gallery.delete_album(&album, &AssumeYes).await.unwrap();

    assert_eq!(decision, Decision::Applied);
    assert!(gallery.albums().is_empty());
    assert_eq!(gallery.tab(), &GalleryTab::Albums(AlbumPane::Index));
    let photos = gallery.list_photos().await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].id, photo);
}

#[tokio::test]
async fn deleting_a_photo_drops_it_from_albums() {
    let store = MemoryStore::new();
    let (album, photo) = seeded(&store).await;
    let mut gallery = GalleryView::new(&store);
    gallery.add_photo_to_album(&photo, &album).await.unwrap();
    gallery.list_photos().await.unwrap();
    gallery.select_photo(&photo);

    let decision = gallery.delete_photo(&photo, &AssumeYes).await.unwrap();

    assert_eq!(decision, Decision::Applied);
    assert!(gallery.photos().is_empty());
    assert!(gallery.selected_photo().is_none());
    gallery.list_albums().await.unwrap();
    assert_eq!(gallery.albums()[0].photo_count, 0);
}

#[tokio::test]
async fn adding_to_the_open_album_refreshes_it() {
    let store = MemoryStore::new();
    let (album, photo) = seeded(&store).await;
    let mut gallery = GalleryView::new(&store);
    gallery.view_album(&album).await.unwrap();

    gallery.add_photo_to_album(&photo, &album).await.unwrap();

    let open = gallery.open_album().unwrap();
    assert_eq!(open.album.photo_count, 1);
    assert_eq!(open.photos[0].id, photo);
}

#[tokio::test]
async fn blank_album_name_never_reaches_the_server() {
    let store = MemoryStore::new();
    let mut gallery = GalleryView::new(&store);

    let result = gallery.create_album("   ", "no name").await;

    assert_matches!(result, Err(SyncError::Validation(msg)) if msg == "Please enter an album name");
    assert_eq!(store.requests(), 0);
}

#[tokio::test]
async fn declined_confirmation_sends_nothing() {
    let store = MemoryStore::new();
    let (album, photo) = seeded(&store).await;
    let mut gallery = GalleryView::new(&store);
    let before = store.requests();

    assert_eq!(gallery.delete_photo(&photo, &Decline).await.unwrap(), Decision::Cancelled);
    assert_eq!(gallery.delete_album(&album, &Decline).await.unwrap(), Decision::Cancelled);
    assert_eq!(gallery.remove_photo_from_album(&photo, &album, &Decline).await.unwrap(), Decision::Cancelled);

    assert_eq!(store.requests(), before);
}

#[tokio::test]
async fn failed_fetch_keeps_what_was_shown() {
    let store = MemoryStore::new();
    seeded(&store).await;
    let mut gallery = GalleryView::new(&store);
    gallery.list_photos().await.unwrap();
    gallery.list_albums().await.unwrap();

    store.set_offline(true);

    assert_matches!(gallery.list_photos().await, Err(err) if err.is_network());
    assert_matches!(gallery.list_albums().await, Err(err) if err.is_network());
    assert_eq!(gallery.photos().len(), 1);
    assert_eq!(gallery.albums()[0].name, "Summer 2024");
}

#[tokio::test]
async fn one_rejected_file_does_not_stop_the_batch() {
    let store = MemoryStore::new();
    store.reject_title("scan.jpg");
    let mut gallery = GalleryView::new(&store);
    let mut seen = vec![];

    let report = gallery
        .upload_photos(&[jpeg("a.jpg"), jpeg("scan.jpg"), jpeg("b.jpg")], |done, total| seen.push((done, total)))
        .await
        .unwrap();

    assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(report.uploaded.len(), 2);
    assert_matches!(&report.failed[..], [(name, SyncError::Api { status: 415, .. })] if name == "scan.jpg");
    assert_eq!(gallery.photos().len(), 2);
}
