use super::{short_date, Context};
use crate::gallery::{Decision, GalleryView};
use crate::model::photo_album::Album;
use crate::model::Id;
use crate::sync_error::Result;

fn photo_count(count: u32) -> String {
    match count {
        1 => "1 photo".to_string(),
        n => format!("{} photos", n),
    }
}

fn print_album(album: &Album) {
    match album.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => {
            println!("\t{:<6} {:<30} {:<10} {}", album.id, album.name, photo_count(album.photo_count), description)
        }
        None => println!("\t{:<6} {:<30} {}", album.id, album.name, photo_count(album.photo_count)),
    }
}

pub async fn list(ctx: &Context<'_>) -> Result<()> {
    let mut gallery = GalleryView::new(ctx.store);
    gallery.show_albums();
    let albums = gallery.list_albums().await?;

    if albums.is_empty() {
        println!("No albums yet. Create one with `famsync albums create <name>`");
        return Ok(());
    }

    println!("📚 found {} albums:", albums.len());
    albums.iter().for_each(print_album);
    Ok(())
}

pub async fn create(ctx: &Context<'_>, name: &str, description: &str) -> Result<()> {
    let mut gallery = GalleryView::new(ctx.store);
    let album = gallery.create_album(name, description).await?;
    println!("📚 created album {} ({})", album.name, album.id);
    Ok(())
}

pub async fn show(ctx: &Context<'_>, id: &Id) -> Result<()> {
    let mut gallery = GalleryView::new(ctx.store);
    let detail = gallery.view_album(id).await?;

    println!("📚 {}", detail.album.name);
    if let Some(description) = detail.album.description.as_deref().filter(|d| !d.is_empty()) {
        println!("{}", description);
    }
    if detail.photos.is_empty() {
        println!("This album is empty. Add photos with `famsync albums add {} <photo>`", detail.album.id);
        return Ok(());
    }

    println!("{}:", photo_count(detail.photos.len() as u32));
    for photo in &detail.photos {
        println!("\t{:<6} {:<40} {}", photo.id, photo.display_title(), short_date(&photo.created_at));
    }
    Ok(())
}

pub async fn delete(ctx: &Context<'_>, id: &Id) -> Result<()> {
    let mut gallery = GalleryView::new(ctx.store);
    match gallery.delete_album(id, ctx.confirm).await? {
        Decision::Applied => println!("🗑  deleted album {}, its photos were kept", id),
        Decision::Cancelled => println!("Nothing was deleted"),
    }
    Ok(())
}

pub async fn add(ctx: &Context<'_>, album: &Id, photo: &Id) -> Result<()> {
    let mut gallery = GalleryView::new(ctx.store);
    gallery.add_photo_to_album(photo, album).await?;

    match gallery.albums().iter().find(|a| &a.id == album) {
        Some(updated) => println!("Photo added to {} ({})", updated.name, photo_count(updated.photo_count)),
        None => println!("Photo added to album!"),
    }
    Ok(())
}

pub async fn remove(ctx: &Context<'_>, album: &Id, photo: &Id) -> Result<()> {
    let mut gallery = GalleryView::new(ctx.store);
    match gallery.remove_photo_from_album(photo, album, ctx.confirm).await? {
        Decision::Applied => {
            let left = gallery.open_album().map(|detail| detail.photos.len()).unwrap_or_default();
            println!("Photo removed from album, {} left", photo_count(left as u32));
        }
        Decision::Cancelled => println!("Nothing was removed"),
    }
    Ok(())
}
