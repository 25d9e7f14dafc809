use std::io::stdout;
use std::path::Path;

use chrono::Local;

use super::{short_date, Context};
use crate::file::read_photos;
use crate::gallery::{Decision, GalleryView, PhotoLayout};
use crate::model::Id;
use crate::sync_error::Result;
use crate::utils::rewrite_message;

pub async fn list(ctx: &Context<'_>, chronological: bool) -> Result<()> {
    let mut gallery = GalleryView::new(ctx.store);
    let layout = if chronological { PhotoLayout::Chronological } else { PhotoLayout::Grid };
    gallery.show_photos(layout);
    gallery.list_photos().await?;

    let photos = gallery.sorted_photos();
    if photos.is_empty() {
        println!("No photos yet. Upload your first photos with `famsync photos upload <folder>`");
        return Ok(());
    }

    println!("📷 found {} photos:", photos.len());
    match layout {
        PhotoLayout::Grid => {
            for photo in photos {
                println!("\t{:<6} {:<40} {}", photo.id, photo.display_title(), short_date(&photo.created_at));
            }
        }
        PhotoLayout::Chronological => {
            let mut current_day = None;
            for photo in photos {
                let day = photo.created_at.with_timezone(&Local).date_naive();
                if current_day != Some(day) {
                    println!("{}", day.format("%A, %B %-d, %Y"));
                    current_day = Some(day);
                }
                println!("\t{:<6} {}", photo.id, photo.display_title());
            }
        }
    }

    Ok(())
}

pub async fn upload(ctx: &Context<'_>, folder: &Path) -> Result<()> {
    let (uploads, skipped) = read_photos(folder).await?;
    for path in &skipped {
        println!("{:?} is not an image", path);
    }
    println!("loaded {} photos", uploads.len());

    if uploads.is_empty() {
        println!("No photos to add");
        return Ok(());
    }

    let mut gallery = GalleryView::new(ctx.store);
    let mut out = stdout();
    let report = gallery
        .upload_photos(&uploads, |done, total| {
            if let Err(err) = rewrite_message(&mut out, &format!("uploaded {} / {} files", done, total)) {
                tracing::debug!(error = %err, "could not update progress line");
            }
        })
        .await?;
    println!();

    for (name, err) in &report.failed {
        println!("failed to upload {} due to {}", name, err);
    }
    println!(
        "✅  {} uploaded, {} failed, {} photos in the library",
        report.uploaded.len(),
        report.failed.len(),
        gallery.photos().len()
    );

    Ok(())
}

pub async fn delete(ctx: &Context<'_>, id: &Id) -> Result<()> {
    let mut gallery = GalleryView::new(ctx.store);
    match gallery.delete_photo(id, ctx.confirm).await? {
        Decision::Applied => println!("🗑  deleted photo {}, {} photos left", id, gallery.photos().len()),
        Decision::Cancelled => println!("Nothing was deleted"),
    }
    Ok(())
}
