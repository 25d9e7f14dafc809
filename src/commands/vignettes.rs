use super::{short_date, truncate, Context};
use crate::model::Id;
use crate::sync_error::Result;
use crate::vignettes::{VignetteEditor, SAVE_FAILED};

pub async fn list(ctx: &Context<'_>) -> Result<()> {
    let vignettes = ctx.store.list_vignettes().await?;
    if vignettes.is_empty() {
        println!("No vignettes yet. Write one with `famsync vignettes create -t <title>`");
        return Ok(());
    }

    println!("📝 found {} vignettes:", vignettes.len());
    for vignette in &vignettes {
        println!(
            "\t{:<6} {:<36} {:<14} {} photos",
            vignette.id,
            truncate(&vignette.title, 36),
            short_date(&vignette.created_at),
            vignette.photos.len()
        );
    }
    Ok(())
}

pub async fn show(ctx: &Context<'_>, id: &Id) -> Result<()> {
    let vignette = ctx.store.get_vignette(id).await?;

    println!("📝 {}", vignette.title);
    println!("{}", short_date(&vignette.created_at));
    println!();
    match vignette.content.as_deref().filter(|c| !c.is_empty()) {
        Some(content) => println!("{}", content),
        None => println!("No content"),
    }
    if !vignette.photos.is_empty() {
        println!();
        println!("Photos:");
        for photo in &vignette.photos {
            println!("\t{:<6} {}", photo.id, photo.display_title());
        }
    }
    Ok(())
}

async fn save(ctx: &Context<'_>, editor: &VignetteEditor) -> Result<()> {
    match editor.save(ctx.store).await {
        Ok(vignette) => {
            println!("✅  saved {} ({}) with {} photos", vignette.title, vignette.id, vignette.photos.len());
            Ok(())
        }
        Err(err) => {
            println!("❌  {}", err.user_message(SAVE_FAILED));
            Err(err)
        }
    }
}

pub async fn create(ctx: &Context<'_>, title: String, content: String, photos: &[Id]) -> Result<()> {
    let mut editor = VignetteEditor::new();
    editor.set_title(title);
    editor.set_content(content);
    for photo in photos {
        if !editor.is_selected(photo) {
            editor.toggle_photo(photo);
        }
    }
    save(ctx, &editor).await
}

pub async fn edit(
    ctx: &Context<'_>,
    id: &Id,
    title: Option<String>,
    content: Option<String>,
    toggle: &[Id],
) -> Result<()> {
    let vignette = ctx.store.get_vignette(id).await?;
    let mut editor = VignetteEditor::edit(&vignette);
    if let Some(title) = title {
        editor.set_title(title);
    }
    if let Some(content) = content {
        editor.set_content(content);
    }
    for photo in toggle {
        let selected = editor.toggle_photo(photo);
        println!("{} photo {}", if selected { "attaching" } else { "detaching" }, photo);
    }
    save(ctx, &editor).await
}

pub async fn delete(ctx: &Context<'_>, id: &Id) -> Result<()> {
    if !ctx.confirm.confirm("Are you sure you want to delete this vignette?") {
        println!("Nothing was deleted");
        return Ok(());
    }
    ctx.store.delete_vignette(id).await?;
    println!("🗑  deleted vignette {}", id);
    Ok(())
}
