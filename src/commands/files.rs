use super::{short_date, truncate, Context};
use crate::sync_error::Result;

pub async fn list(ctx: &Context<'_>) -> Result<()> {
    let files = ctx.store.list_files().await?;
    if files.is_empty() {
        println!("No files yet");
        return Ok(());
    }

    println!("📁 found {} files:", files.len());
    for file in &files {
        let description = file.description.as_deref().map(|d| truncate(d, 60)).unwrap_or_default();
        println!("\t{:<6} {:<30} {:<14} {}", file.id, file.title, short_date(&file.created_at), description);
    }
    Ok(())
}
