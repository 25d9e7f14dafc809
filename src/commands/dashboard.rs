use super::{short_date, truncate, Context};
use crate::dashboard::{Dashboard, RecentItem};
use crate::sync_error::Result;

fn icon(item: &RecentItem) -> &'static str {
    match item {
        RecentItem::Vignette(_) => "📝",
        RecentItem::Audio(_) => "🎙 ",
        RecentItem::File(_) => "📁",
    }
}

pub async fn show(ctx: &Context<'_>) -> Result<()> {
    let dashboard = Dashboard::load(ctx.store).await?;
    let stats = dashboard.stats;

    println!("Vignettes {:<6} Photos {:<6} Audio {:<6} Files {}", stats.vignettes, stats.photos, stats.audio, stats.files);
    println!();
    println!("Recent Activity");

    if dashboard.recent.is_empty() {
        println!("No activity yet. Start by creating a vignette, recording audio, or uploading files.");
        return Ok(());
    }

    for item in dashboard.recent.items() {
        println!("{} {:<40} {}", icon(item), item.title(), short_date(&item.created_at()));
        match (item, item.summary().filter(|s| !s.is_empty())) {
            (_, Some(summary)) => println!("\t{}", truncate(summary, 80)),
            (RecentItem::Vignette(_), None) => println!("\tNo content"),
            _ => {}
        }
    }
    Ok(())
}
