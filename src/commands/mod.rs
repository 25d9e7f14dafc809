//! One module per top-level command. Each prints its results to stdout and
//! returns the first error it hits; `main` reports it.

mod albums;
mod audio;
mod dashboard;
mod files;
mod photos;
mod vignettes;

use chrono::{DateTime, Local, Utc};

use crate::cli::{AlbumsCmd, AudioCmd, Command, PhotosCmd, VignettesCmd};
use crate::config::Config;
use crate::store::MediaStore;
use crate::sync_error::Result;
use crate::utils::{Confirm, StopSignal};

/// What every command gets to work with.
pub struct Context<'a> {
    pub store: &'a dyn MediaStore,
    pub confirm: &'a dyn Confirm,
    pub config: &'a Config,
    pub stop: &'a dyn StopSignal,
}

pub async fn run(command: Command, ctx: &Context<'_>) -> Result<()> {
    match command {
        Command::Dashboard => dashboard::show(ctx).await,
        Command::Photos(cmd) => match cmd {
            PhotosCmd::List { chronological } => photos::list(ctx, chronological).await,
            PhotosCmd::Upload { folder } => photos::upload(ctx, &folder).await,
            PhotosCmd::Delete { id } => photos::delete(ctx, &id).await,
        },
        Command::Albums(cmd) => match cmd {
            AlbumsCmd::List => albums::list(ctx).await,
            AlbumsCmd::Create { name, description } => albums::create(ctx, &name, &description).await,
            AlbumsCmd::Show { id } => albums::show(ctx, &id).await,
            AlbumsCmd::Delete { id } => albums::delete(ctx, &id).await,
            AlbumsCmd::Add { album, photo } => albums::add(ctx, &album, &photo).await,
            AlbumsCmd::Remove { album, photo } => albums::remove(ctx, &album, &photo).await,
        },
        Command::Audio(cmd) => match cmd {
            AudioCmd::List => audio::list(ctx).await,
            AudioCmd::Record { title } => audio::record(ctx, title).await,
            AudioCmd::Import { file, title } => audio::import(ctx, &file, title).await,
            AudioCmd::Download { id, output } => audio::download(ctx, &id, output).await,
            AudioCmd::Rename { id, title, description } => audio::rename(ctx, &id, title, description).await,
            AudioCmd::Delete { id } => audio::delete(ctx, &id).await,
        },
        Command::Vignettes(cmd) => match cmd {
            VignettesCmd::List => vignettes::list(ctx).await,
            VignettesCmd::Show { id } => vignettes::show(ctx, &id).await,
            VignettesCmd::Create { title, content, photos } => {
                vignettes::create(ctx, title, content, &photos).await
            }
            VignettesCmd::Edit { id, title, content, toggle } => {
                vignettes::edit(ctx, &id, title, content, &toggle).await
            }
            VignettesCmd::Delete { id } => vignettes::delete(ctx, &id).await,
        },
        Command::Files => files::list(ctx).await,
    }
}

/// `Jul 4, 2024`, in local time.
pub(crate) fn short_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

/// Cuts `text` to `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Oma's Küche", 20), "Oma's Küche");
        assert_eq!(truncate("Grandpa's fishing trip", 8), "Grandpa…");
    }
}
