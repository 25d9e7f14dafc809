use std::io::stdout;
use std::path::{Path, PathBuf};

use super::{short_date, truncate, Context};
use crate::file::{audio_content_type, file_name, sniff_audio_extension};
use crate::model::audio::{NewRecording, RecordingUpdate};
use crate::model::Id;
use crate::recorder::{Clip, CommandInput, Recorder};
use crate::sync_error::{Result, SyncError};
use crate::utils::{format_elapsed, level_bar, rewrite_message};

const LEVEL_WIDTH: usize = 20;

pub async fn list(ctx: &Context<'_>) -> Result<()> {
    let recordings = ctx.store.list_recordings().await?;
    if recordings.is_empty() {
        println!("No recordings yet. Record one with `famsync audio record`");
        return Ok(());
    }

    println!("🎙  found {} recordings:", recordings.len());
    for recording in &recordings {
        let description = recording.description.as_deref().map(|d| truncate(d, 60)).unwrap_or_default();
        println!(
            "\t{:<6} {:<36} {:<14} {}",
            recording.id,
            recording.display_title(),
            short_date(&recording.created_at),
            description
        );
    }
    Ok(())
}

/// Records until the stop signal, then offers to save. A take the server
/// refuses is written to `FAMSYNC_UNSENT_DIR` for a later `audio import`.
pub async fn record(ctx: &Context<'_>, title: Option<String>) -> Result<()> {
    let input = CommandInput::from_command_line(&ctx.config.record_command)
        .ok_or_else(|| SyncError::Config("FAMSYNC_RECORD_CMD is empty".to_string()))?;
    let mut recorder = Recorder::new(input);

    if let Err(err) = recorder.start().await {
        if let Some(notice) = recorder.notice() {
            println!("{}", notice);
        }
        return Err(err);
    }
    let mut progress = recorder
        .progress()
        .ok_or_else(|| SyncError::validation("Recording did not start"))?;

    println!("🎙  Recording, press Enter to stop");
    let mut out = stdout();
    let mut stop = ctx.stop.wait();
    let mut capturing = true;
    loop {
        tokio::select! {
            _ = &mut stop => break,
            changed = progress.changed(), if capturing => {
                if changed.is_err() {
                    // input ended by itself; still wait for the stop signal
                    capturing = false;
                    continue;
                }
                let current = *progress.borrow();
                let bar = current.level.map(|l| level_bar(l, LEVEL_WIDTH)).unwrap_or_default();
                let line = format!("Recording: {} {}", format_elapsed(current.elapsed_secs), bar);
                if let Err(err) = rewrite_message(&mut out, &line) {
                    tracing::debug!(error = %err, "could not update progress line");
                }
            }
        }
    }
    println!();

    if let Err(err) = recorder.stop().await {
        if let Some(notice) = recorder.notice() {
            println!("{}", notice);
        }
        return Err(err);
    }

    if let Some(clip) = recorder.clip() {
        println!("Captured {} ({} bytes)", format_elapsed(clip.elapsed_secs()), clip.len());
    }
    if let Some(notice) = recorder.notice() {
        println!("{}", notice);
    }

    if !ctx.confirm.confirm("Save this recording?") {
        recorder.discard()?;
        println!("Recording discarded");
        return Ok(());
    }

    match recorder.upload(ctx.store, title).await {
        Ok(recording) => {
            println!("✅  saved {} ({})", recording.display_title(), recording.id);
            Ok(())
        }
        Err(err) => {
            println!("❌  {}", recorder.notice().unwrap_or("Failed to upload recording"));
            if let Some(clip) = recorder.clip().filter(|c| !c.is_empty()) {
                match keep_unsent(&ctx.config.unsent_dir, clip).await {
                    Ok(path) => println!(
                        "Kept the recording at {}, upload it later with `famsync audio import {}`",
                        path.display(),
                        path.display()
                    ),
                    Err(keep_err) => tracing::warn!(error = %keep_err, "could not keep the unsent recording"),
                }
            }
            recorder.discard()?;
            Err(err)
        }
    }
}

async fn keep_unsent(dir: &Path, clip: &Clip) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(clip.file_name());
    tokio::fs::write(&path, clip.bytes()).await?;
    Ok(path)
}

pub async fn import(ctx: &Context<'_>, path: &Path, title: Option<String>) -> Result<()> {
    let content_type = audio_content_type(path)
        .ok_or_else(|| SyncError::validation(format!("{:?} is not an audio file", path)))?;
    let content = tokio::fs::read(path).await?;
    if content.is_empty() {
        return Err(SyncError::validation(format!("{:?} is empty", path)));
    }

    let name = file_name(path);
    let recording = NewRecording {
        title: title.unwrap_or_else(|| name.clone()),
        description: None,
        file_name: name,
        content_type: content_type.to_string(),
        content: content.into(),
    };
    let stored = ctx.store.upload_recording(&recording).await?;
    println!("✅  imported {} ({})", stored.display_title(), stored.id);
    Ok(())
}

pub async fn download(ctx: &Context<'_>, id: &Id, output: Option<PathBuf>) -> Result<()> {
    let content = ctx.store.download_recording(id).await?;
    let path = output.unwrap_or_else(|| PathBuf::from(format!("recording-{}.{}", id, sniff_audio_extension(&content))));

    tokio::fs::write(&path, &content).await?;
    println!("Downloaded {} bytes to {}", content.len(), path.display());
    Ok(())
}

pub async fn rename(ctx: &Context<'_>, id: &Id, title: String, description: Option<String>) -> Result<()> {
    if title.trim().is_empty() {
        return Err(SyncError::validation("Please enter a title"));
    }
    let updated = ctx.store.update_recording(id, &RecordingUpdate { title, description }).await?;
    println!("✏️  recording {} is now {}", updated.id, updated.display_title());
    Ok(())
}

pub async fn delete(ctx: &Context<'_>, id: &Id) -> Result<()> {
    if !ctx.confirm.confirm("Are you sure you want to delete this recording?") {
        println!("Nothing was deleted");
        return Ok(());
    }
    ctx.store.delete_recording(id).await?;
    println!("🗑  deleted recording {}", id);
    Ok(())
}
