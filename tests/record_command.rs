use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;

use famsync::cli::{AudioCmd, Command};
use famsync::commands::{self, Context};
use famsync::config::Config;
use famsync::memory_store::MemoryStore;
use famsync::store::MediaStore;
use famsync::sync_error::SyncError;
use famsync::utils::{AssumeYes, Confirm, StopSignal};

struct Decline;

impl Confirm for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Presses "Enter" after a fixed delay.
struct StopAfter(Duration);

#[async_trait]
impl StopSignal for StopAfter {
    async fn wait(&self) {
        tokio::time::sleep(self.0).await;
    }
}

fn config(unsent_dir: &std::path::Path) -> Config {
    let unsent_dir = unsent_dir.display().to_string();
    Config::from_lookup(|key| match key {
        "FAMSYNC_RECORD_CMD" => Some("echo take-one".to_string()),
        "FAMSYNC_UNSENT_DIR" => Some(unsent_dir.clone()),
        _ => None,
    })
    .unwrap()
}

fn record() -> Command {
    Command::Audio(AudioCmd::Record { title: Some("Grandpa's story".into()) })
}

#[tokio::test]
async fn failed_upload_with_yes_gives_up_after_one_request() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let store = MemoryStore::new();
    store.set_offline(true);
    let stop = StopAfter(Duration::from_millis(500));
    let ctx = Context { store: &store, confirm: &AssumeYes, config: &config, stop: &stop };

    let result = tokio::time::timeout(Duration::from_secs(10), commands::run(record(), &ctx))
        .await
        .expect("record command returned");

    assert_matches!(result, Err(err) if err.is_network());
    assert_eq!(store.requests(), 1);

    let kept: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(kept.len(), 1);
    let name = kept[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("recording-") && name.ends_with(".wav"), "{}", name);
    assert_eq!(std::fs::read(&kept[0]).unwrap(), b"take-one\n");
}

#[tokio::test]
async fn kept_recording_can_be_imported_once_back_online() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let store = MemoryStore::new();
    store.set_offline(true);
    let stop = StopAfter(Duration::from_millis(500));
    let ctx = Context { store: &store, confirm: &AssumeYes, config: &config, stop: &stop };
    assert!(commands::run(record(), &ctx).await.is_err());

    store.set_offline(false);
    let kept = std::fs::read_dir(tmp.path()).unwrap().next().unwrap().unwrap().path();
    let import = Command::Audio(AudioCmd::Import { file: kept, title: Some("Grandpa's story".into()) });
    commands::run(import, &ctx).await.unwrap();

    let recordings = store.list_recordings().await.unwrap();
    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].title, "Grandpa's story");
}

#[tokio::test]
async fn declined_save_sends_nothing_and_keeps_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let store = MemoryStore::new();
    let stop = StopAfter(Duration::from_millis(300));
    let ctx = Context { store: &store, confirm: &Decline, config: &config, stop: &stop };

    commands::run(record(), &ctx).await.unwrap();

    assert_eq!(store.requests(), 0);
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn missing_capture_program_reports_the_microphone() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config(tmp.path());
    config.record_command = vec!["famsync-no-such-recorder".to_string()];
    let store = MemoryStore::new();
    let stop = StopAfter(Duration::from_millis(10));
    let ctx = Context { store: &store, confirm: &AssumeYes, config: &config, stop: &stop };

    let err = commands::run(record(), &ctx).await.unwrap_err();

    assert_matches!(err, SyncError::Capture(_));
    assert_eq!(err.user_message("Failed to record"), "Failed to access microphone. Please check permissions.");
    assert_eq!(store.requests(), 0);
}
