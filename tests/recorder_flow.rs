use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use bytes::Bytes;

use famsync::memory_store::MemoryStore;
use famsync::recorder::{
    AudioInput, CaptureError, CaptureFormat, CaptureStream, Recorder, RecorderState, EMPTY_CLIP,
};
use famsync::store::MediaStore;
use famsync::sync_error::SyncError;

/// Plays back fixed chunks. With `hold_open` the stream then waits forever,
/// like a live microphone, until the recorder stops it.
#[derive(Default)]
struct ScriptedInput {
    chunks: Vec<&'static [u8]>,
    hold_open: bool,
    refuse: bool,
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicBool>,
}

struct ScriptedStream {
    chunks: std::vec::IntoIter<&'static [u8]>,
    hold_open: bool,
    released: Arc<AtomicBool>,
}

#[async_trait]
impl AudioInput for ScriptedInput {
    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
        if self.refuse {
            return Err(CaptureError::PermissionDenied("denied by user".into()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedStream {
            chunks: self.chunks.clone().into_iter(),
            hold_open: self.hold_open,
            released: self.released.clone(),
        }))
    }

    fn format(&self) -> CaptureFormat {
        CaptureFormat::wav()
    }
}

#[async_trait]
impl CaptureStream for ScriptedStream {
    async fn next_chunk(&mut self) -> Option<io::Result<Bytes>> {
        if let Some(chunk) = self.chunks.next() {
            return Some(Ok(Bytes::from_static(chunk)));
        }
        if self.hold_open {
            futures::future::pending::<()>().await;
        }
        None
    }

    async fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Records until the scripted input runs dry, then stops.
async fn record_all(recorder: &mut Recorder<ScriptedInput>) {
    recorder.start().await.unwrap();
    let mut progress = recorder.progress().unwrap();
    while progress.changed().await.is_ok() {}
    recorder.stop().await.unwrap();
}

#[tokio::test]
async fn stop_then_upload_sends_the_whole_take() {
    let store = MemoryStore::new();
    let input = ScriptedInput { chunks: vec![&b"\x01\x00\x02\x00"[..], &b"\x03\x00"[..]], ..Default::default() };
    let released = input.released.clone();
    let mut recorder = Recorder::new(input);

    record_all(&mut recorder).await;

    assert_eq!(recorder.state(), RecorderState::StoppedWithClip);
    assert!(released.load(Ordering::SeqCst));
    let clip = recorder.clip().unwrap();
    assert_eq!(clip.len(), 6);
    assert!(clip.file_name().starts_with("recording-"));
    assert!(clip.file_name().ends_with(".wav"));

    let stored = recorder.upload(&store, None).await.unwrap();

    assert_eq!(recorder.state(), RecorderState::Idle);
    assert!(stored.title.starts_with("Recording "));
    assert_eq!(store.download_recording(&stored.id).await.unwrap(), Bytes::from_static(&[1, 0, 2, 0, 3, 0]));
}

#[tokio::test]
async fn discarding_leaves_the_server_alone() {
    let store = MemoryStore::new();
    let mut recorder = Recorder::new(ScriptedInput { chunks: vec![&b"pcm!"[..]], ..Default::default() });

    record_all(&mut recorder).await;
    recorder.discard().unwrap();

    assert_eq!(recorder.state(), RecorderState::Idle);
    assert!(recorder.clip().is_none());
    assert_eq!(store.requests(), 0);
    assert!(store.list_recordings().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn ticker_counts_seconds_and_empty_take_is_not_uploaded() {
    let store = MemoryStore::new();
    let input = ScriptedInput { hold_open: true, ..Default::default() };
    let released = input.released.clone();
    let mut recorder = Recorder::new(input);

    recorder.start().await.unwrap();
    assert_eq!(recorder.state(), RecorderState::Recording);
    let progress = recorder.progress().unwrap();
    tokio::time::sleep(Duration::from_millis(3_500)).await;
    assert_eq!(progress.borrow().elapsed_secs, 3);

    recorder.stop().await.unwrap();
    assert!(released.load(Ordering::SeqCst));
    assert_eq!(recorder.clip().map(|c| c.elapsed_secs()), Some(3));
    assert_eq!(recorder.notice(), Some(EMPTY_CLIP));

    let result = recorder.upload(&store, None).await;

    assert_matches!(result, Err(SyncError::Validation(_)));
    assert_eq!(recorder.state(), RecorderState::StoppedWithClip);
    assert_eq!(store.requests(), 0);
}

#[tokio::test]
async fn refused_microphone_goes_back_to_idle_with_a_notice() {
    let mut recorder = Recorder::new(ScriptedInput { refuse: true, ..Default::default() });

    let result = recorder.start().await;

    assert_matches!(result, Err(SyncError::Capture(CaptureError::PermissionDenied(_))));
    assert_eq!(recorder.state(), RecorderState::Idle);
    assert_eq!(recorder.notice(), Some("Failed to access microphone. Please check permissions."));
    assert!(recorder.progress().is_none());
}

#[tokio::test]
async fn failed_upload_keeps_the_clip_for_another_try() {
    let store = MemoryStore::new();
    store.reject_title("Grandpa's story");
    let mut recorder = Recorder::new(ScriptedInput { chunks: vec![&b"\x10\x00\x20\x00"[..]], ..Default::default() });
    record_all(&mut recorder).await;

    let result = recorder.upload(&store, Some("Grandpa's story".into())).await;

    assert_matches!(result, Err(SyncError::Api { status: 415, .. }));
    assert_eq!(recorder.state(), RecorderState::StoppedWithClip);
    assert_eq!(recorder.notice(), Some("Unsupported audio format"));
    assert_eq!(recorder.clip().map(|c| c.len()), Some(4));

    let stored = recorder.upload(&store, Some("Grandpa's story, take 2".into())).await.unwrap();
    assert_eq!(stored.title, "Grandpa's story, take 2");
    assert_eq!(recorder.notice(), None);
    assert_eq!(store.list_recordings().await.unwrap().len(), 1);
}

#[tokio::test]
async fn a_pending_clip_blocks_a_new_recording() {
    let input = ScriptedInput { chunks: vec![&b"ab"[..]], ..Default::default() };
    let opened = input.opened.clone();
    let mut recorder = Recorder::new(input);
    record_all(&mut recorder).await;

    assert_matches!(recorder.start().await, Err(SyncError::Validation(_)));
    assert_eq!(recorder.state(), RecorderState::StoppedWithClip);
    assert_eq!(opened.load(Ordering::SeqCst), 1);

    recorder.discard().unwrap();
    assert_matches!(recorder.stop().await, Err(SyncError::Validation(_)));
}
