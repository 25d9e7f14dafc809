//! Voice recording: acquire an input, buffer what it produces, preview, then
//! upload or discard.
//!
//! ```text
//! Idle -> RequestingPermission -> Recording -> StoppedWithClip -> Uploading -> Idle
//!              |                                  |    ^             |
//!              +--> Idle (input refused)          |    +-------------+ (upload failed)
//!                                                 +--> Idle (discard)
//! ```
//!
//! Nothing retries on its own: a refused input or a failed upload leaves a
//! notice and waits for the user to act again.

pub mod input;
pub mod meter;

use std::io;
use std::mem;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Local, Utc};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

pub use input::{AudioInput, CaptureError, CaptureFormat, CaptureStream, CommandInput, PcmFormat};
use meter::LevelMeter;

use crate::model::audio::{NewRecording, Recording};
use crate::store::MediaStore;
use crate::sync_error::{Result, SyncError};

const TICK: Duration = Duration::from_secs(1);

pub const EMPTY_CLIP: &str = "Nothing was recorded. Check the microphone and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    RequestingPermission,
    Recording,
    StoppedWithClip,
    Uploading,
}

/// Published while recording. `level` stays `None` when the input can't be
/// metered.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaptureProgress {
    pub elapsed_secs: u64,
    pub level: Option<f32>,
}

/// A finished take, held in memory until it is uploaded or discarded.
#[derive(Debug, Clone)]
pub struct Clip {
    chunks: Vec<Bytes>,
    format: CaptureFormat,
    elapsed_secs: u64,
    recorded_at: DateTime<Utc>,
}

impl Clip {
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Bytes::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn format(&self) -> &CaptureFormat {
        &self.format
    }

    pub fn bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());
        for chunk in &self.chunks {
            buf.extend_from_slice(chunk);
        }
        buf.freeze()
    }

    /// `Recording Jul 4, 2024 18:05`, in local time.
    pub fn default_title(&self) -> String {
        format!("Recording {}", self.recorded_at.with_timezone(&Local).format("%b %-d, %Y %H:%M"))
    }

    pub fn file_name(&self) -> String {
        format!("recording-{}.{}", self.recorded_at.timestamp_millis(), self.format.extension)
    }
}

struct Session {
    stop: oneshot::Sender<()>,
    task: JoinHandle<std::result::Result<Vec<Bytes>, CaptureError>>,
    progress: watch::Receiver<CaptureProgress>,
    format: CaptureFormat,
    started_at: DateTime<Utc>,
}

enum Phase {
    Idle,
    RequestingPermission,
    Recording(Session),
    Stopped(Clip),
    Uploading,
}

pub struct Recorder<I> {
    input: I,
    phase: Phase,
    notice: Option<String>,
}

impl<I: AudioInput> Recorder<I> {
    pub fn new(input: I) -> Self {
        Recorder { input, phase: Phase::Idle, notice: None }
    }

    pub fn state(&self) -> RecorderState {
        match self.phase {
            Phase::Idle => RecorderState::Idle,
            Phase::RequestingPermission => RecorderState::RequestingPermission,
            Phase::Recording(_) => RecorderState::Recording,
            Phase::Stopped(_) => RecorderState::StoppedWithClip,
            Phase::Uploading => RecorderState::Uploading,
        }
    }

    /// Last user-facing message, cleared by the next successful action.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn progress(&self) -> Option<watch::Receiver<CaptureProgress>> {
        match &self.phase {
            Phase::Recording(session) => Some(session.progress.clone()),
            _ => None,
        }
    }

    pub fn clip(&self) -> Option<&Clip> {
        match &self.phase {
            Phase::Stopped(clip) => Some(clip),
            _ => None,
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        match self.phase {
            Phase::Idle => {}
            Phase::Stopped(_) => {
                return Err(SyncError::validation("Save or discard the current recording first"))
            }
            _ => return Err(SyncError::validation("A recording is already in progress")),
        }

        self.notice = None;
        self.phase = Phase::RequestingPermission;
        let stream = match self.input.open().await {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(error = %err, "could not open audio input");
                self.phase = Phase::Idle;
                self.notice = Some(err.user_message().to_string());
                return Err(err.into());
            }
        };

        let format = self.input.format();
        let meter = LevelMeter::for_format(format.pcm);
        if meter.is_none() {
            tracing::debug!(mime = %format.mime_type, "level metering unavailable for this input");
        }

        let (progress_tx, progress_rx) = watch::channel(CaptureProgress::default());
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(capture(stream, meter, progress_tx, stop_rx));

        self.phase = Phase::Recording(Session {
            stop: stop_tx,
            task,
            progress: progress_rx,
            format,
            started_at: Utc::now(),
        });
        tracing::info!("recording started");
        Ok(())
    }

    /// Ends capture and releases the input. The take becomes the current clip.
    pub async fn stop(&mut self) -> Result<()> {
        let session = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Recording(session) => session,
            other => {
                self.phase = other;
                return Err(SyncError::validation("Not recording"));
            }
        };
        let Session { stop, task, progress, format, started_at } = session;

        // the input may already have ended by itself, dropping the receiver
        let _ = stop.send(());
        let chunks = match task.await {
            Ok(Ok(chunks)) => chunks,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "recording failed");
                self.notice = Some(err.user_message().to_string());
                return Err(err.into());
            }
            Err(join_err) => {
                let err = CaptureError::Input(io::Error::new(io::ErrorKind::Other, join_err));
                self.notice = Some(err.user_message().to_string());
                return Err(err.into());
            }
        };

        let clip = Clip {
            chunks,
            format,
            elapsed_secs: progress.borrow().elapsed_secs,
            recorded_at: started_at,
        };
        tracing::info!(bytes = clip.len(), secs = clip.elapsed_secs, "recording stopped");
        if clip.is_empty() {
            self.notice = Some(EMPTY_CLIP.to_string());
        }
        self.phase = Phase::Stopped(clip);
        Ok(())
    }

    /// Sends the whole clip in one request. An empty clip never reaches the
    /// store. On failure the clip is kept so the user can try again.
    pub async fn upload<S: MediaStore + ?Sized>(&mut self, store: &S, title: Option<String>) -> Result<Recording> {
        let clip = match mem::replace(&mut self.phase, Phase::Uploading) {
            Phase::Stopped(clip) => clip,
            other => {
                self.phase = other;
                return Err(SyncError::validation("There is no recording to upload"));
            }
        };

        if clip.is_empty() {
            self.notice = Some(EMPTY_CLIP.to_string());
            self.phase = Phase::Stopped(clip);
            return Err(SyncError::validation(EMPTY_CLIP));
        }

        let recording = NewRecording {
            title: title.unwrap_or_else(|| clip.default_title()),
            description: None,
            file_name: clip.file_name(),
            content_type: clip.format.mime_type.clone(),
            content: clip.bytes(),
        };

        match store.upload_recording(&recording).await {
            Ok(stored) => {
                tracing::info!(id = %stored.id, bytes = recording.content.len(), "recording uploaded");
                self.notice = None;
                self.phase = Phase::Idle;
                Ok(stored)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to upload recording");
                self.notice = Some(err.user_message("Failed to upload recording"));
                self.phase = Phase::Stopped(clip);
                Err(err)
            }
        }
    }

    /// Drops the clip without touching the server.
    pub fn discard(&mut self) -> Result<()> {
        match self.phase {
            Phase::Stopped(_) => {
                self.phase = Phase::Idle;
                self.notice = None;
                tracing::info!("recording discarded");
                Ok(())
            }
            _ => Err(SyncError::validation("There is no recording to discard")),
        }
    }
}

async fn capture(
    mut stream: Box<dyn CaptureStream>,
    mut meter: Option<LevelMeter>,
    progress: watch::Sender<CaptureProgress>,
    mut stop: oneshot::Receiver<()>,
) -> std::result::Result<Vec<Bytes>, CaptureError> {
    let mut chunks = Vec::new();
    let mut ticker = interval_at(Instant::now() + TICK, TICK);

    let outcome = loop {
        tokio::select! {
            _ = &mut stop => break Ok(()),
            _ = ticker.tick() => {
                progress.send_modify(|p| p.elapsed_secs += 1);
            }
            chunk = stream.next_chunk() => match chunk {
                Some(Ok(bytes)) => {
                    if bytes.is_empty() {
                        continue;
                    }
                    if let Some(meter) = meter.as_mut() {
                        let level = meter.measure(&bytes);
                        progress.send_modify(|p| p.level = Some(level));
                    }
                    chunks.push(bytes);
                }
                Some(Err(err)) => break Err(CaptureError::Input(err)),
                None => {
                    tracing::debug!("audio input ended");
                    break Ok(());
                }
            },
        }
    };

    stream.release().await;
    outcome.map(|_| chunks)
}
