//! Audio inputs the recorder can capture from.

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};

const READ_BUFFER: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("no audio input available: {0}")]
    DeviceUnavailable(String),

    #[error("audio input failed: {0}")]
    Input(#[from] io::Error),
}

impl CaptureError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CaptureError::PermissionDenied(_) | CaptureError::DeviceUnavailable(_) => {
                "Failed to access microphone. Please check permissions."
            }
            CaptureError::Input(_) => "Recording stopped unexpectedly.",
        }
    }
}

/// Sample layout of raw PCM data, when the input produces any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcmFormat {
    S16Le,
}

/// What the captured bytes are, for naming the upload and for metering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFormat {
    pub mime_type: String,
    pub extension: String,
    pub pcm: Option<PcmFormat>,
}

impl CaptureFormat {
    pub fn wav() -> Self {
        CaptureFormat {
            mime_type: "audio/wav".to_string(),
            extension: "wav".to_string(),
            pcm: Some(PcmFormat::S16Le),
        }
    }

    pub fn webm() -> Self {
        CaptureFormat {
            mime_type: "audio/webm".to_string(),
            extension: "webm".to_string(),
            pcm: None,
        }
    }
}

#[async_trait]
pub trait AudioInput: Send + Sync {
    /// Acquires the device. Fails when access is denied or nothing is there.
    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError>;

    fn format(&self) -> CaptureFormat;
}

/// An acquired input. `next_chunk` must be cancel safe: the recorder polls it
/// alongside its ticker and may drop a pending call.
#[async_trait]
pub trait CaptureStream: Send {
    /// Next encoded chunk, or `None` once the input has ended.
    async fn next_chunk(&mut self) -> Option<io::Result<Bytes>>;

    /// Gives the device back. Called exactly once when capture ends.
    async fn release(&mut self);
}

/// Captures by running an external program that writes audio to stdout,
/// `arecord` by default.
pub struct CommandInput {
    program: String,
    args: Vec<String>,
    format: CaptureFormat,
}

impl CommandInput {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandInput { program: program.into(), args, format: CaptureFormat::wav() }
    }

    /// Builds from a whitespace-split command line such as `arecord -f cd -t wav`.
    pub fn from_command_line(parts: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn with_format(mut self, format: CaptureFormat) -> Self {
        self.format = format;
        self
    }
}

#[async_trait]
impl AudioInput for CommandInput {
    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => {
                    CaptureError::DeviceUnavailable(format!("{} is not installed", self.program))
                }
                io::ErrorKind::PermissionDenied => CaptureError::PermissionDenied(err.to_string()),
                _ => CaptureError::Input(err),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            CaptureError::DeviceUnavailable(format!("{} produced no output stream", self.program))
        })?;
        tracing::debug!(program = %self.program, pid = ?child.id(), "capture process started");

        Ok(Box::new(ProcessStream { child, stdout, buf: vec![0; READ_BUFFER] }))
    }

    fn format(&self) -> CaptureFormat {
        self.format.clone()
    }
}

struct ProcessStream {
    child: Child,
    stdout: ChildStdout,
    buf: Vec<u8>,
}

#[async_trait]
impl CaptureStream for ProcessStream {
    async fn next_chunk(&mut self) -> Option<io::Result<Bytes>> {
        match self.stdout.read(&mut self.buf).await {
            Ok(0) => None,
            Ok(n) => Some(Ok(Bytes::copy_from_slice(&self.buf[..n]))),
            Err(err) => Some(Err(err)),
        }
    }

    async fn release(&mut self) {
        if let Err(err) = self.child.kill().await {
            // already exited on its own
            tracing::debug!(error = %err, "capture process kill failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn command_line_needs_a_program() {
        assert!(CommandInput::from_command_line(&[]).is_none());
        let input = CommandInput::from_command_line(&["arecord".to_string(), "-q".to_string()]).unwrap();
        assert_eq!(input.program, "arecord");
        assert_eq!(input.args, vec!["-q"]);
        assert_eq!(input.format(), CaptureFormat::wav());
    }

    #[tokio::test]
    async fn missing_program_means_no_device() {
        let input = CommandInput::new("famsync-no-such-recorder", vec![]);
        let err = input.open().await.err().unwrap();
        assert_matches!(err, CaptureError::DeviceUnavailable(_));
    }
}
