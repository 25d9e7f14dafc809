use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, QueueableCommand};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Overwrites the current terminal line with `msg`, leaving the cursor where
/// it was so the next call replaces it again.
pub fn rewrite_message<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    out.queue(cursor::SavePosition)?;
    out.queue(Clear(ClearType::UntilNewLine))?;
    out.write_all(msg.as_bytes())?;
    out.queue(cursor::RestorePosition)?;
    out.flush()
}

/// `m:ss`, as shown next to a running recording.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Renders a 0..=1 level as a fixed-width bar.
pub fn level_bar(level: f32, width: usize) -> String {
    let filled = ((level.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "·".repeat(width - filled))
}

/// Gate in front of destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Accepts everything; backs `--yes`.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Asks on stdout and reads a `y`/`yes` answer from stdin. Anything else,
/// including EOF, declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

/// Tells a running recording when to stop.
#[async_trait]
pub trait StopSignal: Send + Sync {
    async fn wait(&self);
}

/// Stops on Enter. A closed stdin stops at once.
pub struct EnterKey;

#[async_trait]
impl StopSignal for EnterKey {
    async fn wait(&self) {
        let mut line = String::new();
        if let Err(err) = BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            tracing::debug!(error = %err, "could not read from stdin");
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
