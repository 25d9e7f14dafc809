//! Runtime configuration, read from the environment (and `.env` if present).
//!
//! | Variable               | Default                   | Description                                  |
//! |------------------------|---------------------------|----------------------------------------------|
//! | `FAMSYNC_API_URL`      | `http://localhost:8000`   | Base URL of the family media API             |
//! | `FAMSYNC_TOKEN`        | --                        | Bearer token sent with every request         |
//! | `FAMSYNC_TIMEOUT_SECS` | --                        | Per-request timeout; unset means none        |
//! | `FAMSYNC_RECORD_CMD`   | `arecord -q -f cd -t wav` | Capture command writing WAV audio to stdout  |
//! | `FAMSYNC_UNSENT_DIR`   | `.`                       | Where recordings that failed to upload go    |

use std::path::PathBuf;
use std::time::Duration;

use crate::sync_error::{Result, SyncError};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_RECORD_CMD: &str = "arecord -q -f cd -t wav";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
    pub record_command: Vec<String>,
    pub unsent_dir: PathBuf,
}

impl Config {
    /// Reads the process environment. `.env` is loaded by `main` before this.
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_empty("FAMSYNC_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(SyncError::Config(format!("FAMSYNC_API_URL must be an http(s) URL, got {}", api_url)));
        }

        let timeout = match non_empty("FAMSYNC_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    SyncError::Config(format!("FAMSYNC_TIMEOUT_SECS must be a whole number of seconds, got {}", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let record_command: Vec<String> = non_empty("FAMSYNC_RECORD_CMD")
            .unwrap_or_else(|| DEFAULT_RECORD_CMD.to_string())
            .split_whitespace()
            .map(String::from)
            .collect();

        Ok(Config {
            api_url,
            token: non_empty("FAMSYNC_TOKEN"),
            timeout,
            record_command,
            unsent_dir: non_empty("FAMSYNC_UNSENT_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.token.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.record_command, vec!["arecord", "-q", "-f", "cd", "-t", "wav"]);
        assert_eq!(config.unsent_dir, PathBuf::from("."));
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let config = Config::from_lookup(lookup(&[
            ("FAMSYNC_API_URL", "https://family.example/"),
            ("FAMSYNC_TOKEN", "abc"),
            ("FAMSYNC_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://family.example");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("FAMSYNC_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FAMSYNC_API_URL", "localhost:8000")])).is_err());
    }
}
