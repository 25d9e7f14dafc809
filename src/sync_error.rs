use crate::recorder::CaptureError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The server could not be reached or the connection broke mid-request.
    #[error("network error: {0}")]
    Network(String),

    /// A required field was missing; raised before any request is sent.
    #[error("{0}")]
    Validation(String),

    #[error("server rejected request ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("unexpected response payload: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else {
            SyncError::Network(err.to_string())
        }
    }
}

impl SyncError {
    pub fn validation(msg: impl Into<String>) -> Self {
        SyncError::Validation(msg.into())
    }

    /// Message suitable for showing to the user. Server `detail` strings and
    /// validation messages are shown as-is, everything else gets `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SyncError::Api { detail, .. } if !detail.is_empty() => detail.clone(),
            SyncError::Validation(msg) => msg.clone(),
            SyncError::Capture(err) => err.user_message().to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, SyncError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_detail() {
        let err = SyncError::Api { status: 400, detail: "Title is required".into() };
        assert_eq!(err.user_message("Failed to save vignette"), "Title is required");
    }

    #[test]
    fn user_message_falls_back_for_transport_errors() {
        let err = SyncError::Network("connection refused".into());
        assert_eq!(err.user_message("Failed to save vignette"), "Failed to save vignette");

        let empty = SyncError::Api { status: 500, detail: String::new() };
        assert_eq!(empty.user_message("Failed to delete photo"), "Failed to delete photo");
    }
}
