use crate::model::SessionId;
use thiserror::Error;

/// Errors surfaced to the user through the single error banner.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request failed or returned a non-success status. Shown verbatim.
    #[error("Network error: {0}")]
    Network(String),

    /// The response lacked a required per-algorithm field.
    #[error("Malformed result: {0}")]
    MalformedResult(String),

    /// History could not be read or written; history continues in memory.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Session {0} is already in history")]
    DuplicateSession(SessionId),
}

impl ClientError {
    /// Text for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(message) => message.clone(),
            ClientError::MalformedResult(_) => {
                "The server response could not be processed.".to_string()
            }
            ClientError::StorageUnavailable(_) => {
                "History could not be saved; it will be kept for this session only.".to_string()
            }
            ClientError::DuplicateSession(id) => format!("Session {} is already in history.", id),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<StorageError> for ClientError {
    fn from(error: StorageError) -> Self {
        ClientError::StorageUnavailable(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_message_is_shown_verbatim() {
        let error = ClientError::Network("Textul este gol".into());
        assert_eq!(error.user_message(), "Textul este gol");
    }

    #[test]
    fn malformed_result_is_generic() {
        let error = ClientError::MalformedResult("svm result lacks confidence".into());
        assert!(!error.user_message().contains("svm"));
    }

    #[test]
    fn storage_error_converts_to_unavailable() {
        let error: ClientError = StorageError::Write("quota exceeded".into()).into();
        assert!(matches!(error, ClientError::StorageUnavailable(ref m) if m.contains("quota")));
    }
}
