use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Batch response contained no items")]
    EmptyBatch,

    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),

    #[error("Invalid MIME type: {0}")]
    InvalidMime(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Status code of a non-success response, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
