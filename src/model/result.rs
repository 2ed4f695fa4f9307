use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("GITHUB_TOKEN is not set (pass --token or add it to .env)")]
    MissingToken,

    #[error("GITHUB_TOKEN contains characters not allowed in a header")]
    InvalidToken,

    #[error("Not a valid repository `{0}`, expected `owner/repo`")]
    InvalidRepository(String),

    #[error("Not a valid date: {0}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Either --repo or --input is required")]
    MissingIssueSource,

    #[error("Every event source failed for {0}")]
    NoEventSources(String),

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Upstream returned {status} for {url}: {body}")]
    Upstream {
        url: String,
        status: u16,
        body: ErrorBody,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not found `const data = [...]` block in {}", .0.display())]
    MarkerNotFound(PathBuf),

    #[error("Failed to render report: {0}")]
    Render(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}

/// Body of a failed upstream response: JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Text(String),
}

impl ErrorBody {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => Self::Json(value),
            Err(_) if raw.is_empty() => Self::Text("No detailed response body.".to_string()),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Json(value) => write!(f, "{}", value),
            ErrorBody::Text(text) => write!(f, "{}", text),
        }
    }
}
