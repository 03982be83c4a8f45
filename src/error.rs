use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;

/// Failure to obtain the raw video list from a source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend answered {0}")]
    Status(StatusCode),

    #[error("cannot list videos under {0}")]
    Base(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed video list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A fetched batch that decoded but does not hold a usable video list.
#[derive(Debug, thiserror::Error)]
#[error("record #{index}: {reason}")]
pub struct ValidationError {
    pub index: usize,
    pub reason: String,
}

impl ValidationError {
    pub fn new(index: usize, reason: impl Into<String>) -> ValidationError {
        ValidationError {
            index,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid video list, {0}")]
    Validation(#[from] ValidationError),

    #[error("unknown sort key {0:?} (expected name, size or date)")]
    SortKey(String),

    #[error("invalid base url: {0}")]
    BaseUrl(String),

    #[error("config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("cannot launch browser: {0}")]
    Open(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
