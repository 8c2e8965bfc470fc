use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{method} {url} failed: {status} {body}")]
    Http {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} decode failed: {message}")]
    Decode { url: String, message: String },

    #[error("failed to load {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    #[error("unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("a preprocessed document is already named {0}")]
    NameTaken(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("empty response from {0}")]
    EmptyResponse(&'static str),
}

impl Error {
    /// True when a remote resource (usually a Qdrant collection) does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Http { status: 404, .. })
    }
}
