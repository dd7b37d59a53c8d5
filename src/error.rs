use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("invalid book id: {0:?}")]
    InvalidBookId(String),

    #[error("malformed book info: {0}")]
    Metadata(#[source] serde_json::Error),

    #[error("malformed favorites list: {0}")]
    Favorites(#[source] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("data directory {} could not be created: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
