// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised at the I/O and configuration boundary.
///
/// Expected pipeline outcomes (an unchordable word, a collision with no free
/// subset) are never errors; they are recorded as rejections instead.
#[derive(Error, Debug)]
pub enum ChordError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("invalid finger table: {0}")]
    InvalidFingerMap(String),

    #[error("invalid chord map: {0}")]
    InvalidChordMap(String),
}

impl ChordError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChordError::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ChordError::Json { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, ChordError>;
