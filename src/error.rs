// File: src/error.rs
use std::path::PathBuf;

/// Result type used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported locale {0}")]
    UnsupportedLocale(String),

    #[error("unsupported phonemic system {system} for locale {locale}")]
    UnsupportedSystem { locale: String, system: String },

    /// The dataset could not be opened or read.
    #[error("unable to read phonemic dataset {}: {source}", path.display())]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dataset row did not have the `word<TAB>transcription` shape.
    #[error("malformed row {line} in phonemic dataset {}: {reason}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        reason: &'static str,
    },

    /// No candidate width was found for a reachable prefix length.
    #[error("segmentation invariant violated at position {position} of {len}")]
    SegmentationInvariant { position: usize, len: usize },

    #[error("{0}")]
    Config(String),

    #[error("unable to read deck file {}: {source}", path.display())]
    DeckRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse deck file {}: {source}", path.display())]
    DeckFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to find field {0}")]
    MissingField(String),

    #[error("note {0} not found in deck")]
    NoteNotFound(i64),

    #[error("image lookup failed: {0}")]
    ImageLookup(String),

    #[error("lexicon cache was built for {cached}, expected {expected}")]
    CacheMismatch { cached: String, expected: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cache(#[from] bincode::Error),
}
