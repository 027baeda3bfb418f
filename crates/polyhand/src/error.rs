use std::path::PathBuf;
use thiserror::Error;
use tracking::TrackingError;

#[derive(Debug, Error)]
pub enum PolyHandError {
    #[error("invalid cross-section configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    #[error("invalid hand config at {path:?}: {source}")]
    Config {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PolyHandError>;
