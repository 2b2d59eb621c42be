//! Error types shared across the shell

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the file-backed preference store
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to read preferences from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed preferences file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while configuring the audio session
#[derive(Debug, Error)]
pub enum AudioSessionError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("unsupported output sample format: {0}")]
    UnsupportedFormat(String),

    #[error("audio backend error: {0}")]
    Backend(String),
}
