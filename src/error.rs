//! Error types for the clock.
//!
//! Only failures that stop the clock from starting are errors. Malformed
//! section data (missing fields, bad times, unknown colors) is tolerated and
//! shows up as a degraded dial instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for clock operations.
pub type Result<T, E = ClockError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClockError {
    #[error("failed to read section document {path}")]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("event loop error")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),

    #[error("pixel buffer error")]
    Pixels(#[from] pixels::Error),

    #[error("failed to encode snapshot")]
    Snapshot(#[from] image::ImageError),
}

impl ClockError {
    pub fn document(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Document {
            path: path.into(),
            source,
        }
    }
}
