//! Error types for full-page capture

use crate::tiler::Rect;
use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while measuring, capturing or stitching a page
#[derive(Error, Debug)]
pub enum Error {
    /// The browser session is gone or stopped answering
    #[error("Browser driver unavailable: {0}")]
    DriverUnavailable(String),

    /// A captured viewport raster could not be decoded
    #[error("Failed to decode tile {index} at {rect:?}: {source}")]
    TileDecode {
        index: usize,
        rect: Rect,
        #[source]
        source: image::ImageError,
    },

    /// A page script returned a value of an unexpected shape
    #[error("Script returned an unexpected value: {0}")]
    ScriptError(String),

    /// Measured geometry cannot be tiled or composited
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Failed to encode the composited canvas
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error while saving output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::DriverUnavailable(format!("{:#}", err))
    }
}

#[cfg(all(test, feature = "cdp"))]
mod tests {
    use super::*;
    use anyhow::Context;

    fn failing_call() -> anyhow::Result<()> {
        Err(anyhow::anyhow!("connection reset")).context("Screenshot failed")
    }

    #[test]
    fn browser_errors_keep_their_context() {
        let run = || -> Result<()> {
            failing_call()?;
            Ok(())
        };
        match run() {
            Err(Error::DriverUnavailable(msg)) => assert_eq!(msg, "Screenshot failed: connection reset"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
