use ruskvader_core::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The device could not be opened; the start transition was aborted.
    #[error("failed to start capture: {0}")]
    Open(WireError),

    /// The capture loop exited with a fatal read error.
    #[error("capture failed: {0}")]
    Capture(WireError),

    #[error("capture task failed: {0}")]
    Join(String),
}
