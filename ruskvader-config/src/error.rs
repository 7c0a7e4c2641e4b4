//! Error types for preset persistence.

use thiserror::Error;

/// Unified preset load/save error.
///
/// Surfaced once to the user; the live configuration is never partially
/// updated on failure.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("preset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed preset: {0}")]
    Malformed(#[from] serde_json::Error),
}
