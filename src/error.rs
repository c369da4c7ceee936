//! Error types for the build and validation pipeline

use thiserror::Error;

/// Result type alias for build and validation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or validating the artifact
#[derive(Error, Debug)]
pub enum Error {
    /// The content model is malformed; raised at construction, before any rendering
    #[error("Invalid content model: {0}")]
    Validation(String),

    /// A referenced asset has no backing file; fatal at build, never retried
    #[error("Missing asset `{logical_name}` (expected source for {public_path})")]
    MissingAsset {
        logical_name: String,
        public_path: String,
    },

    /// Rendering failed (unresolvable asset reference or bad output path)
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Navigation or subresource fetch failed in the live backend
    #[error("Failed to load: {0}")]
    Load(String),

    /// A DOM query used an unparsable selector
    #[error("Invalid selector: {0}")]
    Query(String),

    /// Navigation did not settle within the configured bound
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Filesystem error while writing or reading the output directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
