//! Error types for the publish pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline error type.
///
/// Every variant except `Io` is a configuration problem and is raised
/// before any filesystem mutation; recoverable per-entry conditions are
/// recorded in the run report instead of surfacing here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No scan roots configured")]
    NoScanRoots,

    #[error("Scan root is not an absolute path: {0}")]
    RelativeScanRoot(PathBuf),

    #[error("Invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("Pattern '{0}' has no capture group")]
    MissingCaptureGroup(String),

    #[error("Invalid prune glob '{pattern}': {message}")]
    InvalidPruneGlob { pattern: String, message: String },

    #[error("Unrecognized display mode: {0}")]
    UnknownDisplayMode(String),

    #[error(
        "Refusing to publish into '{0}': expected an absolute <public-root>/<project>/links path"
    )]
    UnsafeLinkDir(PathBuf),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PipelineError>;
