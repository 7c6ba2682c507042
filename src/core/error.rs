//! Error types for the packing pipeline
//!
//! `PackError` covers run-fatal conditions; per-file recoverable failures are
//! handled (logged and skipped) at the traversal boundary and never surface
//! through this type.

use thiserror::Error;

pub type Result<T, E = PackError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PackError {
    #[error("unknown language tag: {0}")]
    UnknownTag(String),

    #[error("invalid exclude pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to download the repository from {url}: status code {status}")]
    Fetch { url: String, status: u16 },

    #[error("download error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("notebook conversion failed: {0}")]
    Notebook(String),

    #[error("comment stripping failed: {0}")]
    CommentStrip(String),

    #[error("input not recognized as a repository URL, a .zip file, or a folder")]
    InputNotRecognized,
}
