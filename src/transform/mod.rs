//! Content transforms applied between reading a file and writing it
//! into the artifact.

pub mod comments;
pub mod notebook;
pub mod pdf;
pub mod program;
