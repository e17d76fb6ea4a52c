//! Error types for genfs
//!
//! Three kinds of failure cross the open/read boundary:
//! - Errors returned by a generator callback, passed through unchanged
//! - Invalid arguments (bad seek target, serving generator opened at its root)
//! - Limit violations reported by the owning filesystem's [`GenLimits`](crate::GenLimits)
//!
//! Reading past the end of a file is not an error: handles report it as a
//! zero-length read.

use crate::limits::LimitExceeded;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using genfs's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// genfs error types.
#[derive(Error, Debug)]
pub enum Error {
    /// An operation received an argument outside its valid range.
    #[error("{op} {}: invalid argument", .path.display())]
    Invalid { op: &'static str, path: PathBuf },

    /// No generator is mounted for the path.
    #[error("open {}: file does not exist", .0.display())]
    NotFound(PathBuf),

    /// Generation failed with a message from the callback.
    #[error("generate error: {0}")]
    Generate(String),

    /// I/O error raised inside a callback.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource limit exceeded.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(#[from] LimitExceeded),

    /// Any other error raised inside a callback.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid-argument error for `op` on `path`.
    pub fn invalid(op: &'static str, path: impl AsRef<Path>) -> Self {
        Self::Invalid {
            op,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a generation error from a message.
    pub fn generate(message: impl Into<String>) -> Self {
        Self::Generate(message.into())
    }

    /// Whether this is an invalid-argument failure.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(err) => err,
            Error::Invalid { .. } => std::io::Error::new(ErrorKind::InvalidInput, err),
            Error::NotFound(_) => std::io::Error::new(ErrorKind::NotFound, err),
            other => std::io::Error::other(other),
        }
    }
}
