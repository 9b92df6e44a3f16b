//! Error taxonomy for resource pack extraction.
//!
//! Every failure aborts the whole extraction; there is no per-entry retry
//! and no cleanup of a partially populated destination directory.

use std::path::PathBuf;

use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input path does not point at an existing file. Reported before
    /// any filesystem side effect.
    #[error("archive \"{}\" does not exist", .0.display())]
    InvalidInput(PathBuf),

    /// The archive could not be opened or is not a valid ZIP container.
    #[error("couldn't open archive: {0}")]
    ArchiveOpen(String),

    /// Enumeration or an entry read failed mid-stream (truncated central
    /// directory, corrupt entry, unsupported compression method).
    #[error("failed to read archive: {reason}")]
    ArchiveRead { reason: String },

    /// A destination write failed (permissions, disk full, path length).
    /// A truncated file may be left at the target path.
    #[error("failed to write \"{}\": {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn open(err: impl std::fmt::Display) -> Self {
        ExtractError::ArchiveOpen(err.to_string())
    }

    pub(crate) fn read(err: impl std::fmt::Display) -> Self {
        ExtractError::ArchiveRead {
            reason: err.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Write {
            path: path.into(),
            source,
        }
    }
}
