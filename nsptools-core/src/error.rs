use std::path::PathBuf;

use thiserror::Error;

use crate::MIB;

#[derive(Error, Debug)]
pub enum NspError {
    #[error("file {} could not be found", .0.display())]
    FileNotFound(PathBuf),

    #[error(
        "file {} is smaller than the required size of {} MiB (actual size: {} MiB)",
        .path.display(), .min / MIB, .size / MIB
    )]
    FileTooSmall { path: PathBuf, size: u64, min: u64 },

    #[error("not a valid directory: {}", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("no valid part files found in {}", .0.display())]
    NoPartsFound(PathBuf),

    #[error("unexpected part file name format: {0}")]
    NamingFormat(String),

    #[error("part index {index} is claimed by both {first} and {second}")]
    DuplicatePartIndex {
        index: u64,
        first: String,
        second: String,
    },

    #[error("{} already holds {count} part file(s) from a previous run", .dir.display())]
    StaleParts { dir: PathBuf, count: usize },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<walkdir::Error> for NspError {
    fn from(e: walkdir::Error) -> Self {
        NspError::Io(e.into())
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, NspError>;
