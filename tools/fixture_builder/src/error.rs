use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems in the manifest itself. Detected before anything is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: size must be greater than zero")]
    ZeroSize { line: usize },

    #[error("line {line}: invalid path '{path}': {reason}")]
    InvalidPath { line: usize, path: String, reason: &'static str },

    #[error("line {line}: '{path}' already listed on line {first_line}")]
    DuplicateDestination { path: String, first_line: usize, line: usize },

    /// The entry would replace, or block the directory of, a staged companion.
    #[error("line {line}: '{path}' collides with the staged boot file '{staged}'")]
    ReservedDestination { path: String, staged: &'static str, line: usize },
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("{0}")]
    Usage(String),

    #[error("destination {0} is the system volume")]
    ForbiddenTarget(String),

    #[error("could not access destination {}", .0.display())]
    TargetUnavailable(PathBuf),

    #[error("'{}' must exist in the source directory", .0.display())]
    MissingPrerequisite(PathBuf),

    #[error("can't read manifest '{}': {source}", .path.display())]
    ManifestRead { path: PathBuf, source: io::Error },

    #[error("manifest: {0}")]
    Manifest(#[from] ManifestError),

    #[error("can't create subdirectories for '{path}': {source}")]
    DirectoryCreate { path: String, source: io::Error },

    #[error("can't create '{path}': {source}")]
    FileCreate { path: String, source: io::Error },

    #[error("can't write '{path}': {source}")]
    Write { path: String, source: io::Error },

    #[error("can't write '{path}': wrote {written} of {expected} bytes")]
    ShortWrite { path: String, expected: usize, written: usize },

    #[error("can't close '{path}': {source}")]
    Close { path: String, source: io::Error },

    #[error("can't copy '{}' to '{to}': {source}", .from.display())]
    Copy { from: PathBuf, to: String, source: io::Error },

    #[error("image '{}': {source}", .path.display())]
    Image { path: PathBuf, source: io::Error },
}
