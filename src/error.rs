//! Error types for history queries and blame processing.
//!
//! - `AnnotateError`: what a history-annotation source reports for one path.
//!   `NotVersionControlled` and `PathCaseMismatch` are expected conditions and
//!   turn into skips; only `QueryFailed` reaches callers as an error.
//! - `BlameError`: failures surfaced by this crate, per file or when opening
//!   a repository.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotateError {
    #[error("Not under version control: {0}")]
    NotVersionControlled(String),

    #[error("Path case mismatch: requested {requested}, tracked as {tracked}")]
    PathCaseMismatch { requested: String, tracked: String },

    #[error("Annotation query failed: {0}")]
    QueryFailed(String),
}

impl From<git2::Error> for AnnotateError {
    fn from(e: git2::Error) -> Self {
        AnnotateError::QueryFailed(e.message().to_string())
    }
}

#[derive(Error, Debug)]
pub enum BlameError {
    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Blame of {path} failed: {message}")]
    Query { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, BlameError>;
