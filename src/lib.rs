//! Per-line blame with working-copy validation.
//!
//! For every requested file, history is asked which revision last touched
//! each line. The answer is only trusted when it has exactly as many lines as
//! the file currently has on disk; otherwise the file is skipped. Trusted
//! answers are emitted with authors normalized by [`blame::normalize`].
//!
//! [`git::GitAnnotationSource`] provides history from a local Git
//! repository; any other backend can implement
//! [`blame::HistoryAnnotationSource`].

pub mod blame;
pub mod config;
pub mod error;
pub mod git;
pub mod models;

pub use error::{AnnotateError, BlameError, Result};
