//! Data types flowing through the blame pipeline.
//!
//! - `request`: FileBlameRequest, built per file by the caller
//! - `blame`: RawAnnotationRecord from history, BlameLine and FileBlame for output

pub mod blame;
pub mod request;

pub use blame::*;
pub use request::*;
