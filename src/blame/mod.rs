//! Blame pipeline.
//!
//! - `normalize`: canonical author strings
//! - `validate`: line count check between history and working copy
//! - `assembler`: per-file pipeline, emit or skip
//! - `batch`: sequential and parallel drivers over many files
//! - `source`: HistoryAnnotationSource, where per-line history comes from
//! - `sink`: BlameOutputSink, where emitted blame goes

pub mod assembler;
pub mod batch;
pub mod normalize;
pub mod sink;
pub mod source;
pub mod validate;

pub use assembler::{assemble, process, BlameOutcome, Disposition, SkipReason};
pub use batch::{blame_files, blame_files_parallel, BatchReport, FileFailure};
pub use normalize::{normalize, normalize_author};
pub use sink::{BlameOutputSink, CollectingSink};
pub use source::HistoryAnnotationSource;
pub use validate::{validate, Validation};
