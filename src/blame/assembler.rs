//! Per-file blame pipeline.
//!
//! For one request: ask the history source for line annotations, check that
//! they line up with the working copy, normalize the authors and hand the
//! complete list to the sink. A file is either emitted in full or skipped;
//! only a failing history query is an error.

use std::fmt;

use tracing::debug;

use crate::blame::normalize::normalize_author;
use crate::blame::sink::BlameOutputSink;
use crate::blame::source::HistoryAnnotationSource;
use crate::blame::validate::{validate, Validation};
use crate::error::{AnnotateError, BlameError, Result};
use crate::models::{BlameLine, FileBlameRequest, RawAnnotationRecord};

/// Why a file produced no blame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotVersionControlled,
    PathCaseMismatch { tracked: String },
    LineCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotVersionControlled => write!(f, "not under version control"),
            SkipReason::PathCaseMismatch { tracked } => {
                write!(f, "tracked under a different case as {}", tracked)
            }
            SkipReason::LineCountMismatch { expected, actual } => write!(
                f,
                "working copy has {} line(s), history has {}",
                expected, actual
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlameOutcome {
    Emit(Vec<BlameLine>),
    Skip(SkipReason),
}

/// What `process` did with a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Emitted { lines: usize },
    Skipped(SkipReason),
}

/// Run the pipeline for one file without touching any sink.
pub fn assemble<S>(request: &FileBlameRequest, source: &S) -> Result<BlameOutcome>
where
    S: HistoryAnnotationSource + ?Sized,
{
    let records = match source.annotate(&request.path) {
        Ok(records) => records,
        Err(AnnotateError::NotVersionControlled(_)) => {
            return Ok(skip(request, SkipReason::NotVersionControlled));
        }
        Err(AnnotateError::PathCaseMismatch { tracked, .. }) => {
            return Ok(skip(request, SkipReason::PathCaseMismatch { tracked }));
        }
        Err(AnnotateError::QueryFailed(message)) => {
            return Err(BlameError::Query {
                path: request.path.clone(),
                message,
            });
        }
    };

    match validate(request.expected_line_count, &records) {
        Validation::Trusted => Ok(BlameOutcome::Emit(to_blame_lines(records))),
        Validation::Untrusted { expected, actual } => Ok(skip(
            request,
            SkipReason::LineCountMismatch { expected, actual },
        )),
    }
}

/// Run the pipeline for one file and emit its blame if it can be trusted.
pub fn process<S, K>(request: &FileBlameRequest, source: &S, sink: &mut K) -> Result<Disposition>
where
    S: HistoryAnnotationSource + ?Sized,
    K: BlameOutputSink + ?Sized,
{
    let outcome = assemble(request, source)?;
    Ok(dispatch(request, outcome, sink))
}

pub(crate) fn dispatch<K>(request: &FileBlameRequest, outcome: BlameOutcome, sink: &mut K) -> Disposition
where
    K: BlameOutputSink + ?Sized,
{
    match outcome {
        BlameOutcome::Emit(lines) => {
            let count = lines.len();
            sink.emit(request, lines);
            Disposition::Emitted { lines: count }
        }
        BlameOutcome::Skip(reason) => Disposition::Skipped(reason),
    }
}

fn skip(request: &FileBlameRequest, reason: SkipReason) -> BlameOutcome {
    debug!(path = %request.path, %reason, "Skipping blame");
    BlameOutcome::Skip(reason)
}

fn to_blame_lines(records: Vec<RawAnnotationRecord>) -> Vec<BlameLine> {
    records
        .into_iter()
        .map(|record| BlameLine {
            author: normalize_author(record.raw_author.as_deref()),
            revision_id: record.revision_id,
            commit_timestamp: record.commit_timestamp,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;

    struct FakeSource(HashMap<String, std::result::Result<Vec<RawAnnotationRecord>, AnnotateError>>);

    impl HistoryAnnotationSource for FakeSource {
        fn annotate(&self, path: &str) -> std::result::Result<Vec<RawAnnotationRecord>, AnnotateError> {
            self.0
                .get(path)
                .cloned()
                .unwrap_or_else(|| Err(AnnotateError::NotVersionControlled(path.to_string())))
        }
    }

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 3, 1, 12, 0, 0).unwrap()
    }

    fn source_with(path: &str, records: Vec<RawAnnotationRecord>) -> FakeSource {
        FakeSource(HashMap::from([(path.to_string(), Ok(records))]))
    }

    #[test]
    fn emits_normalized_lines() {
        let source = source_with(
            "Foo.java",
            vec![
                RawAnnotationRecord::new("2", when(), Some("Dgageot".to_string())),
                RawAnnotationRecord::new("6", when(), Some("henry.ju@example.com".to_string())),
                RawAnnotationRecord::new("2", when(), None),
            ],
        );

        let outcome = assemble(&FileBlameRequest::new("Foo.java", 3), &source).unwrap();
        let BlameOutcome::Emit(lines) = outcome else {
            panic!("expected emission, got {:?}", outcome);
        };

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].author.as_deref(), Some("dgageot"));
        assert_eq!(lines[1].author.as_deref(), Some("henry ju"));
        assert_eq!(lines[1].revision_id, "6");
        assert_eq!(lines[2].author, None);
        assert_eq!(lines[2].commit_timestamp, when());
    }

    #[test]
    fn skips_on_line_count_mismatch() {
        let source = source_with(
            "Foo.java",
            vec![RawAnnotationRecord::new("2", when(), Some("dgageot".to_string()))],
        );

        let mut emitted = 0;
        let mut sink = |_: &FileBlameRequest, _: Vec<BlameLine>| emitted += 1;
        let disposition = process(&FileBlameRequest::new("Foo.java", 2), &source, &mut sink).unwrap();

        assert_eq!(
            disposition,
            Disposition::Skipped(SkipReason::LineCountMismatch { expected: 2, actual: 1 })
        );
        assert_eq!(emitted, 0);
    }

    #[test]
    fn skips_case_mismatch() {
        let source = FakeSource(HashMap::from([(
            "foo.java".to_string(),
            Err(AnnotateError::PathCaseMismatch {
                requested: "foo.java".to_string(),
                tracked: "Foo.java".to_string(),
            }),
        )]));

        let outcome = assemble(&FileBlameRequest::new("foo.java", 1), &source).unwrap();
        assert_eq!(
            outcome,
            BlameOutcome::Skip(SkipReason::PathCaseMismatch { tracked: "Foo.java".to_string() })
        );
    }

    #[test]
    fn propagates_query_failure() {
        let source = FakeSource(HashMap::from([(
            "Foo.java".to_string(),
            Err(AnnotateError::QueryFailed("corrupt object".to_string())),
        )]));

        let err = assemble(&FileBlameRequest::new("Foo.java", 1), &source).unwrap_err();
        assert!(matches!(err, BlameError::Query { ref path, .. } if path == "Foo.java"));
        assert!(err.to_string().contains("corrupt object"));
    }
}
