//! Line count validation.
//!
//! History annotations describe the last committed content. They can only be
//! aligned with the working copy when both have the same number of lines;
//! anything else (local edits, unresolved lines, empty files) is untrusted.

use crate::models::RawAnnotationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Trusted,
    Untrusted { expected: usize, actual: usize },
}

pub fn validate(expected_line_count: usize, records: &[RawAnnotationRecord]) -> Validation {
    if expected_line_count > 0 && records.len() == expected_line_count {
        Validation::Trusted
    } else {
        Validation::Untrusted {
            expected: expected_line_count,
            actual: records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn records(n: usize) -> Vec<RawAnnotationRecord> {
        let when = Utc.with_ymd_and_hms(2014, 3, 1, 12, 0, 0).unwrap();
        (0..n)
            .map(|_| RawAnnotationRecord::new("2", when, Some("dgageot".to_string())))
            .collect()
    }

    #[test]
    fn trusts_matching_count() {
        assert_eq!(validate(3, &records(3)), Validation::Trusted);
    }

    #[test]
    fn rejects_local_edits() {
        assert_eq!(
            validate(4, &records(3)),
            Validation::Untrusted { expected: 4, actual: 3 }
        );
        assert_eq!(
            validate(2, &records(3)),
            Validation::Untrusted { expected: 2, actual: 3 }
        );
    }

    #[test]
    fn rejects_empty_file() {
        assert_eq!(
            validate(0, &records(0)),
            Validation::Untrusted { expected: 0, actual: 0 }
        );
    }
}
