use crate::error::AnnotateError;
use crate::models::RawAnnotationRecord;

/// Something that can report, for a path, which revision last touched each
/// of its lines.
///
/// Records must come back in physical line order. Paths without history
/// report `NotVersionControlled`, paths only known under a different case
/// report `PathCaseMismatch`; everything else is `QueryFailed`.
pub trait HistoryAnnotationSource {
    fn annotate(&self, path: &str) -> Result<Vec<RawAnnotationRecord>, AnnotateError>;
}

impl<T: HistoryAnnotationSource + ?Sized> HistoryAnnotationSource for &T {
    fn annotate(&self, path: &str) -> Result<Vec<RawAnnotationRecord>, AnnotateError> {
        (**self).annotate(path)
    }
}

impl<T: HistoryAnnotationSource + ?Sized> HistoryAnnotationSource for Box<T> {
    fn annotate(&self, path: &str) -> Result<Vec<RawAnnotationRecord>, AnnotateError> {
        (**self).annotate(path)
    }
}
