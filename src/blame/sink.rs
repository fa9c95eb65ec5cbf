//! Output sinks for emitted blame.

use crate::models::{BlameLine, FileBlame, FileBlameRequest};

/// Receives the complete blame of a file. Called at most once per file and
/// only with a list whose length matches the request's line count.
pub trait BlameOutputSink {
    fn emit(&mut self, request: &FileBlameRequest, lines: Vec<BlameLine>);
}

impl<F> BlameOutputSink for F
where
    F: FnMut(&FileBlameRequest, Vec<BlameLine>),
{
    fn emit(&mut self, request: &FileBlameRequest, lines: Vec<BlameLine>) {
        self(request, lines)
    }
}

/// Keeps every emitted file in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    files: Vec<FileBlame>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[FileBlame] {
        &self.files
    }

    pub fn into_files(self) -> Vec<FileBlame> {
        self.files
    }
}

impl BlameOutputSink for CollectingSink {
    fn emit(&mut self, request: &FileBlameRequest, lines: Vec<BlameLine>) {
        self.files.push(FileBlame {
            path: request.path.clone(),
            lines,
        });
    }
}
