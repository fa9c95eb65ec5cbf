//! Batch drivers.
//!
//! Every file runs through its own pipeline; a failure on one file is
//! recorded and the batch carries on. The parallel driver fans requests out
//! over scoped worker threads and feeds the sink from the calling thread, so
//! sinks never need to be shared between threads.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use tracing::{info, warn};

use crate::blame::assembler::{assemble, dispatch, process, BlameOutcome, Disposition};
use crate::blame::sink::BlameOutputSink;
use crate::blame::source::HistoryAnnotationSource;
use crate::error::{BlameError, Result};
use crate::models::FileBlameRequest;

/// A file whose history query failed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: BlameError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub emitted: usize,
    pub skipped: usize,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, request: &FileBlameRequest, result: Result<Disposition>) {
        match result {
            Ok(Disposition::Emitted { .. }) => self.emitted += 1,
            Ok(Disposition::Skipped(_)) => self.skipped += 1,
            Err(error) => {
                warn!(path = %request.path, %error, "Blame failed");
                self.failures.push(FileFailure {
                    path: request.path.clone(),
                    error,
                });
            }
        }
    }

    fn log_summary(&self, total: usize) {
        info!(
            total,
            emitted = self.emitted,
            skipped = self.skipped,
            failed = self.failures.len(),
            "Blame of {} file(s) done",
            total
        );
    }
}

/// Blame every request in order on the current thread.
pub fn blame_files<S, K>(requests: &[FileBlameRequest], source: &S, sink: &mut K) -> BatchReport
where
    S: HistoryAnnotationSource + ?Sized,
    K: BlameOutputSink + ?Sized,
{
    let mut report = BatchReport::default();

    for request in requests {
        let result = process(request, source, sink);
        report.record(request, result);
    }

    report.log_summary(requests.len());
    report
}

/// Blame requests on `jobs` worker threads. Files reach the sink in
/// completion order.
pub fn blame_files_parallel<S, K>(
    requests: &[FileBlameRequest],
    source: &S,
    sink: &mut K,
    jobs: NonZeroUsize,
) -> BatchReport
where
    S: HistoryAnnotationSource + Sync + ?Sized,
    K: BlameOutputSink + ?Sized,
{
    let workers = jobs.get().min(requests.len());
    if workers <= 1 {
        return blame_files(requests, source, sink);
    }

    let mut report = BatchReport::default();
    let next = AtomicUsize::new(0);

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<(usize, Result<BlameOutcome>)>();

        for _ in 0..workers {
            let tx = tx.clone();
            let next = &next;
            scope.spawn(move || loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(request) = requests.get(index) else {
                    break;
                };
                if tx.send((index, assemble(request, source))).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for (index, result) in rx {
            let request = &requests[index];
            let result = result.map(|outcome| dispatch(request, outcome, sink));
            report.record(request, result);
        }
    });

    report.log_summary(requests.len());
    report
}
