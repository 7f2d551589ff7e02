use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts finished units of work and reports the one that finishes the run.
#[derive(Debug)]
pub(crate) struct CompletionTracker {
    total: usize,
    finished: AtomicUsize,
}

impl CompletionTracker {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            finished: AtomicUsize::new(0),
        }
    }

    /// Returns `true` for exactly one call: the one that brings the count to
    /// `total`. Calls beyond `total` are ignored.
    pub(crate) fn record(&self) -> bool {
        let previous = self
            .finished
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < self.total).then_some(count + 1)
            });
        matches!(previous, Ok(count) if count + 1 == self.total)
    }

    pub(crate) fn finished(&self) -> usize {
        self.finished.load(Ordering::Acquire)
    }
}
