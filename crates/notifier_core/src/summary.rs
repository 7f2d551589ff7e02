use std::fmt;

/// Per-message result kinds as seen by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Timeout,
    HttpError,
    RuntimeError,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::Success => write!(f, "success"),
            OutcomeKind::Timeout => write!(f, "timeout"),
            OutcomeKind::HttpError => write!(f, "http error"),
            OutcomeKind::RuntimeError => write!(f, "runtime error"),
        }
    }
}

/// Tally of outcomes for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    expected: usize,
    succeeded: usize,
    timed_out: usize,
    http_errors: usize,
    runtime_errors: usize,
}

impl RunSummary {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            ..Self::default()
        }
    }

    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Success => self.succeeded += 1,
            OutcomeKind::Timeout => self.timed_out += 1,
            OutcomeKind::HttpError => self.http_errors += 1,
            OutcomeKind::RuntimeError => self.runtime_errors += 1,
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn recorded(&self) -> usize {
        self.succeeded + self.timed_out + self.http_errors + self.runtime_errors
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        match kind {
            OutcomeKind::Success => self.succeeded,
            OutcomeKind::Timeout => self.timed_out,
            OutcomeKind::HttpError => self.http_errors,
            OutcomeKind::RuntimeError => self.runtime_errors,
        }
    }

    pub fn failures(&self) -> usize {
        self.recorded() - self.succeeded
    }

    pub fn is_complete(&self) -> bool {
        self.recorded() == self.expected
    }
}
