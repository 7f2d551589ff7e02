//! Notifier core: pure input, interval and report helpers for the front end.
mod input;
mod interval;
mod report;
mod summary;

pub use input::split_messages;
pub use interval::{parse_interval, IntervalError};
pub use report::{format_outcome_line, format_summary, preview, PREVIEW_CHARS};
pub use summary::{OutcomeKind, RunSummary};
