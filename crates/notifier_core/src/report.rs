use crate::{OutcomeKind, RunSummary};

/// Number of body characters shown in an outcome line.
pub const PREVIEW_CHARS: usize = 10;

/// Shortens a message body for display, marking truncation with `...`.
pub fn preview(body: &str) -> String {
    match body.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

pub fn format_outcome_line(
    message_index: usize,
    body: &str,
    kind: OutcomeKind,
    detail: Option<&str>,
) -> String {
    let text = preview(body);
    match kind {
        OutcomeKind::Success => {
            format!("message_id[{message_index}] text:{text} | processed successfully")
        }
        _ => format!(
            "message_id[{message_index}] text:{text} | failed with: {kind} | error: {}",
            detail.unwrap_or("")
        ),
    }
}

pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "processed {}/{} messages: {} succeeded, {} http errors, {} timeouts, {} runtime errors",
        summary.recorded(),
        summary.expected(),
        summary.count(OutcomeKind::Success),
        summary.count(OutcomeKind::HttpError),
        summary.count(OutcomeKind::Timeout),
        summary.count(OutcomeKind::RuntimeError),
    )
}
