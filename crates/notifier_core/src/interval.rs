use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("interval is empty")]
    Empty,
    #[error("invalid interval {0:?}: expected e.g. 500ms, 5s, 1m30s")]
    Invalid(String),
    #[error("unknown interval unit {unit:?} in {input:?}")]
    UnknownUnit { input: String, unit: String },
    #[error("interval {0:?} is too large")]
    OutOfRange(String),
}

/// Parses a submission interval such as `0s`, `500ms`, `2m` or `1m30s`.
///
/// A bare number is read as seconds. Units are `ms`, `s`, `m` and `h`.
pub fn parse_interval(raw: &str) -> Result<Duration, IntervalError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(IntervalError::Empty);
    }
    let out_of_range = || IntervalError::OutOfRange(raw.to_string());

    if text.bytes().all(|b| b.is_ascii_digit()) {
        let secs = text.parse::<u64>().map_err(|_| out_of_range())?;
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = text;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return Err(IntervalError::Invalid(raw.to_string()));
        }
        let value = rest[..digits].parse::<u64>().map_err(|_| out_of_range())?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let part = match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.checked_mul(60).ok_or_else(out_of_range)?),
            "h" => Duration::from_secs(value.checked_mul(3600).ok_or_else(out_of_range)?),
            "" => return Err(IntervalError::Invalid(raw.to_string())),
            other => {
                return Err(IntervalError::UnknownUnit {
                    input: raw.to_string(),
                    unit: other.to_string(),
                })
            }
        };
        total = total.checked_add(part).ok_or_else(out_of_range)?;
    }
    Ok(total)
}
