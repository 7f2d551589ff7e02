/// Splits raw input into message bodies, one per line.
///
/// The line terminator (`\n` or `\r\n`) is removed and nothing else is
/// trimmed, so the position of each body matches its line number. Invalid
/// UTF-8 is replaced per line rather than rejecting the input.
pub fn split_messages(raw: &[u8]) -> Vec<String> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|byte| *byte == b'\n')
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8_lossy(line).into_owned()
        })
        .collect()
}
