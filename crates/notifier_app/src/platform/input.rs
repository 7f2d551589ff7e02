use std::io::{self, IsTerminal, Read};

use anyhow::{bail, Context};
use engine_logging::engine_info;
use notifier_core::split_messages;

/// Reads every message body from `reader` before the run starts.
pub fn read_messages(mut reader: impl Read) -> anyhow::Result<Vec<String>> {
    engine_info!("reading input...");
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .context("reading standard input")?;
    let bodies = split_messages(&raw);
    engine_info!("reading input complete: {} messages", bodies.len());
    Ok(bodies)
}

pub fn read_stdin() -> anyhow::Result<Vec<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("no input stream detected; pipe messages into stdin");
    }
    read_messages(stdin.lock())
}
