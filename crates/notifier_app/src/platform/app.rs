use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_info, engine_warn, LogDestination};
use notifier_core::{format_outcome_line, format_summary, parse_interval, OutcomeKind, RunSummary};
use notifier_engine::{
    messages_from_bodies, CancellationSource, Dispatcher, Endpoint, MessageEvent, Outcome,
    OutcomeHandler, RunConfig, RunState,
};

use super::cli::Args;
use super::input;

/// Exit status used when a run is stopped by a signal.
const INTERRUPTED_EXIT: u8 = 130;

pub fn run_app() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let destination = match &args.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Stderr,
    };
    engine_logging::initialize(destination, engine_logging::level_from_name(&args.log_level));

    let config = build_config(&args)?;
    let bodies = input::read_stdin()?;

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(broadcast(config, bodies))
}

fn build_config(args: &Args) -> anyhow::Result<RunConfig> {
    let endpoint = Endpoint::parse(&args.url)?;
    let interval = parse_interval(&args.interval).context("parsing --interval")?;
    let config = RunConfig::new(endpoint)
        .with_concurrency_limit(args.concurrency)?
        .with_submission_interval(interval);
    Ok(config)
}

async fn broadcast(config: RunConfig, bodies: Vec<String>) -> anyhow::Result<ExitCode> {
    let dispatcher = Dispatcher::new(config)?;
    let cancel = CancellationSource::new();
    let signals = cancel
        .listen_for_signals()
        .context("installing signal handlers")?;

    let messages = messages_from_bodies(bodies.iter().cloned());
    let mut printer = OutcomePrinter::new(&bodies, io::stdout());

    writeln!(printer.out, "\nstarting processing").context("writing output")?;
    let result = dispatcher.run(messages, &mut printer, cancel.token()).await;

    // Releases the signal listener once the run is over.
    cancel.cancel();
    if let Err(err) = signals.await {
        engine_warn!("signal listener ended abnormally: {}", err);
    }

    let state = result?;
    let (mut out, summary, written) = printer.finish();
    written.context("writing outcome")?;
    let headline = match state {
        RunState::Completed => "input processing is complete",
        RunState::Interrupted => "input processing was interrupted",
    };
    writeln!(out, "\n{headline}\n{}", format_summary(&summary)).context("writing summary")?;

    match state {
        RunState::Completed => {
            engine_info!("run complete with {} failures", summary.failures());
            Ok(ExitCode::SUCCESS)
        }
        RunState::Interrupted => {
            engine_warn!(
                "run interrupted after {} of {} outcomes",
                summary.recorded(),
                summary.expected()
            );
            Ok(ExitCode::from(INTERRUPTED_EXIT))
        }
    }
}

/// Prints one line per outcome and keeps the tally.
///
/// The first write error is kept and later lines are skipped, so a closed
/// stdout ends up as an error from `broadcast` rather than a panic.
struct OutcomePrinter<'a, W> {
    bodies: &'a [String],
    summary: RunSummary,
    out: W,
    write_error: Option<io::Error>,
}

impl<'a, W: Write> OutcomePrinter<'a, W> {
    fn new(bodies: &'a [String], out: W) -> Self {
        Self {
            bodies,
            summary: RunSummary::new(bodies.len()),
            out,
            write_error: None,
        }
    }

    fn finish(self) -> (W, RunSummary, io::Result<()>) {
        let written = match self.write_error {
            Some(err) => Err(err),
            None => Ok(()),
        };
        (self.out, self.summary, written)
    }
}

impl<W: Write> OutcomeHandler for OutcomePrinter<'_, W> {
    fn on_outcome(&mut self, outcome: &Outcome) {
        let (Some(kind), Some(index)) = (map_event(outcome.event()), outcome.message_index()) else {
            return;
        };
        self.summary.record(kind);
        if self.write_error.is_some() {
            return;
        }
        let body = self.bodies.get(index).map(String::as_str).unwrap_or_default();
        let line = format_outcome_line(index, body, kind, outcome.error_detail());
        if let Err(err) = writeln!(self.out, "{line}") {
            engine_warn!("cannot write outcome for message_id={}: {}", index, err);
            self.write_error = Some(err);
        }
    }
}

fn map_event(event: MessageEvent) -> Option<OutcomeKind> {
    match event {
        MessageEvent::Success => Some(OutcomeKind::Success),
        MessageEvent::Timeout => Some(OutcomeKind::Timeout),
        MessageEvent::HttpError => Some(OutcomeKind::HttpError),
        MessageEvent::RuntimeError => Some(OutcomeKind::RuntimeError),
        MessageEvent::Completed => None,
    }
}
