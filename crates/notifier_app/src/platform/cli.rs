use std::path::PathBuf;

use clap::Parser;

/// Posts every line of standard input to an HTTP endpoint.
#[derive(Parser, Debug)]
#[command(name = "notify")]
#[command(about = "Broadcast each line of stdin as an HTTP POST to one endpoint")]
#[command(override_usage = "notify --url=URL [<flags>] < messages.txt")]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Absolute http(s) URL that receives one POST per message.
    #[arg(long, env = "NOTIFY_URL")]
    pub url: String,

    /// Delay between submissions, e.g. 500ms, 5s, 1m30s.
    #[arg(short = 'i', long, default_value = "0s")]
    pub interval: String,

    /// Maximum number of requests in flight.
    #[arg(short = 'c', long, default_value_t = notifier_engine::DEFAULT_CONCURRENCY_LIMIT)]
    pub concurrency: usize,

    /// Log level (trace, debug, info, warn, error, off).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Also write log records to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_flags() {
        let args = Args::try_parse_from([
            "notify",
            "--url=http://localhost/hook",
            "-i",
            "5s",
            "-c",
            "8",
        ])
        .unwrap();
        assert_eq!(args.url, "http://localhost/hook");
        assert_eq!(args.interval, "5s");
        assert_eq!(args.concurrency, 8);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["notify", "--url", "http://localhost/"]).unwrap();
        assert_eq!(args.interval, "0s");
        assert_eq!(args.concurrency, 100);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn url_is_required() {
        assert!(Args::try_parse_from(["notify", "-i", "1s"]).is_err());
    }
}
