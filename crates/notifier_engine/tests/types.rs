use std::time::Duration;

use notifier_engine::{
    messages_from_bodies, Endpoint, MessageEvent, NotifierError, Outcome, RunConfig,
    DEFAULT_CONCURRENCY_LIMIT, DEFAULT_REQUEST_TIMEOUT,
};
use pretty_assertions::assert_eq;

#[test]
fn endpoint_accepts_absolute_http_urls() {
    let endpoint = Endpoint::parse("https://hooks.example.com/notify?team=ops").unwrap();
    assert_eq!(endpoint.as_url().host_str(), Some("hooks.example.com"));
    assert!(Endpoint::parse("http://127.0.0.1:8080").is_ok());
}

#[test]
fn endpoint_rejects_relative_and_non_http_urls() {
    for raw in ["/relative/path", "not a url", "ftp://files.example.com", "http://", ""] {
        let err = Endpoint::parse(raw).unwrap_err();
        assert!(
            matches!(err, NotifierError::InvalidEndpoint { ref endpoint, .. } if endpoint == raw),
            "{raw}: {err}"
        );
    }
}

#[test]
fn run_config_defaults() {
    let config = RunConfig::new(Endpoint::parse("http://localhost/").unwrap());
    assert_eq!(config.concurrency_limit.get(), DEFAULT_CONCURRENCY_LIMIT);
    assert_eq!(config.submission_interval, Duration::ZERO);
    assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    assert_eq!(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs(10));
}

#[test]
fn zero_concurrency_is_rejected() {
    let config = RunConfig::new(Endpoint::parse("http://localhost/").unwrap());
    assert!(matches!(
        config.with_concurrency_limit(0),
        Err(NotifierError::InvalidConcurrency)
    ));
}

#[test]
fn error_detail_only_on_failures() {
    assert_eq!(Outcome::success(0).error_detail(), None);
    assert_eq!(Outcome::completed().error_detail(), None);
    assert_eq!(Outcome::completed().message_index(), None);
    assert_eq!(Outcome::http_error(2, 404).error_detail(), Some("404"));
    assert_eq!(
        Outcome::timeout(3, "operation timed out").error_detail(),
        Some("operation timed out")
    );
    assert_eq!(
        Outcome::runtime_error(4, "dns error").event(),
        MessageEvent::RuntimeError
    );
}

#[test]
fn messages_are_indexed_in_input_order() {
    let messages = messages_from_bodies(["first", "second", "third"]);
    let pairs: Vec<_> = messages.iter().map(|m| (m.index(), m.body())).collect();
    assert_eq!(pairs, vec![(0, "first"), (1, "second"), (2, "third")]);
}
