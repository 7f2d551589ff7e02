use std::net::TcpListener;
use std::time::Duration;

use notifier_engine::{
    Endpoint, Executor, Message, MessageEvent, Outcome, ReqwestExecutor, DEFAULT_REQUEST_TIMEOUT,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor() -> ReqwestExecutor {
    ReqwestExecutor::new(DEFAULT_REQUEST_TIMEOUT).expect("client")
}

fn endpoint(server: &MockServer, route: &str) -> Endpoint {
    Endpoint::parse(&format!("{}{}", server.uri(), route)).expect("endpoint")
}

#[tokio::test]
async fn posts_raw_body_and_reports_success_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_string("Lorem ipsum dolor sit amet"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::new(4, "Lorem ipsum dolor sit amet");
    let outcome = executor()
        .execute(&message, &endpoint(&server, "/hook"))
        .await;

    assert_eq!(outcome, Outcome::success(4));
    assert_eq!(outcome.error_detail(), None);
}

#[tokio::test]
async fn non_200_status_is_http_error_with_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;

    let outcome = executor()
        .execute(&Message::new(0, "payload"), &endpoint(&server, "/"))
        .await;

    assert_eq!(outcome.event(), MessageEvent::HttpError);
    assert_eq!(outcome.message_index(), Some(0));
    assert_eq!(outcome.error_detail(), Some("405"));
}

#[tokio::test]
async fn other_2xx_codes_are_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let outcome = executor()
        .execute(&Message::new(1, "payload"), &endpoint(&server, "/"))
        .await;

    assert_eq!(outcome, Outcome::http_error(1, 202));
}

#[tokio::test]
async fn slow_response_is_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let executor = ReqwestExecutor::new(Duration::from_millis(50)).expect("client");
    let outcome = executor
        .execute(&Message::new(2, "payload"), &endpoint(&server, "/"))
        .await;

    assert_eq!(outcome.event(), MessageEvent::Timeout);
    assert!(!outcome.error_detail().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn refused_connection_is_runtime_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let endpoint = Endpoint::parse(&format!("http://127.0.0.1:{port}/hook")).unwrap();

    let outcome = executor()
        .execute(&Message::new(3, "payload"), &endpoint)
        .await;

    assert_eq!(outcome.event(), MessageEvent::RuntimeError);
    assert_eq!(outcome.message_index(), Some(3));
    assert!(!outcome.error_detail().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn classification_is_stable_for_a_fixed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let executor = executor();
    let endpoint = endpoint(&server, "/");
    let message = Message::new(0, "same");
    let first = executor.execute(&message, &endpoint).await;
    let second = executor.execute(&message, &endpoint).await;

    assert_eq!(first, second);
    assert_eq!(first.event(), MessageEvent::HttpError);
}
