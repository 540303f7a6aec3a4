//! Client behavior against canned transport responses.
//!
//! A `StubTransport` records each request it receives and replays a fixed
//! outcome, so status handling and business-level checks can be exercised
//! without a server.

use std::cell::{Cell, RefCell};
use std::sync::Mutex;

use fbx4vrm_core::{
    ApiError, BugReportRequest, Fbx4vrmClient, HttpMethod, HttpRequest, HttpResponse, Transport,
    TransportError,
};

struct StubTransport {
    outcome: Result<(u16, String), String>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    fn respond(status: u16, body: &str) -> Self {
        Self {
            outcome: Ok((status, body.to_string())),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn fail(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        match &self.outcome {
            Ok((status, body)) => Ok(HttpResponse {
                status: *status,
                headers: Vec::new(),
                body: body.clone(),
            }),
            Err(message) => Err(TransportError::new(message.clone())),
        }
    }
}

fn client(transport: StubTransport) -> Fbx4vrmClient<StubTransport> {
    Fbx4vrmClient::with_transport("https://reports.example:8443/", transport)
}

fn is_timestamp(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 20
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            10 => *c == b'T',
            13 | 16 => *c == b':',
            19 => *c == b'Z',
            _ => c.is_ascii_digit(),
        })
}

#[tokio::test]
async fn api_info_success() {
    let c = client(StubTransport::respond(
        200,
        r#"{"api":"fbx4vrm","version":"1.2.0","documentation":"https://x"}"#,
    ));
    let response = c.get_api_info().await;

    assert!(response.is_ok());
    assert_eq!(response.data().unwrap().version, "1.2.0");
    assert_eq!(response.data().unwrap().documentation, "https://x");

    let requests = c.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].path, "https://reports.example:8443/api/v1/fbx4vrm");
}

#[tokio::test]
async fn queue_submit_service_unavailable() {
    let c = client(StubTransport::respond(503, ""));
    let response = c.submit_to_queue(BugReportRequest::default()).await;

    assert!(!response.is_ok());
    assert_eq!(response.status_code(), 503);
    assert!(response.error_message().unwrap().starts_with("HTTP error 503"));
    assert_eq!(response.raw_body(), Some(""));
}

#[tokio::test]
async fn queue_submit_business_rejection() {
    let c = client(StubTransport::respond(200, r#"{"status":"rejected","message":"duplicate"}"#));
    let response = c.submit_to_queue(BugReportRequest::default()).await;

    assert!(response.is_ok(), "transport-level success expected");
    assert_eq!(response.data().unwrap().status.as_deref(), Some("rejected"));
    let err = response.into_accepted().unwrap_err();
    assert_eq!(err.to_string(), "duplicate");
}

#[tokio::test]
async fn queue_submit_normalizes_identity() {
    let c = client(StubTransport::respond(200, r#"{"status":"queued","queue_id":"q-9"}"#));
    let queued = c
        .submit_to_queue(BugReportRequest::default())
        .await
        .into_accepted()
        .unwrap();
    assert_eq!(queued.queue_id, "q-9");

    let requests = c.transport().requests();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].path, "https://reports.example:8443/bug-reports/queue/submit");
    let body: serde_json::Value =
        serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
    let id = body["report_id"].as_str().unwrap();
    assert_eq!(id.len(), 8);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(is_timestamp(body["timestamp"].as_str().unwrap()));
}

#[tokio::test]
async fn legacy_submit_rejection_reports_status() {
    let c = client(StubTransport::respond(200, r#"{"status":"rejected"}"#));
    let err = c
        .submit_bug_report(BugReportRequest::default())
        .await
        .into_accepted()
        .unwrap_err();
    assert_eq!(err, ApiError::Rejected("rejected".to_string()));

    let requests = c.transport().requests();
    assert_eq!(requests[0].path, "https://reports.example:8443/api/v1/fbx4vrm/bug-reports");
}

#[tokio::test]
async fn legacy_submit_without_status_is_unknown_error() {
    let c = client(StubTransport::respond(200, r#"{"report_id":"x"}"#));
    let err = c
        .submit_bug_report(BugReportRequest::default())
        .await
        .into_accepted()
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown error");
}

#[tokio::test]
async fn legacy_submit_accepted() {
    let c = client(StubTransport::respond(
        200,
        r#"{"status":"accepted","report_id":"abcd1234","avatar_id":"av-1","avatar_name":"Rusk",
            "tracking_url":"/reports/abcd1234","github_issue_url":"https://issues/1","is_new_issue":true}"#,
    ));
    let accepted = c
        .submit_bug_report(BugReportRequest::default())
        .await
        .into_accepted()
        .unwrap();
    assert_eq!(accepted.avatar_name, "Rusk");
    assert!(accepted.is_new_issue);
}

#[tokio::test]
async fn connection_failure_is_prefixed() {
    let c = client(StubTransport::fail("tcp connect error: Connection refused"));
    let response = c.get_queue_stats().await;

    assert_eq!(response.status_code(), 0);
    assert_eq!(
        response.error_message().as_deref(),
        Some("Connection error: tcp connect error: Connection refused")
    );
}

#[tokio::test]
async fn unparsable_body_keeps_raw_text() {
    let c = client(StubTransport::respond(200, "<html>gateway</html>"));
    let response = c.get_avatar_list().await;

    assert_eq!(response.error_message().as_deref(), Some("Failed to parse response JSON"));
    assert_eq!(response.raw_body(), Some("<html>gateway</html>"));
}

#[tokio::test]
async fn avatar_list_callback_receives_data() {
    let c = client(StubTransport::respond(
        200,
        r#"{"success":true,"avatars":[{"id":"a1","name":"rusk","display_name":"Rusk"},{"id":"a2","name":"mame"}]}"#,
    ));
    let mut names = Vec::new();
    let mut errors = Vec::new();
    c.get_avatar_list_then(
        |list| names.extend(list.avatars.iter().map(|a| a.display_name().to_string())),
        |e| errors.push(e),
    )
    .await;

    assert_eq!(names, vec!["Rusk", "mame"]);
    assert!(errors.is_empty());
}

#[tokio::test]
async fn queue_stats_callback_receives_error() {
    let c = client(StubTransport::respond(500, "boom"));
    let calls = Cell::new(0);
    let mut message = String::new();
    c.get_queue_stats_then(
        |_| calls.set(calls.get() + 100),
        |e| {
            calls.set(calls.get() + 1);
            message = e;
        },
    )
    .await;

    assert_eq!(calls.get(), 1);
    assert_eq!(message, "HTTP error 500: Internal Server Error");
}

#[tokio::test]
async fn queue_callback_treats_rejection_as_error() {
    let c = client(StubTransport::respond(200, r#"{"status":"rejected","message":"duplicate"}"#));
    let outcome = RefCell::new(None);
    c.submit_to_queue_then(
        BugReportRequest::default(),
        |_| *outcome.borrow_mut() = Some(Ok(())),
        |e| *outcome.borrow_mut() = Some(Err(e)),
    )
    .await;
    assert_eq!(outcome.into_inner(), Some(Err("duplicate".to_string())));
}

#[tokio::test]
async fn test_connection_reports_outcome() {
    let c = client(StubTransport::respond(200, r#"{"api":"fbx4vrm","version":"1.2.0"}"#));
    let mut seen = None;
    c.test_connection_then(|ok, message| seen = Some((ok, message))).await;
    assert_eq!(seen, Some((true, "Connected to fbx4vrm v1.2.0".to_string())));

    let c = client(StubTransport::respond(502, ""));
    let (ok, message) = c.test_connection().await;
    assert!(!ok);
    assert_eq!(message, "HTTP error 502: Bad Gateway");
}
