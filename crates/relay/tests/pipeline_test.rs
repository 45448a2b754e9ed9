//! End-to-end pipeline tests against stubbed downstream services.

use std::sync::Arc;

use audit::{AuditEntry, AuditOutcome, AuditSink, MemorySink, PipelineStage, SinkError};
use relay::config::{JiraConfig, WebexConfig};
use relay::{IncidentRelay, JiraClient, RelayOutcome, WebexClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_PAYLOAD: &str =
    r#"{"body":{"incident":{"id":"123456","summary":"Test Incident","html_url":"https://www.pagerduty.com/"}}}"#;

fn jira_config(base_url: &str) -> JiraConfig {
    JiraConfig {
        base_url: base_url.to_string(),
        email: "oncall@example.com".to_string(),
        api_token: "jira-token".to_string(),
        project_key: "OPS".to_string(),
        project_id: "10000".to_string(),
        issue_type: "Incident".to_string(),
    }
}

fn webex_config(api_url: &str) -> WebexConfig {
    WebexConfig {
        access_token: "webex-token".to_string(),
        room_id: "room-1".to_string(),
        api_url: Some(api_url.to_string()),
    }
}

fn relay_over(jira_url: &str, webex_url: &str, sink: Arc<dyn AuditSink>) -> IncidentRelay {
    let jira = JiraClient::new(&jira_config(jira_url)).unwrap();
    let webex = WebexClient::new(&webex_config(webex_url)).unwrap();
    IncidentRelay::new(jira, webex, sink)
}

/// Catch-all mock asserting a server is never called.
async fn expect_untouched(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_success_files_ticket_then_notifies() {
    let jira = MockServer::start().await;
    let webex = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .and(header_regex("authorization", "^Basic "))
        .and(body_json(json!({
            "fields": {
                "issuetype": { "name": "Incident" },
                "labels": ["123456", "https://www.pagerduty.com/"],
                "project": { "id": "10000" },
                "summary": "Test Incident"
            },
            "update": {}
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "10001", "key": "OPS-1" })),
        )
        .expect(1)
        .mount(&jira)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("authorization", "Bearer webex-token"))
        .and(body_json(json!({
            "roomId": "room-1",
            "text": format!("{}/browse/OPS-1", jira.uri())
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-1" })))
        .expect(1)
        .mount(&webex)
        .await;

    let sink = Arc::new(MemorySink::new());
    let relay = relay_over(&jira.uri(), &webex.uri(), sink.clone());

    let outcome = relay.process(TEST_PAYLOAD.as_bytes()).await;

    assert!(matches!(outcome, RelayOutcome::Completed { .. }));
    assert_eq!(outcome.status().as_u16(), 200);
    assert_eq!(
        serde_json::to_value(outcome.response()).unwrap(),
        json!({ "message": "success" })
    );

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, AuditOutcome::Success);
    assert_eq!(entries[0].stage, PipelineStage::Notify);
    assert_eq!(entries[0].incident_id.as_deref(), Some("123456"));
    assert!(entries[0].message.contains("OPS-1"));
}

#[tokio::test]
async fn unwrapped_payload_is_accepted() {
    let jira = MockServer::start().await;
    let webex = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "10001", "key": "OPS-1" })),
        )
        .expect(1)
        .mount(&jira)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-1" })))
        .expect(1)
        .mount(&webex)
        .await;

    let sink = Arc::new(MemorySink::new());
    let relay = relay_over(&jira.uri(), &webex.uri(), sink.clone());

    let payload = json!({
        "incident": {
            "id": "123456",
            "summary": "Test Incident",
            "html_url": "https://www.pagerduty.com/"
        }
    });
    let outcome = relay.process(payload.to_string().as_bytes()).await;

    assert!(matches!(outcome, RelayOutcome::Completed { .. }));
    assert_eq!(sink.entries()[0].outcome, AuditOutcome::Success);
}

#[tokio::test]
async fn empty_body_is_rejected_before_any_downstream_call() {
    let jira = MockServer::start().await;
    let webex = MockServer::start().await;
    expect_untouched(&jira).await;
    expect_untouched(&webex).await;

    let sink = Arc::new(MemorySink::new());
    let relay = relay_over(&jira.uri(), &webex.uri(), sink.clone());

    let outcome = relay.process(b"").await;

    assert_eq!(outcome.status().as_u16(), 400);
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, AuditOutcome::ValidationError);
    assert_eq!(entries[0].stage, PipelineStage::Validate);
    assert_eq!(entries[0].incident_id, None);
}

#[tokio::test]
async fn malformed_json_is_rejected_before_any_downstream_call() {
    let jira = MockServer::start().await;
    let webex = MockServer::start().await;
    expect_untouched(&jira).await;
    expect_untouched(&webex).await;

    let sink = Arc::new(MemorySink::new());
    let relay = relay_over(&jira.uri(), &webex.uri(), sink.clone());

    let outcome = relay.process(b"{\"incident\": oops").await;

    assert_eq!(outcome.status().as_u16(), 400);
    assert!(outcome.response().message.starts_with("Invalid JSON payload"));
    assert_eq!(sink.entries()[0].outcome, AuditOutcome::ParseError);
}

#[tokio::test]
async fn missing_incident_field_is_rejected_with_its_key() {
    let jira = MockServer::start().await;
    let webex = MockServer::start().await;
    expect_untouched(&jira).await;
    expect_untouched(&webex).await;

    let sink = Arc::new(MemorySink::new());
    let relay = relay_over(&jira.uri(), &webex.uri(), sink.clone());

    let payload = json!({
        "body": {
            "incident": { "id": "123456", "html_url": "https://www.pagerduty.com/" }
        }
    });
    let outcome = relay.process(payload.to_string().as_bytes()).await;

    assert_eq!(outcome.status().as_u16(), 400);
    assert_eq!(
        outcome.response().message,
        "Invalid payload: missing incident.summary"
    );
    let entries = sink.entries();
    assert_eq!(entries[0].outcome, AuditOutcome::ExtractionError);
    assert_eq!(entries[0].stage, PipelineStage::Extract);
}

#[tokio::test]
async fn tracker_failure_halts_pipeline_before_notification() {
    let jira = MockServer::start().await;
    let webex = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&jira)
        .await;
    expect_untouched(&webex).await;

    let sink = Arc::new(MemorySink::new());
    let relay = relay_over(&jira.uri(), &webex.uri(), sink.clone());

    let outcome = relay.process(TEST_PAYLOAD.as_bytes()).await;

    assert_eq!(outcome.status().as_u16(), 502);
    assert_eq!(outcome.response().message, "ticket creation failed");

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, AuditOutcome::TicketError);
    assert_eq!(entries[0].stage, PipelineStage::Ticket);
    assert_eq!(entries[0].incident_id.as_deref(), Some("123456"));
    assert!(entries[0].message.contains("500"));
    assert!(entries[0].message.contains("boom"));
}

#[tokio::test]
async fn tracker_status_other_than_created_is_a_failure() {
    let jira = MockServer::start().await;
    let webex = MockServer::start().await;

    // A 200 with a plausible body is still not a created ticket.
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "10001", "key": "OPS-1" })),
        )
        .expect(1)
        .mount(&jira)
        .await;
    expect_untouched(&webex).await;

    let sink = Arc::new(MemorySink::new());
    let relay = relay_over(&jira.uri(), &webex.uri(), sink.clone());

    let outcome = relay.process(TEST_PAYLOAD.as_bytes()).await;

    assert_eq!(outcome.status().as_u16(), 502);
    assert_eq!(sink.entries()[0].outcome, AuditOutcome::TicketError);
}

#[tokio::test]
async fn notification_failure_keeps_the_success_response() {
    let jira = MockServer::start().await;
    let webex = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "10001", "key": "OPS-1" })),
        )
        .expect(1)
        .mount(&jira)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(1)
        .mount(&webex)
        .await;

    let sink = Arc::new(MemorySink::new());
    let relay = relay_over(&jira.uri(), &webex.uri(), sink.clone());

    let outcome = relay.process(TEST_PAYLOAD.as_bytes()).await;

    assert!(matches!(outcome, RelayOutcome::Degraded { .. }));
    assert_eq!(outcome.status().as_u16(), 200);
    let response = outcome.response();
    assert_eq!(response.message, "success");
    assert!(response.advisory.unwrap().contains("503"));

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, AuditOutcome::NotifyError);
    assert_eq!(entries[0].stage, PipelineStage::Notify);
    assert_eq!(entries[0].incident_id.as_deref(), Some("123456"));
    assert!(entries[0].message.contains("OPS-1"));
}

#[derive(Debug)]
struct FailingSink;

#[async_trait::async_trait]
impl AuditSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn append(&self, _entry: &AuditEntry) -> Result<(), SinkError> {
        Err(SinkError::Rejected {
            status: 500,
            body: "store offline".to_string(),
        })
    }
}

#[tokio::test]
async fn audit_sink_failure_never_alters_the_response() {
    let jira = MockServer::start().await;
    let webex = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "10001", "key": "OPS-1" })),
        )
        .expect(1)
        .mount(&jira)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-1" })))
        .expect(1)
        .mount(&webex)
        .await;

    let relay = relay_over(&jira.uri(), &webex.uri(), Arc::new(FailingSink));

    let outcome = relay.process(TEST_PAYLOAD.as_bytes()).await;

    assert!(matches!(outcome, RelayOutcome::Completed { .. }));
    assert_eq!(outcome.status().as_u16(), 200);
}
