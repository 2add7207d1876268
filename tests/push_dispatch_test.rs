use httpmock::prelude::*;
use provider_clients::adapters::ExpoPushTransport;
use provider_clients::config::PushConfig;
use provider_clients::core::push::PUSH_BATCH_SIZE;
use provider_clients::core::{PushFailure, PushPriority};
use provider_clients::PushDispatcher;

fn dispatcher(server: &MockServer) -> PushDispatcher<ExpoPushTransport> {
    PushDispatcher::new(ExpoPushTransport::new(&PushConfig {
        endpoint: server.url("/push/send"),
        access_token: None,
    }))
}

fn tokens(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("ExponentPushToken[{:04}]", i)).collect()
}

fn ok_tickets(n: usize) -> serde_json::Value {
    let data: Vec<_> = (0..n)
        .map(|i| serde_json::json!({"status": "ok", "id": format!("ticket-{}", i)}))
        .collect();
    serde_json::json!({ "data": data })
}

/// 250 個 token 應分成 100、100、50 三批
#[tokio::test]
async fn test_250_tokens_make_three_requests() {
    let server = MockServer::start();
    let full_batch = server.mock(|when, then| {
        when.method(POST)
            .path("/push/send")
            .body_contains("ExponentPushToken[0000]");
        then.status(200).json_body(ok_tickets(PUSH_BATCH_SIZE));
    });
    let second_batch = server.mock(|when, then| {
        when.method(POST)
            .path("/push/send")
            .body_contains("ExponentPushToken[0100]");
        then.status(200).json_body(ok_tickets(PUSH_BATCH_SIZE));
    });
    let last_batch = server.mock(|when, then| {
        when.method(POST)
            .path("/push/send")
            .body_contains("ExponentPushToken[0200]");
        then.status(200).json_body(ok_tickets(50));
    });

    let result = dispatcher(&server)
        .dispatch(&tokens(250), "Escort update", "Your escort is nearby", None, PushPriority::High)
        .await;

    full_batch.assert_hits(1);
    second_batch.assert_hits(1);
    last_batch.assert_hits(1);
    assert_eq!(result.success, 250);
    assert_eq!(result.failed, 0);
    assert!(result.errors.is_empty());
    assert_eq!(result.tickets.len(), 250);
    assert_eq!(result.tickets[249].token, "ExponentPushToken[0249]");
}

#[tokio::test]
async fn test_provider_outage_fails_every_batch() {
    let server = MockServer::start();
    let outage = server.mock(|when, then| {
        when.method(POST).path("/push/send");
        then.status(503).body("upstream unavailable");
    });

    let result = dispatcher(&server)
        .dispatch(&tokens(120), "t", "b", None, PushPriority::High)
        .await;

    outage.assert_hits(2);
    assert_eq!(result.success, 0);
    assert_eq!(result.failed, 120);
    assert_eq!(result.errors.len(), 2);
    assert!(result
        .errors
        .iter()
        .all(|e| matches!(e, PushFailure::Message(m) if m.contains("503"))));
}

#[tokio::test]
async fn test_invalid_tokens_never_reach_provider() {
    let server = MockServer::start();
    let never = server.mock(|when, then| {
        when.method(POST).path("/push/send");
        then.status(200).json_body(ok_tickets(1));
    });

    let result = dispatcher(&server)
        .dispatch(&["bad-token", "ExponentPushToken[open"], "t", "b", None, PushPriority::High)
        .await;

    never.assert_hits(0);
    assert_eq!(result.failed, 2);
    assert_eq!(
        result.errors,
        vec![PushFailure::Message("All tokens are invalid".to_string())]
    );
}

#[tokio::test]
async fn test_ticket_count_mismatch_is_batch_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/push/send");
        then.status(200).json_body(ok_tickets(1));
    });

    let result = dispatcher(&server)
        .dispatch(&tokens(3), "t", "b", None, PushPriority::High)
        .await;

    assert_eq!(result.success, 0);
    assert_eq!(result.failed, 3);
    assert_eq!(result.errors.len(), 1);
}
