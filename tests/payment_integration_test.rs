use anyhow::Result;
use httpmock::prelude::*;
use provider_clients::config::PaymentConfig;
use provider_clients::core::TransactionRequest;
use provider_clients::{PaymentClient, PaymentError};

fn client(server: &MockServer) -> PaymentClient {
    let mut config = PaymentConfig::new("sk_test_integration");
    config.base_url = server.base_url();
    PaymentClient::new(&config)
}

/// 初始化後再驗證同一筆交易
#[tokio::test]
async fn test_initialize_then_verify_flow() -> Result<()> {
    let server = MockServer::start();

    let init_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/transaction/initialize")
            .header("Authorization", "Bearer sk_test_integration")
            .json_body(serde_json::json!({
                "email": "premium@example.com",
                "amount": 200000,
                "currency": "NGN",
                "reference": "SG-0001",
                "callback_url": "https://app.example.com/payments/callback"
            }));
        then.status(200).json_body(serde_json::json!({
            "status": true,
            "message": "Authorization URL created",
            "data": {
                "authorization_url": "https://checkout.example.com/0peioxfhpn",
                "access_code": "0peioxfhpn",
                "reference": "SG-0001"
            }
        }));
    });

    let verify_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/transaction/verify/SG-0001")
            .header("Authorization", "Bearer sk_test_integration");
        then.status(200).json_body(serde_json::json!({
            "status": true,
            "message": "Verification successful",
            "data": {"status": "success", "reference": "SG-0001", "amount": 200000}
        }));
    });

    let payments = client(&server);
    let request = TransactionRequest::new("premium@example.com", 200_000)
        .with_reference("SG-0001")
        .with_callback_url("https://app.example.com/payments/callback");

    let initialized = payments.initialize_transaction(&request).await?;
    assert_eq!(initialized["data"]["access_code"], "0peioxfhpn");

    let verified = payments.verify_transaction("SG-0001").await?;
    assert_eq!(verified["data"]["status"], "success");
    assert_eq!(verified["data"]["amount"], 200000);

    init_mock.assert();
    verify_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_verify_rejection_carries_status_and_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/transaction/verify/unknown-ref");
        then.status(400).json_body(serde_json::json!({
            "status": false,
            "message": "Transaction reference not found"
        }));
    });

    let err = client(&server)
        .verify_transaction("unknown-ref")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PaymentError {
            status: 400,
            message: "Transaction reference not found".to_string(),
        }
    );
}

#[tokio::test]
async fn test_initialize_http_error_uses_default_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/transaction/initialize");
        then.status(401).json_body(serde_json::json!({"status": false}));
    });

    let err = client(&server)
        .initialize_transaction(&TransactionRequest::new("a@example.com", 100))
        .await
        .unwrap_err();

    assert_eq!(err.status, 400);
    assert_eq!(err.message, "Payment initialization failed");
}

#[tokio::test]
async fn test_verify_timeout_maps_to_504() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/transaction/verify/slow");
        then.status(200)
            .delay(std::time::Duration::from_millis(500))
            .json_body(serde_json::json!({"status": true}));
    });

    let err = client(&server)
        .with_timeout(std::time::Duration::from_millis(50))
        .verify_transaction("slow")
        .await
        .unwrap_err();

    assert_eq!(err.status, 504);
}

#[tokio::test]
async fn test_initialize_malformed_success_body_is_internal_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/transaction/initialize");
        then.status(200).body("<html>maintenance</html>");
    });

    let err = client(&server)
        .initialize_transaction(&TransactionRequest::new("a@example.com", 100))
        .await
        .unwrap_err();

    assert_eq!(err.status, 500);
}
