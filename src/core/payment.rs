use crate::config::PaymentConfig;
use crate::core::TransactionRequest;
use crate::utils::error::PaymentError;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct InitializePayload<'a> {
    email: &'a str,
    amount: u64,
    currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

/// 支付閘道客戶端 (Paystack 相容 REST API)
pub struct PaymentClient {
    client: Client,
    base_url: String,
    secret_key: String,
    currency: String,
    timeout: Duration,
}

impl PaymentClient {
    pub fn new(config: &PaymentConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &PaymentConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            currency: config.currency.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    /// 覆寫請求逾時 (預設 30 秒)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub async fn initialize_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<Value, PaymentError> {
        if request.amount == 0 {
            return Err(PaymentError::rejected(
                "Amount must be a positive integer in the smallest currency unit",
            ));
        }

        let payload = InitializePayload {
            email: &request.email,
            amount: request.amount,
            currency: &self.currency,
            // 空字串視同未提供，交由閘道產生 reference
            reference: request.reference.as_deref().filter(|s| !s.is_empty()),
            callback_url: request.callback_url.as_deref().filter(|s| !s.is_empty()),
        };

        let url = format!("{}/transaction/initialize", self.base_url);
        tracing::debug!(
            "Initializing payment of {} {} for {}",
            request.amount,
            self.currency,
            request.email
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| map_transport_error("initialization", e))?;

        let status = response.status();
        let body = read_body(response).await?;

        match body {
            Some(result) if status == StatusCode::OK && provider_succeeded(&result) => {
                tracing::info!(
                    "Payment initialized: {}",
                    request.reference.as_deref().unwrap_or("<generated>")
                );
                Ok(result)
            }
            Some(result) => {
                tracing::error!("Payment initialization failed ({}): {}", status, result);
                Err(PaymentError::rejected(provider_message(
                    &result,
                    "Payment initialization failed",
                )))
            }
            None if status == StatusCode::OK => Err(PaymentError::internal(
                "Payment provider returned a malformed response",
            )),
            None => {
                tracing::error!("Payment initialization failed with status {}", status);
                Err(PaymentError::rejected("Payment initialization failed"))
            }
        }
    }

    pub async fn verify_transaction(&self, reference: &str) -> Result<Value, PaymentError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| PaymentError::internal(format!("Invalid payment base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::internal("Payment base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["transaction", "verify", reference]);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| map_transport_error("verification", e))?;

        let status = response.status();
        let body = read_body(response).await?;

        match body {
            Some(result) if status == StatusCode::OK => {
                tracing::info!("Payment verified: {}", reference);
                Ok(result)
            }
            Some(result) => {
                tracing::error!("Payment verification failed ({}): {}", status, result);
                Err(PaymentError::rejected(provider_message(
                    &result,
                    "Payment verification failed",
                )))
            }
            None if status == StatusCode::OK => Err(PaymentError::internal(
                "Payment provider returned a malformed response",
            )),
            None => {
                tracing::error!("Payment verification failed with status {}", status);
                Err(PaymentError::rejected("Payment verification failed"))
            }
        }
    }
}

/// 讀取回應內容；非 JSON 時回傳 None
async fn read_body(response: reqwest::Response) -> Result<Option<Value>, PaymentError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| map_transport_error("response", e))?;
    Ok(serde_json::from_slice(&bytes).ok())
}

fn provider_succeeded(body: &Value) -> bool {
    body.get("status").and_then(Value::as_bool).unwrap_or(false)
}

fn provider_message(body: &Value, default: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn map_transport_error(stage: &str, error: reqwest::Error) -> PaymentError {
    if error.is_timeout() {
        tracing::error!("Payment {} request timeout", stage);
        PaymentError::timeout()
    } else {
        tracing::error!("Payment {} error: {}", stage, error);
        PaymentError::internal(error.to_string())
    }
}
