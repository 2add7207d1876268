use crate::config::PushConfig;
use crate::core::{PushMessage, PushTicket, PushTransport};
use crate::utils::error::{IntegrationError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PushResponse {
    #[serde(default)]
    data: Option<Vec<PushTicket>>,
    #[serde(default)]
    errors: Option<Vec<PushServerError>>,
}

#[derive(Debug, Deserialize)]
struct PushServerError {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

impl std::fmt::Display for PushServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Expo 推播服務的 HTTP 傳輸
pub struct ExpoPushTransport {
    client: Client,
    endpoint: String,
    access_token: Option<String>,
}

impl ExpoPushTransport {
    pub fn new(config: &PushConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &PushConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            access_token: config.access_token.clone(),
        }
    }
}

fn join_errors(errors: &[PushServerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl PushTransport for ExpoPushTransport {
    async fn publish_batch(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>> {
        tracing::debug!("Publishing {} push messages to {}", messages.len(), self.endpoint);

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(messages);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let parsed: Option<PushResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let detail = parsed
                .as_ref()
                .and_then(|r| r.errors.as_deref())
                .map(join_errors)
                .unwrap_or(text);
            return Err(IntegrationError::push(format!(
                "Push server returned {}: {}",
                status, detail
            )));
        }

        let parsed = parsed.ok_or_else(|| {
            IntegrationError::push("Push server returned a malformed response")
        })?;

        if let Some(errors) = parsed.errors.as_deref().filter(|e| !e.is_empty()) {
            return Err(IntegrationError::push(join_errors(errors)));
        }

        parsed
            .data
            .ok_or_else(|| IntegrationError::push("Push server response has no tickets"))
    }
}
