use crate::core::{
    PushBatchResult, PushFailure, PushMessage, PushPriority, PushReceipt, PushTicket, PushToken,
    PushTransport,
};

/// 推播服務單次請求的訊息上限
pub const PUSH_BATCH_SIZE: usize = 100;

const PUSH_SOUND: &str = "default";
const PUSH_BADGE: u32 = 1;

pub use crate::domain::model::is_valid_token;

pub struct PushDispatcher<T: PushTransport> {
    transport: T,
}

impl<T: PushTransport> PushDispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn is_valid_token(&self, token: &str) -> bool {
        is_valid_token(token)
    }

    /// 依序分批送出推播並彙整每個 token 的結果
    pub async fn dispatch<S: AsRef<str>>(
        &self,
        tokens: &[S],
        title: &str,
        body: &str,
        data: Option<serde_json::Value>,
        priority: PushPriority,
    ) -> PushBatchResult {
        if tokens.is_empty() {
            return PushBatchResult::default();
        }

        let valid_tokens: Vec<PushToken> = tokens
            .iter()
            .filter_map(|t| PushToken::parse(t.as_ref()))
            .collect();

        if valid_tokens.is_empty() {
            tracing::warn!("No valid tokens provided");
            return PushBatchResult {
                success: 0,
                failed: tokens.len(),
                errors: vec![PushFailure::Message("All tokens are invalid".to_string())],
                tickets: Vec::new(),
            };
        }

        let dropped = tokens.len() - valid_tokens.len();
        if dropped > 0 {
            tracing::warn!("Skipping {} malformed push tokens", dropped);
        }

        let data = data.unwrap_or_else(|| serde_json::Value::Object(Default::default()));
        let messages: Vec<PushMessage> = valid_tokens
            .into_iter()
            .map(|to| PushMessage {
                to,
                title: title.to_string(),
                body: body.to_string(),
                data: data.clone(),
                priority,
                sound: PUSH_SOUND.to_string(),
                badge: PUSH_BADGE,
            })
            .collect();

        let mut results = PushBatchResult::default();

        for batch in messages.chunks(PUSH_BATCH_SIZE) {
            match self.transport.publish_batch(batch).await {
                Ok(tickets) if tickets.len() == batch.len() => {
                    for (message, ticket) in batch.iter().zip(tickets) {
                        record_ticket(&mut results, message, ticket);
                    }
                }
                Ok(tickets) => {
                    let reason = format!(
                        "Push provider returned {} tickets for {} messages",
                        tickets.len(),
                        batch.len()
                    );
                    tracing::error!("Batch send error: {}", reason);
                    results.failed += batch.len();
                    results.errors.push(PushFailure::Message(reason));
                }
                Err(e) => {
                    tracing::error!("Batch send error: {}", e);
                    results.failed += batch.len();
                    results.errors.push(PushFailure::Message(e.to_string()));
                }
            }
        }

        tracing::info!(
            "Push notifications sent: {} success, {} failed",
            results.success,
            results.failed
        );
        results
    }
}

fn record_ticket(results: &mut PushBatchResult, message: &PushMessage, ticket: PushTicket) {
    match ticket {
        PushTicket::Ok { id } => {
            results.success += 1;
            results.tickets.push(PushReceipt {
                token: message.to.to_string(),
                status: "ok".to_string(),
                id,
            });
        }
        PushTicket::Error { message: error, .. } => {
            tracing::warn!("Push notification failed: {}", error);
            results.failed += 1;
            results.errors.push(PushFailure::Token {
                token: message.to.to_string(),
                error,
            });
        }
    }
}
