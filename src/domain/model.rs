use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

const PUSH_TOKEN_PREFIX: &str = "ExponentPushToken[";
const PUSH_TOKEN_SUFFIX: &str = "]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
    pub folder: String,
}

impl UploadRequest {
    pub fn new(data: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            data,
            filename: filename.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            folder: DEFAULT_UPLOAD_FOLDER.to_string(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// 物件在 bucket 內的路徑: `folder/filename`
    pub fn object_path(&self) -> String {
        format!("{}/{}", self.folder, self.filename)
    }
}

/// 上傳結果：成功寫入，或是後端不可用時的預設 URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Stored(String),
    Fallback(String),
}

impl UploadOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Stored(url) | Self::Fallback(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            Self::Stored(url) | Self::Fallback(url) => url,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// 金額以最小貨幣單位表示 (例如 kobo)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub email: String,
    pub amount: u64,
    pub reference: Option<String>,
    pub callback_url: Option<String>,
}

impl TransactionRequest {
    pub fn new(email: impl Into<String>, amount: u64) -> Self {
        Self {
            email: email.into(),
            amount,
            reference: None,
            callback_url: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }
}

pub fn is_valid_token(token: &str) -> bool {
    token.starts_with(PUSH_TOKEN_PREFIX) && token.ends_with(PUSH_TOKEN_SUFFIX)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PushToken(String);

impl PushToken {
    pub fn parse(token: &str) -> Option<Self> {
        is_valid_token(token).then(|| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PushToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushPriority {
    Default,
    Normal,
    #[default]
    High,
}

impl std::str::FromStr for PushPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(format!("unknown push priority: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub to: PushToken,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
    pub priority: PushPriority,
    pub sound: String,
    pub badge: u32,
}

/// 推播服務對單一訊息的回應
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PushTicket {
    Ok {
        id: String,
    },
    Error {
        message: String,
        #[serde(default)]
        details: Option<serde_json::Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushReceipt {
    pub token: String,
    pub status: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PushFailure {
    Token { token: String, error: String },
    Message(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushBatchResult {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<PushFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tickets: Vec<PushReceipt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        assert!(is_valid_token("ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"));
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("abc"));
        assert!(!is_valid_token("ExponentPushToken[123"));
        assert!(!is_valid_token("123]"));
        assert!(PushToken::parse("bad-token").is_none());
    }

    #[test]
    fn test_upload_request_defaults() {
        let request = UploadRequest::new(b"hello".to_vec(), "a.txt");
        assert_eq!(request.content_type, "application/octet-stream");
        assert_eq!(request.object_path(), "uploads/a.txt");

        let request = request.with_folder("evidence").with_content_type("text/plain");
        assert_eq!(request.object_path(), "evidence/a.txt");
    }

    #[test]
    fn test_push_ticket_deserialize() {
        let tickets: Vec<PushTicket> = serde_json::from_value(serde_json::json!([
            {"status": "ok", "id": "abc-123"},
            {"status": "error", "message": "not registered", "details": {"error": "DeviceNotRegistered"}}
        ]))
        .unwrap();

        assert_eq!(tickets[0], PushTicket::Ok { id: "abc-123".to_string() });
        assert!(matches!(&tickets[1], PushTicket::Error { message, .. } if message == "not registered"));
    }

    #[test]
    fn test_push_failure_serializes_like_provider_report() {
        let errors = vec![
            PushFailure::Message("All tokens are invalid".to_string()),
            PushFailure::Token {
                token: "ExponentPushToken[a]".to_string(),
                error: "boom".to_string(),
            },
        ];
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["All tokens are invalid", {"token": "ExponentPushToken[a]", "error": "boom"}])
        );
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<PushPriority>().unwrap(), PushPriority::High);
        assert_eq!(PushPriority::default(), PushPriority::High);
        assert!("urgent".parse::<PushPriority>().is_err());
    }

    #[test]
    fn test_empty_batch_result_has_no_tickets_key() {
        let result = PushBatchResult {
            failed: 2,
            errors: vec![PushFailure::Message("No valid push tokens".to_string())],
            ..Default::default()
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "success": 0,
                "failed": 2,
                "errors": ["No valid push tokens"]
            })
        );
    }
}
