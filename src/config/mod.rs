#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{IntegrationError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_STORAGE_BASE_URL: &str = "https://storage.googleapis.com";
pub const DEFAULT_PAYMENT_BASE_URL: &str = "https://api.paystack.co";
pub const DEFAULT_PUSH_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub payment: PaymentConfig,
    #[serde(default)]
    pub push: PushConfig,
    pub email: EmailConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    #[serde(default = "default_storage_base_url")]
    pub public_base_url: String,
    #[serde(default = "default_storage_base_url")]
    pub endpoint: String,
    #[serde(default = "default_storage_region")]
    pub region: String,
    pub hmac_access_key: Option<String>,
    pub hmac_secret: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub secret_key: String,
    #[serde(default = "default_payment_base_url")]
    pub base_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_payment_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PushConfig {
    #[serde(default = "default_push_endpoint")]
    pub endpoint: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// 直接以 TLS 連線
    #[default]
    Tls,
    StartTls,
}

impl std::str::FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tls" => Ok(Self::Tls),
            "starttls" => Ok(Self::StartTls),
            other => Err(format!("unknown SMTP security mode: {}", other)),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default)]
    pub security: SmtpSecurity,
}

fn default_storage_base_url() -> String {
    DEFAULT_STORAGE_BASE_URL.to_string()
}

fn default_storage_region() -> String {
    "auto".to_string()
}

fn default_payment_base_url() -> String {
    DEFAULT_PAYMENT_BASE_URL.to_string()
}

fn default_currency() -> String {
    "NGN".to_string()
}

fn default_payment_timeout() -> u64 {
    30
}

fn default_push_endpoint() -> String {
    DEFAULT_PUSH_ENDPOINT.to_string()
}

fn default_smtp_port() -> u16 {
    2525
}

fn default_from_name() -> String {
    "SafeGuard".to_string()
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: default_push_endpoint(),
            access_token: None,
        }
    }
}

impl StorageConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            public_base_url: default_storage_base_url(),
            endpoint: default_storage_base_url(),
            region: default_storage_region(),
            hmac_access_key: None,
            hmac_secret: None,
        }
    }
}

impl PaymentConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: default_payment_base_url(),
            currency: default_currency(),
            timeout_seconds: default_payment_timeout(),
        }
    }
}

impl EmailConfig {
    pub fn new(host: impl Into<String>, from_email: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_smtp_port(),
            username: None,
            password: None,
            from_email: from_email.into(),
            from_name: default_from_name(),
            security: SmtpSecurity::default(),
        }
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    if secret.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}

// 金鑰一律不輸出到日誌
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("public_base_url", &self.public_base_url)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("hmac_access_key", &redact(&self.hmac_access_key))
            .field("hmac_secret", &redact(&self.hmac_secret))
            .finish()
    }
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("currency", &self.currency)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl std::fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushConfig")
            .field("endpoint", &self.endpoint)
            .field("access_token", &redact(&self.access_token))
            .finish()
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("security", &self.security)
            .finish()
    }
}

impl AppConfig {
    /// 從環境變數載入配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 以任意查詢函式載入配置 (測試時可傳入 HashMap)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| validation::validate_required_field(key, &get(key)).cloned();

        let storage = StorageConfig {
            bucket: required("STORAGE_BUCKET")?,
            public_base_url: get("STORAGE_PUBLIC_BASE_URL").unwrap_or_else(default_storage_base_url),
            endpoint: get("STORAGE_ENDPOINT").unwrap_or_else(default_storage_base_url),
            region: get("STORAGE_REGION").unwrap_or_else(default_storage_region),
            hmac_access_key: get("STORAGE_HMAC_ACCESS_KEY"),
            hmac_secret: get("STORAGE_HMAC_SECRET"),
        };

        let payment = PaymentConfig {
            secret_key: required("PAYMENT_SECRET_KEY")?,
            base_url: get("PAYMENT_BASE_URL").unwrap_or_else(default_payment_base_url),
            currency: get("PAYMENT_CURRENCY").unwrap_or_else(default_currency),
            timeout_seconds: match get("PAYMENT_TIMEOUT_SECONDS") {
                Some(raw) => parse_value("PAYMENT_TIMEOUT_SECONDS", &raw)?,
                None => default_payment_timeout(),
            },
        };

        let push = PushConfig {
            endpoint: get("PUSH_ENDPOINT").unwrap_or_else(default_push_endpoint),
            access_token: get("PUSH_ACCESS_TOKEN"),
        };

        let email = EmailConfig {
            host: required("SMTP_HOST")?,
            port: match get("SMTP_PORT") {
                Some(raw) => parse_value("SMTP_PORT", &raw)?,
                None => default_smtp_port(),
            },
            username: get("SMTP_USERNAME"),
            password: get("SMTP_PASSWORD"),
            from_email: required("SMTP_FROM_EMAIL")?,
            from_name: get("SMTP_FROM_NAME").unwrap_or_else(default_from_name),
            security: match get("SMTP_SECURITY") {
                Some(raw) => parse_value("SMTP_SECURITY", &raw)?,
                None => SmtpSecurity::default(),
            },
        };

        Ok(Self {
            storage,
            payment,
            push,
            email,
        })
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IntegrationError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| IntegrationError::InvalidConfigValueError {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PAYMENT_SECRET_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| IntegrationError::config(e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

fn parse_value<T>(field: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| IntegrationError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_bucket_name("storage.bucket", &self.storage.bucket)?;
        validation::validate_url("storage.public_base_url", &self.storage.public_base_url)?;
        validation::validate_url("storage.endpoint", &self.storage.endpoint)?;

        validation::validate_non_empty_string("payment.secret_key", &self.payment.secret_key)?;
        validation::validate_url("payment.base_url", &self.payment.base_url)?;
        validation::validate_positive_number("payment.timeout_seconds", self.payment.timeout_seconds, 1)?;
        if self.payment.currency.len() != 3
            || !self.payment.currency.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(IntegrationError::InvalidConfigValueError {
                field: "payment.currency".to_string(),
                value: self.payment.currency.clone(),
                reason: "Currency must be a three-letter ISO 4217 code".to_string(),
            });
        }

        validation::validate_url("push.endpoint", &self.push.endpoint)?;

        validation::validate_non_empty_string("email.host", &self.email.host)?;
        validation::validate_range("email.port", self.email.port, 1, u16::MAX)?;
        validation::validate_email("email.from_email", &self.email.from_email)?;
        if self.email.username.is_some() != self.email.password.is_some() {
            return Err(IntegrationError::config(
                "email.username and email.password must be set together",
            ));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
