use crate::adapters::{ExpoPushTransport, SmtpMailer};
use crate::config::AppConfig;
use crate::core::{email::EmailClient, payment::PaymentClient, push::PushDispatcher};
use crate::utils::error::Result;

#[cfg(feature = "gcs")]
use crate::adapters::GcsConnector;
#[cfg(feature = "gcs")]
use crate::core::storage::StorageClient;

/// 由同一份配置建立的四個正式環境客戶端
pub struct Integrations {
    #[cfg(feature = "gcs")]
    pub storage: StorageClient<GcsConnector>,
    pub payment: PaymentClient,
    pub push: PushDispatcher<ExpoPushTransport>,
    pub email: EmailClient<SmtpMailer>,
}

impl Integrations {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mailer = SmtpMailer::new(&config.email)?;
        let email = EmailClient::new(mailer, &config.email.from_email, &config.email.from_name)?;

        tracing::debug!("Integration clients constructed");

        Ok(Self {
            #[cfg(feature = "gcs")]
            storage: StorageClient::new(
                GcsConnector::new(config.storage.clone()),
                config.storage.bucket.clone(),
                config.storage.public_base_url.clone(),
            ),
            payment: PaymentClient::new(&config.payment),
            push: PushDispatcher::new(ExpoPushTransport::new(&config.push)),
            email,
        })
    }
}
