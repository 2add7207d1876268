use crate::core::templates;
use crate::core::{EmailMessage, MailTransport};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::{Address, Message};

pub struct EmailClient<T: MailTransport> {
    transport: T,
    from: Mailbox,
}

impl<T: MailTransport> EmailClient<T> {
    pub fn new(transport: T, from_email: &str, from_name: &str) -> Result<Self> {
        let address: Address = from_email.parse()?;
        Ok(Self {
            transport,
            from: Mailbox::new(Some(from_name.to_string()), address),
        })
    }

    pub fn from_mailbox(&self) -> &Mailbox {
        &self.from
    }

    /// 組出 multipart/alternative 郵件：純文字一定有，HTML 為選填
    pub fn build_message(&self, email: &EmailMessage) -> Result<Message> {
        let to: Mailbox = email.to.parse()?;

        let mut body = MultiPart::alternative().singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_PLAIN)
                .body(email.text.clone()),
        );
        if let Some(html) = &email.html {
            body = body.singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(html.clone()),
            );
        }

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .multipart(body)?;
        Ok(message)
    }

    pub async fn try_send(&self, email: &EmailMessage) -> Result<()> {
        let message = self.build_message(email)?;
        self.transport.deliver(message).await?;
        tracing::info!("Email sent successfully to {}", email.to);
        Ok(())
    }

    /// 寄送失敗只記錄日誌並回傳 false
    pub async fn send(&self, to: &str, subject: &str, text: &str, html: Option<&str>) -> bool {
        let mut email = EmailMessage::new(to, subject, text);
        if let Some(html) = html {
            email = email.with_html(html);
        }

        match self.try_send(&email).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Email send error: {}", e);
                false
            }
        }
    }

    pub async fn send_panic_alert(
        &self,
        to: &str,
        reporter_name: &str,
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
    ) -> bool {
        let rendered = templates::panic_alert(reporter_name, latitude, longitude, timestamp);
        self.send(to, &rendered.subject, &rendered.text, Some(&rendered.html))
            .await
    }

    pub async fn send_payment_confirmation(&self, to: &str, amount: f64, reference: &str) -> bool {
        let rendered = templates::payment_confirmation(amount, reference);
        self.send(to, &rendered.subject, &rendered.text, Some(&rendered.html))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::IntegrationError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockMailer {
        sent: Arc<Mutex<Vec<Message>>>,
        fail: bool,
    }

    #[async_trait]
    impl MailTransport for MockMailer {
        async fn deliver(&self, message: Message) -> Result<()> {
            if self.fail {
                return Err(IntegrationError::config("SMTP relay unavailable"));
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn client(mailer: MockMailer) -> EmailClient<MockMailer> {
        EmailClient::new(mailer, "alerts@example.com", "SafeGuard").unwrap()
    }

    #[test]
    fn test_rejects_invalid_sender() {
        assert!(EmailClient::new(MockMailer::default(), "nope", "SafeGuard").is_err());
    }

    #[tokio::test]
    async fn test_send_plain_and_html() {
        let mailer = MockMailer::default();
        let sent = mailer.sent.clone();
        let email = client(mailer);

        let ok = email
            .send("user@example.com", "Hello", "plain body", Some("<p>html body</p>"))
            .await;
        assert!(ok);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let raw = String::from_utf8(sent[0].formatted()).unwrap();
        assert!(raw.contains("From: SafeGuard <alerts@example.com>"));
        assert!(raw.contains("To: user@example.com"));
        assert!(raw.contains("Subject: Hello"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("plain body"));
    }

    #[tokio::test]
    async fn test_send_without_html_has_single_part() {
        let mailer = MockMailer::default();
        let sent = mailer.sent.clone();
        let email = client(mailer);

        assert!(email.send("user@example.com", "Hi", "text only", None).await);

        let raw = String::from_utf8(sent.lock().unwrap()[0].formatted()).unwrap();
        assert!(raw.contains("text/plain"));
        assert!(!raw.contains("text/html"));
    }

    #[tokio::test]
    async fn test_send_returns_false_on_transport_error() {
        let email = client(MockMailer {
            fail: true,
            ..Default::default()
        });
        assert!(!email.send("user@example.com", "Hi", "body", None).await);
    }

    #[tokio::test]
    async fn test_send_returns_false_on_bad_recipient() {
        let mailer = MockMailer::default();
        let sent = mailer.sent.clone();
        let email = client(mailer);

        assert!(!email.send("not an address", "Hi", "body", None).await);
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_try_send_exposes_cause() {
        let email = client(MockMailer::default());
        let err = email
            .try_send(&EmailMessage::new("bad", "s", "t"))
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::AddressError(_)));
    }

    #[tokio::test]
    async fn test_panic_alert_is_delivered() {
        let mailer = MockMailer::default();
        let sent = mailer.sent.clone();
        let email = client(mailer);

        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert!(
            email
                .send_panic_alert("guard@example.com", "Tunde", 6.45, 3.39, timestamp)
                .await
        );

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let raw = String::from_utf8(sent[0].formatted()).unwrap();
        assert!(raw.contains("To: guard@example.com"));
        assert!(raw.contains("text/html"));
    }

    #[tokio::test]
    async fn test_payment_confirmation_is_delivered() {
        let mailer = MockMailer::default();
        let sent = mailer.sent.clone();
        let email = client(mailer);

        assert!(
            email
                .send_payment_confirmation("payer@example.com", 2000.0, "PSK-1")
                .await
        );
        assert_eq!(sent.lock().unwrap().len(), 1);
    }
}
