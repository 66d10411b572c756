//! Transactional email for account lifecycle events.
//!
//! Delivery is fire-and-forget: [`Notifier::notify`] hands the message to a
//! spawned task and returns at once. Failures are logged and go no further.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Welcome,
    Cancellation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
}

impl EmailMessage {
    /// Fills the fixed template for `kind`.
    pub fn compose(kind: EmailKind, from: &str, recipient: &str, name: &str) -> Self {
        let (subject, text) = match kind {
            EmailKind::Welcome => (
                "Thanks for joining in!",
                format!("Welcome to the app, {name}. Let me know how you get along with the app."),
            ),
            EmailKind::Cancellation => (
                "Sorry to see you go",
                format!("Goodbye, {name}. Please do let us know the reason why you cancel."),
            ),
        };
        Self {
            to: recipient.to_string(),
            from: from.to_string(),
            subject: subject.to_string(),
            text,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider rejected message with status {0}")]
    Rejected(reqwest::StatusCode),
}

#[async_trait]
pub trait EmailDelivery: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError>;
}

/// Sends through the SendGrid v3 mail-send API.
pub struct SendGridClient {
    http: reqwest::Client,
    api_key: String,
}

impl SendGridClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl EmailDelivery for SendGridClient {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": message.from },
            "subject": message.subject,
            "content": [{ "type": "text/plain", "value": message.text }],
        });
        let response = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DeliveryError::Rejected(response.status()));
        }
        Ok(())
    }
}

/// Used when no provider is configured: the message is only logged.
pub struct LogDelivery;

#[async_trait]
impl EmailDelivery for LogDelivery {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        log::info!(
            "email to {} (not sent, no provider configured): {}",
            message.to,
            message.subject
        );
        Ok(())
    }
}

/// Composes lifecycle emails and dispatches them in the background.
#[derive(Clone)]
pub struct Notifier {
    delivery: Arc<dyn EmailDelivery>,
    from: String,
}

impl Notifier {
    pub fn new(delivery: Arc<dyn EmailDelivery>, from: impl Into<String>) -> Self {
        Self {
            delivery,
            from: from.into(),
        }
    }

    /// Must be called from within the actix runtime.
    pub fn notify(&self, kind: EmailKind, recipient: &str, name: &str) {
        let message = EmailMessage::compose(kind, &self.from, recipient, name);
        let delivery = Arc::clone(&self.delivery);
        actix_web::rt::spawn(async move {
            let to = message.to.clone();
            if let Err(e) = delivery.send(message).await {
                log::warn!("failed to deliver {:?} email to {}: {}", kind, to, e);
            }
        });
    }
}
