// Best-effort delivery of rendered reports over SMTP

use std::path::Path;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

// SMTP credentials, loaded from their own JSON file so report configs
// can be shared without leaking the sender password.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub sender_email: String,
    pub password: String,
}

impl EmailConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}

// Delivery seam for rendered reports. Failures are for the caller to
// log; a lost notification never aborts a scan.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn send(
        &self,
        body: &str,
        recipients: &[String],
        subject: &str,
    ) -> Result<(), NotifyError>;
}

// STARTTLS SMTP sender built from an explicit config struct.
pub struct EmailNotifier {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Result<Self, NotifyError> {
        let sender: Mailbox = config.sender_email.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.sender_email, config.password))
            .build();
        Ok(Self { sender, transport })
    }
}

#[async_trait]
impl Notify for EmailNotifier {
    async fn send(
        &self,
        body: &str,
        recipients: &[String],
        subject: &str,
    ) -> Result<(), NotifyError> {
        let mut message = Message::builder()
            .from(self.sender.clone())
            .subject(subject);
        for recipient in recipients {
            message = message.to(recipient.parse()?);
        }
        let message = message.body(body.to_string())?;

        self.transport.send(message).await?;
        tracing::info!(recipients = recipients.len(), subject, "report email sent");
        Ok(())
    }
}
