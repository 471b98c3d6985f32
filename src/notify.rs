use crate::models::SavedPreference;
use crate::settings::{required, Settings, SettingsError};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

/// SMTP reply codes meaning the login was refused (530, 534, 535)
const AUTH_FAILURE_CODE_PREFIX: &str = "53";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Authentication failed. Check the e-mail app password. ({0})")]
    Authentication(String),

    #[error("An error occurred while trying to send an email: {0}")]
    Transport(String),

    #[error("Could not compose the email: {0}")]
    Compose(String),
}

/// The notification sent when a saved search finds deals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealsEmail {
    pub recipient_name: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl DealsEmail {
    pub fn new(preference: &SavedPreference, listing: &str) -> Self {
        let symbol = preference.criteria.currency.symbol();
        Self {
            recipient_name: preference.name.clone(),
            recipient: preference.email.clone(),
            subject: format!(
                "We found new deals below your target price of {}{}!",
                preference.target_price, symbol
            ),
            body: format!(
                "Hi {},\n\nWe found some deals that you might be interested in:\n\n{}\nBest wishes,\nHotels Deals Finder.",
                preference.name, listing
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &DealsEmail) -> Result<(), EmailError>;
}

/// Submits mail over SMTP with implicit TLS
pub struct SmtpMailer {
    sender: Address,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let username = required(&settings.email_username, "email_username")?;
        let password = required(&settings.email_app_passcode, "email_app_passcode")?;

        let sender = username
            .parse::<Address>()
            .map_err(|e| SettingsError::Invalid {
                key: "email_username",
                reason: e.to_string(),
            })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
            .map_err(|e| SettingsError::Invalid {
                key: "smtp_host",
                reason: e.to_string(),
            })?
            .port(settings.smtp_port)
            .credentials(Credentials::new(username.to_owned(), password.to_owned()))
            .build();

        Ok(Self { sender, transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &DealsEmail) -> Result<(), EmailError> {
        let message = message(&self.sender, email)?;
        self.transport.send(message).await.map_err(|e| {
            let status = e.status().map(|code| code.to_string());
            classify(status.as_deref(), e.to_string())
        })?;

        info!("📧 Sent deals to {}", email.recipient);
        Ok(())
    }
}

fn message(sender: &Address, email: &DealsEmail) -> Result<Message, EmailError> {
    let to = email
        .recipient
        .parse::<Address>()
        .map_err(|e| EmailError::Compose(e.to_string()))?;

    Message::builder()
        .from(Mailbox::new(None, sender.clone()))
        .to(Mailbox::new(Some(email.recipient_name.clone()), to))
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| EmailError::Compose(e.to_string()))
}

/// Splits refused logins from every other failure by SMTP reply code
fn classify(status: Option<&str>, detail: String) -> EmailError {
    match status {
        Some(code) if code.starts_with(AUTH_FAILURE_CODE_PREFIX) => {
            EmailError::Authentication(detail)
        }
        _ => EmailError::Transport(detail),
    }
}
