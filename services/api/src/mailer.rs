//! SMTP relay for support form notifications

use anyhow::Result;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::env;
use std::time::Duration;
use tracing::info;

use market::support::NewSupportRequest;

/// SMTP settings for the support mailbox
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS when true, STARTTLS otherwise
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub to: String,
    pub from: String,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl MailerConfig {
    /// Create a new MailerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SUPPORT_SMTP_HOST` (default: smtp.hostinger.com)
    /// - `SUPPORT_SMTP_PORT` (default: 465)
    /// - `SUPPORT_SMTP_SECURE` (default: true)
    /// - `SUPPORT_SMTP_USER`, `SUPPORT_SMTP_PASS`
    /// - `SUPPORT_TO_EMAIL`, `SUPPORT_FROM_EMAIL` (default: support@agribuyx.com)
    pub fn from_env() -> Self {
        Self {
            host: non_empty_var("SUPPORT_SMTP_HOST")
                .unwrap_or_else(|| "smtp.hostinger.com".to_string()),
            port: non_empty_var("SUPPORT_SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(465),
            secure: non_empty_var("SUPPORT_SMTP_SECURE")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            user: non_empty_var("SUPPORT_SMTP_USER"),
            password: non_empty_var("SUPPORT_SMTP_PASS"),
            to: non_empty_var("SUPPORT_TO_EMAIL")
                .unwrap_or_else(|| "support@agribuyx.com".to_string()),
            from: non_empty_var("SUPPORT_FROM_EMAIL")
                .unwrap_or_else(|| "support@agribuyx.com".to_string()),
        }
    }

    /// Relay is attempted only with both credentials set
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some(Credentials::new(user.clone(), password.clone())),
            _ => None,
        }
    }
}

/// Sends support notifications to the support mailbox
#[derive(Clone)]
pub struct SupportMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    to: Mailbox,
}

impl SupportMailer {
    pub fn new(config: &MailerConfig) -> Result<Self> {
        let from: Mailbox = config.from.parse()?;
        let to: Mailbox = config.to.parse()?;

        let transport = match config.credentials() {
            Some(credentials) => {
                let builder = if config.secure {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
                };

                Some(
                    builder
                        .port(config.port)
                        .credentials(credentials)
                        .timeout(Some(Duration::from_secs(15)))
                        .build(),
                )
            }
            None => {
                info!("SMTP credentials not set; support emails will not be relayed");
                None
            }
        };

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Build the notification for a support request
    pub fn compose(&self, request: &NewSupportRequest) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(request.notification_subject())
            .header(ContentType::TEXT_PLAIN);

        // Replies go to the visitor when their address parses.
        if let Ok(reply_to) = request.email.parse::<Mailbox>() {
            builder = builder.reply_to(reply_to);
        }

        Ok(builder.body(request.notification_body())?)
    }

    /// Relay a support request; `Ok(false)` when relaying is disabled
    pub async fn send(&self, request: &NewSupportRequest) -> Result<bool> {
        let Some(transport) = &self.transport else {
            return Ok(false);
        };

        let message = self.compose(request)?;
        transport.send(message).await?;
        info!("Relayed support request from {}", request.email);
        Ok(true)
    }
}
