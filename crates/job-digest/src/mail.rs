//! Mail transports for digest delivery.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::TransportError;

/// Sends a composed email.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Name used in log events.
    fn name(&self) -> &'static str;

    /// Send a multipart email with plain-text and HTML alternatives.
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), TransportError>;
}

/// SMTP transport with STARTTLS.
pub struct SmtpTransport {
    config: SmtpConfig,
}

impl SmtpTransport {
    #[must_use]
    pub const fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(SmtpConfig::from_env()?))
    }

    /// Send a fixed test email to verify the SMTP settings.
    pub async fn send_test(&self, recipient: &str) -> Result<(), TransportError> {
        let subject = "Job Search Update - Test Email";
        let html_body = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; padding: 20px;">
    <div style="max-width: 600px; margin: 0 auto;">
        <h2 style="color: #2563eb;">Job Search Update</h2>
        <p style="color: #16a34a; font-weight: bold;">Email configuration is working!</p>
        <p>If you're seeing this, SMTP is configured correctly for job digests.</p>
    </div>
</body>
</html>
"#;
        let text_body = "Job Search Update - Test Email\n\n\
            Email configuration is working!\n\
            If you're seeing this, SMTP is configured correctly for job digests.\n";

        self.send(recipient, subject, text_body, html_body).await
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| TransportError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl MailTransport for SmtpTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), TransportError> {
        let from = parse_mailbox(&self.config.from_email)?;
        let to = parse_mailbox(recipient)?;

        // Build multipart message with both HTML and plain text
        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| TransportError::Message(e.to_string()))?;

        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
                .map_err(|e| TransportError::Smtp(e.to_string()))?
                .port(self.config.port)
                .credentials(creds)
                .build();

        mailer
            .send(email)
            .await
            .map_err(|e| TransportError::Smtp(e.to_string()))?;

        tracing::info!(
            component = "mail.smtp",
            to = recipient,
            subject,
            "Email sent successfully"
        );

        Ok(())
    }
}

/// Transport that logs the message instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), TransportError> {
        parse_mailbox(recipient)?;
        tracing::info!(
            component = "mail.log",
            to = recipient,
            subject,
            text_len = text_body.len(),
            html_len = html_body.len(),
            "Dry run: email not sent"
        );
        tracing::debug!(component = "mail.log", body = text_body, "Dry run text body");
        Ok(())
    }
}
