//! Configuration for digest runs and SMTP delivery.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::clock::validate_date_format;
use crate::error::DigestError;
use crate::reference::DEFAULT_EXCERPT_LENGTH;

/// Default Gmail SMTP host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default Gmail SMTP port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Default number of jobs per digest.
pub const DEFAULT_TOP_N: usize = 10;

/// Default date pattern for subjects and `dateNotified`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of a digest run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Recipient email address.
    #[serde(alias = "emailRecipient")]
    pub email_recipient: String,
    /// Maximum jobs per digest.
    #[serde(alias = "topN")]
    pub top_n: usize,
    /// Minimum score (inclusive) for a job to be eligible.
    #[serde(alias = "minScore")]
    pub min_score: f64,
    /// strftime pattern for the subject date and `dateNotified`.
    #[serde(alias = "dateFormat")]
    pub date_format: String,
    /// Cover letter quoted in the text body.
    #[serde(alias = "coverLetterReferenceId", alias = "coverLetterDocId")]
    pub cover_letter_reference_id: String,
    /// Characters of the cover letter to quote.
    #[serde(alias = "excerptLength")]
    pub excerpt_length: usize,
    /// Optional Handlebars template replacing the embedded one.
    #[serde(alias = "templatePath")]
    pub template_path: Option<PathBuf>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            email_recipient: String::new(),
            top_n: DEFAULT_TOP_N,
            min_score: 0.0,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            cover_letter_reference_id: String::new(),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            template_path: None,
        }
    }
}

impl DigestConfig {
    /// Create configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `DIGEST_TO_EMAIL`: Recipient
    /// - `DIGEST_COVER_LETTER_ID`: Cover letter document id
    ///
    /// # Optional Environment Variables
    /// - `DIGEST_TOP_N`: Jobs per digest (default: 10)
    /// - `DIGEST_MIN_SCORE`: Score threshold (default: 0)
    /// - `DIGEST_DATE_FORMAT`: strftime pattern (default: %Y-%m-%d)
    /// - `DIGEST_EXCERPT_LENGTH`: Cover letter excerpt length (default: 500)
    /// - `DIGEST_TEMPLATE_PATH`: Custom email template
    ///
    /// Required values are not checked here; see [`DigestConfig::validate`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let top_n = match std::env::var("DIGEST_TOP_N") {
            Ok(v) => v.parse().context("DIGEST_TOP_N must be a non-negative integer")?,
            Err(_) => defaults.top_n,
        };

        let min_score = match std::env::var("DIGEST_MIN_SCORE") {
            Ok(v) => v.parse().context("DIGEST_MIN_SCORE must be a number")?,
            Err(_) => defaults.min_score,
        };

        let excerpt_length = std::env::var("DIGEST_EXCERPT_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.excerpt_length);

        Ok(Self {
            email_recipient: std::env::var("DIGEST_TO_EMAIL").unwrap_or_default(),
            top_n,
            min_score,
            date_format: std::env::var("DIGEST_DATE_FORMAT").unwrap_or(defaults.date_format),
            cover_letter_reference_id: std::env::var("DIGEST_COVER_LETTER_ID").unwrap_or_default(),
            excerpt_length,
            template_path: std::env::var_os("DIGEST_TEMPLATE_PATH").map(PathBuf::from),
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Check required fields before any side effect.
    pub fn validate(&self) -> Result<(), DigestError> {
        let mut missing = Vec::new();
        if self.email_recipient.trim().is_empty() {
            missing.push("emailRecipient");
        }
        if self.top_n == 0 {
            missing.push("topN");
        }
        if self.cover_letter_reference_id.trim().is_empty() {
            missing.push("coverLetterReferenceId");
        }
        if !missing.is_empty() {
            return Err(DigestError::Config(format!(
                "missing required config: {}",
                missing.join(", ")
            )));
        }

        if self.min_score.is_nan() {
            return Err(DigestError::Config("minScore must be a number".to_string()));
        }
        validate_date_format(&self.date_format).map_err(DigestError::Config)?;

        Ok(())
    }
}

/// SMTP delivery settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// SMTP username (Gmail address).
    pub username: String,
    /// SMTP password (Gmail app password).
    pub password: String,
    /// Sender email address (usually same as username).
    pub from_email: String,
}

impl SmtpConfig {
    /// Create SMTP settings from environment variables.
    ///
    /// # Required Environment Variables
    /// - `GMAIL_USERNAME`: Account used for sending
    /// - `GMAIL_APP_PASSWORD`: App password (not the account password)
    ///
    /// # Optional Environment Variables
    /// - `SMTP_HOST`: Server (default: smtp.gmail.com)
    /// - `SMTP_PORT`: Port (default: 587)
    /// - `DIGEST_FROM_EMAIL`: Sender (default: the username)
    pub fn from_env() -> Result<Self> {
        let username = std::env::var("GMAIL_USERNAME")
            .context("GMAIL_USERNAME environment variable not set")?;

        let password = std::env::var("GMAIL_APP_PASSWORD")
            .context("GMAIL_APP_PASSWORD environment variable not set")?;

        let host = std::env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string());

        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        let from_email = std::env::var("DIGEST_FROM_EMAIL").unwrap_or_else(|_| username.clone());

        Ok(Self {
            host,
            port,
            username,
            password,
            from_email,
        })
    }
}
