//! Error types for the digest pipeline.

use thiserror::Error;

/// Errors raised by a [`JobStore`](crate::jobs::JobStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing data could not be parsed or serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Update targeted an id that is not in the store
    #[error("Job not found: {0}")]
    NotFound(String),

    /// Store is unreachable or misconfigured
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a [`MailTransport`](crate::mail::MailTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Sender or recipient is not a valid mailbox
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Message could not be assembled
    #[error("Failed to build email message: {0}")]
    Message(String),

    /// SMTP exchange failed
    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// Soft failure while reading a reference document.
///
/// Never aborts a run: the renderer logs it and uses an empty excerpt.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Identifier is empty or would escape the document directory
    #[error("Invalid reference id: {0:?}")]
    InvalidId(String),

    /// No document exists for the identifier
    #[error("Reference document not found: {0}")]
    NotFound(String),

    /// Reading the document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal errors of a digest run.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Required configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Job store could not be read
    #[error("Job store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// Digest could not be rendered
    #[error("Render error: {0}")]
    Render(String),

    /// Email could not be sent
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Email was sent but notification state could not be written back
    #[error("Job store update failed after email was sent: {0}")]
    StoreUpdate(#[source] StoreError),
}

impl From<handlebars::RenderError> for DigestError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Render(format!("template rendering failed: {err}"))
    }
}

impl From<handlebars::TemplateError> for DigestError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Render(format!("invalid email template: {err}"))
    }
}

/// Result alias for digest operations.
pub type Result<T, E = DigestError> = std::result::Result<T, E>;
