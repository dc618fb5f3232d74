//! Job search digest crate.
//!
//! This crate provides:
//! - Selection of the top-scoring new job postings from a job store
//! - HTML digest rendering with a Handlebars email template
//! - Email delivery over SMTP
//! - Write-back of notification state so jobs are only sent once
//!
//! The job store, mail transport, reference documents and clock are traits,
//! so every collaborator can be swapped for a fake in tests.

pub mod clock;
pub mod config;
pub mod error;
pub mod jobs;
pub mod mail;
pub mod pipeline;
pub mod reference;
pub mod render;
pub mod state;

// Re-export main types
pub use config::{DigestConfig, SmtpConfig};
pub use error::{DigestError, ReferenceError, StoreError, TransportError};
pub use jobs::{JobRecord, JobStatus, JobStore, JsonFileJobStore, MemoryJobStore};
pub use mail::{LogTransport, MailTransport, SmtpTransport};
pub use pipeline::{DigestOutcome, DigestPipeline};
pub use reference::{FileReferenceStore, ReferenceDocumentStore};
pub use render::{DigestEmail, DigestRenderer};
