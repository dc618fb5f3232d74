//! Digest pipeline - orchestrates the validate-select-render-send-update flow.

use std::sync::Arc;

use crate::clock::{format_date, Clock, SystemClock};
use crate::config::DigestConfig;
use crate::error::{DigestError, Result};
use crate::jobs::{select_digest, JobRecord, JobStore};
use crate::mail::MailTransport;
use crate::reference::ReferenceDocumentStore;
use crate::render::{DigestEmail, DigestRenderer, EmailTemplate};
use crate::state::update_notified_jobs;

/// Result of a digest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestOutcome {
    /// Nothing was eligible; no email was sent and the store is untouched.
    NoEligibleJobs,
    /// A digest was sent and the store updated.
    Sent {
        /// Jobs in the digest set.
        emailed: usize,
        /// Table rows rendered (jobs without title or link are skipped).
        rendered: usize,
        /// Store rows marked notified.
        updated: usize,
    },
}

impl DigestOutcome {
    /// Number of jobs emailed.
    #[must_use]
    pub const fn emailed(&self) -> usize {
        match self {
            Self::NoEligibleJobs => 0,
            Self::Sent { emailed, .. } => *emailed,
        }
    }
}

/// Digest pipeline orchestrator.
pub struct DigestPipeline {
    config: DigestConfig,
    store: Arc<dyn JobStore>,
    transport: Arc<dyn MailTransport>,
    references: Arc<dyn ReferenceDocumentStore>,
    clock: Arc<dyn Clock>,
}

impl DigestPipeline {
    /// Create a new pipeline using the system clock.
    #[must_use]
    pub fn new(
        config: DigestConfig,
        store: Arc<dyn JobStore>,
        transport: Arc<dyn MailTransport>,
        references: Arc<dyn ReferenceDocumentStore>,
    ) -> Self {
        Self {
            config,
            store,
            transport,
            references,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// Run a single digest pass.
    ///
    /// The store is only updated after the email was sent, so a send failure
    /// never marks jobs as notified.
    pub async fn run(&self) -> Result<DigestOutcome> {
        tracing::info!(
            component = "pipeline",
            category = "Email Processing",
            "Starting job digest"
        );

        let result = self.run_inner().await;
        if let Err(e) = &result {
            let category = match e {
                DigestError::StoreUpdate(_) => "Inconsistent State",
                _ => "Email Failed",
            };
            tracing::error!(
                component = "pipeline",
                category,
                error = %e,
                "Failed to send digest"
            );
        }
        result
    }

    async fn run_inner(&self) -> Result<DigestOutcome> {
        let Some(digest) = self.select().await? else {
            return Ok(DigestOutcome::NoEligibleJobs);
        };

        let today = format_date(&self.clock.now(), &self.config.date_format);
        let email = self.renderer()?.render(&digest, &self.config, &today).await?;

        self.transport
            .send(
                &self.config.email_recipient,
                &email.subject,
                &email.text_body,
                &email.html_body,
            )
            .await?;

        // Every selected job is marked, including rows skipped while
        // rendering for a missing title or link. Those jobs were never
        // shown to the recipient but will not be offered again.
        let updated = update_notified_jobs(self.store.as_ref(), &digest, &today)
            .await
            .map_err(DigestError::StoreUpdate)?;

        tracing::info!(
            component = "pipeline",
            category = "Email Sent",
            emailed = digest.len(),
            rendered = email.rendered_rows,
            updated,
            transport = self.transport.name(),
            "Sent digest"
        );

        Ok(DigestOutcome::Sent {
            emailed: digest.len(),
            rendered: email.rendered_rows,
            updated,
        })
    }

    /// Validate, read and select without side effects.
    ///
    /// Returns `None` when no job is eligible.
    pub async fn select(&self) -> Result<Option<Vec<JobRecord>>> {
        self.config.validate()?;

        let jobs = self
            .store
            .read_all()
            .await
            .map_err(DigestError::StoreUnavailable)?;

        let digest = select_digest(&jobs, self.config.min_score, self.config.top_n);
        if digest.is_empty() {
            tracing::info!(
                component = "pipeline",
                category = "No Data",
                rows = jobs.len(),
                "No eligible jobs to email"
            );
            return Ok(None);
        }
        Ok(Some(digest))
    }

    /// Compose the email the next run would send, without sending it or
    /// touching the store.
    pub async fn preview(&self) -> Result<Option<DigestEmail>> {
        let Some(digest) = self.select().await? else {
            return Ok(None);
        };
        let today = format_date(&self.clock.now(), &self.config.date_format);
        let email = self.renderer()?.render(&digest, &self.config, &today).await?;
        Ok(Some(email))
    }

    fn renderer(&self) -> Result<DigestRenderer> {
        let template = match &self.config.template_path {
            Some(path) => EmailTemplate::from_file(path)?,
            None => EmailTemplate::new()?,
        };
        Ok(DigestRenderer::new(template, Arc::clone(&self.references)))
    }
}
