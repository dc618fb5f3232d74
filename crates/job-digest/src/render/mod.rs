//! Digest rendering: HTML table, email body and subject.

mod table;
mod template;

pub use table::{build_html_table, html_escape, JobsTable, COLUMNS};
pub use template::{EmailContext, EmailTemplate};

use std::sync::Arc;

use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::jobs::JobRecord;
use crate::reference::ReferenceDocumentStore;

/// Subject prefix; the formatted date is appended.
pub const SUBJECT_PREFIX: &str = "Job Search Update - ";

/// A composed digest email.
#[derive(Debug, Clone)]
pub struct DigestEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    /// Size of the digest set.
    pub job_count: usize,
    /// Rows that made it into the table.
    pub rendered_rows: usize,
}

/// Builds digest emails from a selected job set.
pub struct DigestRenderer {
    template: EmailTemplate,
    references: Arc<dyn ReferenceDocumentStore>,
}

impl DigestRenderer {
    #[must_use]
    pub fn new(template: EmailTemplate, references: Arc<dyn ReferenceDocumentStore>) -> Self {
        Self {
            template,
            references,
        }
    }

    /// Fetch the cover letter excerpt, or an empty string on failure.
    pub async fn cover_letter_excerpt(&self, reference_id: &str, max_len: usize) -> String {
        match self.references.get_excerpt(reference_id, max_len).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    component = "render",
                    category = "Doc Read Failed",
                    reference_id,
                    error = %e,
                    "Failed to read cover letter, continuing without excerpt"
                );
                String::new()
            }
        }
    }

    /// Render the email for a non-empty digest set.
    pub async fn render(
        &self,
        jobs: &[JobRecord],
        config: &DigestConfig,
        today: &str,
    ) -> Result<DigestEmail, DigestError> {
        let table = build_html_table(jobs)?;

        let html_body = self.template.render(&EmailContext {
            jobs_table: &table.html,
            today,
            job_count: jobs.len(),
        })?;

        let excerpt = self
            .cover_letter_excerpt(&config.cover_letter_reference_id, config.excerpt_length)
            .await;

        Ok(DigestEmail {
            subject: format!("{SUBJECT_PREFIX}{today}"),
            text_body: format!("Found {} new jobs:\n\n{excerpt}", jobs.len()),
            html_body,
            job_count: jobs.len(),
            rendered_rows: table.rows,
        })
    }
}
