//! Handlebars email template.

use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

use crate::error::DigestError;

const TEMPLATE_NAME: &str = "email";

/// Values exposed to the email template.
#[derive(Debug, Serialize)]
pub struct EmailContext<'a> {
    /// Pre-rendered HTML table; use `{{{jobs_table}}}` to embed it unescaped.
    pub jobs_table: &'a str,
    /// Formatted current date.
    pub today: &'a str,
    /// Number of jobs in the digest set.
    pub job_count: usize,
}

/// Email body template.
pub struct EmailTemplate {
    handlebars: Handlebars<'static>,
}

impl EmailTemplate {
    /// Create a template from the embedded default.
    pub fn new() -> Result<Self, DigestError> {
        Self::from_source(EMAIL_TEMPLATE)
    }

    /// Load a template from a file.
    pub fn from_file(path: &Path) -> Result<Self, DigestError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DigestError::Config(format!("cannot read template {}: {e}", path.display()))
        })?;
        Self::from_source(&content)
    }

    /// Create a template from source text.
    pub fn from_source(source: &str) -> Result<Self, DigestError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(TEMPLATE_NAME, source)?;
        Ok(Self { handlebars })
    }

    /// Render the email body.
    pub fn render(&self, context: &EmailContext<'_>) -> Result<String, DigestError> {
        Ok(self.handlebars.render(TEMPLATE_NAME, context)?)
    }
}

/// Default email template.
const EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="font-family: Arial, sans-serif; color: #333333; margin: 0; padding: 20px;">
    <div style="max-width: 600px; margin: 0 auto;">
        <h2 style="margin: 0 0 8px 0;">Job Search Update</h2>
        <p style="color: #666666; margin: 0 0 16px 0;">{{today}} &bull; {{job_count}} new jobs</p>
        {{{jobs_table}}}
        <p style="color: #999999; font-size: 12px; margin-top: 24px;">
            Sent by job-digest. Jobs listed here are marked as notified and will not be sent again.
        </p>
    </div>
</body>
</html>
"#;
