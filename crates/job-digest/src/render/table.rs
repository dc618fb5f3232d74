//! HTML table of digest jobs.

use std::fmt::Write;

use crate::error::DigestError;
use crate::jobs::JobRecord;

const TABLE_STYLE: &str =
    "border-collapse: collapse; width: 100%; max-width: 600px; font-family: Arial, sans-serif;";
const HEADER_ROW_STYLE: &str = "background-color: #f2f2f2;";
const CELL_STYLE: &str = "border: 1px solid #ddd; padding: 8px;";

/// Column headers, in display order.
pub const COLUMNS: [&str; 4] = ["Title", "Source", "Score", "Keywords"];

/// Rendered table plus row accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobsTable {
    pub html: String,
    /// Data rows written.
    pub rows: usize,
    /// Jobs skipped for a missing title or link.
    pub skipped: usize,
}

/// Build the digest table.
///
/// Jobs without a title or link are skipped with a warning. Fails if no
/// row survives, so an empty-looking digest is never emailed.
pub fn build_html_table(jobs: &[JobRecord]) -> Result<JobsTable, DigestError> {
    tracing::info!(
        component = "render.table",
        category = "Table Generation",
        jobs = jobs.len(),
        "Building HTML table"
    );

    if jobs.is_empty() {
        return Err(DigestError::Render("no jobs provided for table".to_string()));
    }

    let mut html = format!(r#"<table style="{TABLE_STYLE}">"#);
    let _ = write!(html, r#"<tr style="{HEADER_ROW_STYLE}">"#);
    for column in COLUMNS {
        let _ = write!(html, r#"<th style="{CELL_STYLE}">{column}</th>"#);
    }
    html.push_str("</tr>");

    let mut rows = 0;
    let mut skipped = 0;
    for job in jobs {
        if !job.is_displayable() {
            tracing::warn!(
                component = "render.table",
                category = "Invalid Data",
                id = %job.id,
                "Skipping job with missing Title or Link"
            );
            skipped += 1;
            continue;
        }

        let _ = write!(
            html,
            r#"<tr><td style="{CELL_STYLE}"><a href="{link}">{title}</a></td><td style="{CELL_STYLE}">{source}</td><td style="{CELL_STYLE}">{score}</td><td style="{CELL_STYLE}">{keywords}</td></tr>"#,
            link = html_escape(job.link.trim()),
            title = html_escape(&job.title),
            source = html_escape(or_placeholder(&job.source, "N/A")),
            score = format_score(job.score),
            keywords = html_escape(&format_keywords(job)),
        );
        rows += 1;
    }

    html.push_str("</table>");

    if rows == 0 {
        return Err(DigestError::Render("no valid jobs to render".to_string()));
    }

    tracing::info!(
        component = "render.table",
        category = "Table Generation",
        rows,
        skipped,
        "HTML table generated"
    );

    Ok(JobsTable { html, rows, skipped })
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "N/A".to_string(), |s| s.to_string())
}

fn format_keywords(job: &JobRecord) -> String {
    let keywords: Vec<_> = job.keywords().collect();
    if keywords.is_empty() {
        "None".to_string()
    } else {
        keywords.join(", ")
    }
}

/// Escape text for HTML body and attribute context.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
