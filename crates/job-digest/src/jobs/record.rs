//! Job records as stored in the job table.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Notification status of a job record.
///
/// Values other than `New` and `Notified` are kept verbatim so that a
/// write-back never rewrites a status this crate does not own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    #[default]
    New,
    Notified,
    Other(String),
}

impl JobStatus {
    /// Status string as written to the store.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Notified => "Notified",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "New" => Self::New,
            "Notified" => Self::Notified,
            _ => Self::Other(s),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the job store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Unique, immutable identifier.
    pub id: String,
    /// When discovery found the posting.
    #[serde(default)]
    pub date_found: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    /// Posting URL.
    #[serde(default)]
    pub link: String,
    /// Job board or feed the posting came from.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub snippet: String,
    /// Relevance score assigned upstream. Absent scores never pass a threshold.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: Option<f64>,
    /// Comma-joined keywords that matched.
    #[serde(default)]
    pub matched_keywords: String,
    #[serde(default)]
    pub status: JobStatus,
    /// Formatted date of the digest that included this job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_notified: Option<String>,
    /// Columns this crate does not use, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read a score from a number or numeric string.
///
/// Blank cells, `null` and non-numeric text become `None`.
fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(score)
}

impl JobRecord {
    /// Whether a digest already included this job.
    ///
    /// An empty or whitespace-only `dateNotified` counts as not notified.
    #[must_use]
    pub fn is_notified(&self) -> bool {
        self.date_notified
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    /// Whether the record has the fields needed for a table row.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        !self.title.trim().is_empty() && !self.link.trim().is_empty()
    }

    /// Keywords split on commas, blanks removed.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.matched_keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// The pair of fields written when a job is included in a digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationUpdate {
    pub status: JobStatus,
    pub date_notified: String,
}

impl NotificationUpdate {
    /// Mark a job as notified on the given formatted date.
    #[must_use]
    pub fn notified(date: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Notified,
            date_notified: date.into(),
        }
    }

    /// Apply both fields to a record.
    pub fn apply(&self, record: &mut JobRecord) {
        record.status = self.status.clone();
        record.date_notified = Some(self.date_notified.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_unknown_values() {
        let status: JobStatus = serde_json::from_str("\"Applied\"").unwrap();
        assert_eq!(status, JobStatus::Other("Applied".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Applied\"");
    }

    #[test]
    fn test_deserialize_sparse_row() {
        let json = r#"{"id": "j1", "title": "Engineer", "status": "New", "dateNotified": ""}"#;
        let job: JobRecord = serde_json::from_str(json).unwrap();

        assert_eq!(job.id, "j1");
        assert_eq!(job.score, None);
        assert_eq!(job.status, JobStatus::New);
        assert!(!job.is_notified());
    }

    #[test]
    fn test_lenient_score() {
        let rows: Vec<JobRecord> = serde_json::from_str(
            r#"[
                {"id": "blank", "score": ""},
                {"id": "null", "score": null},
                {"id": "text", "score": "n/a"},
                {"id": "string", "score": " 7.5 "},
                {"id": "number", "score": 9},
                {"id": "absent"}
            ]"#,
        )
        .unwrap();

        let scores: Vec<_> = rows.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![None, None, None, Some(7.5), Some(9.0), None]);
    }

    #[test]
    fn test_unknown_columns_survive_round_trip() {
        let json = r#"{"id": "a", "status": "New", "notes": "keep me", "appliedVia": "referral"}"#;
        let job: JobRecord = serde_json::from_str(json).unwrap();
        assert_eq!(job.extra["notes"], "keep me");

        let written = serde_json::to_value(&job).unwrap();
        assert_eq!(written["notes"], "keep me");
        assert_eq!(written["appliedVia"], "referral");
        assert_eq!(written["id"], "a");
    }

    #[test]
    fn test_is_notified() {
        let mut job = JobRecord::default();
        assert!(!job.is_notified());

        job.date_notified = Some("  ".to_string());
        assert!(!job.is_notified());

        job.date_notified = Some("2025-09-13".to_string());
        assert!(job.is_notified());
    }

    #[test]
    fn test_keywords() {
        let job = JobRecord {
            matched_keywords: "CIO, Remote,,".to_string(),
            ..Default::default()
        };
        assert_eq!(job.keywords().collect::<Vec<_>>(), vec!["CIO", "Remote"]);
    }

    #[test]
    fn test_notification_update_sets_both_fields() {
        let mut job = JobRecord::default();
        NotificationUpdate::notified("2025-09-13").apply(&mut job);

        assert_eq!(job.status, JobStatus::Notified);
        assert_eq!(job.date_notified.as_deref(), Some("2025-09-13"));
    }
}
