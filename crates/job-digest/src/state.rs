//! Write-back of notification state.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::jobs::{JobRecord, JobStore, NotificationUpdate};

/// Mark every stored row whose id is in `emailed` as notified on `today`.
///
/// Rows are re-read from the store so the update targets its current
/// contents. Returns the number of rows written. Rewriting a row that is
/// already notified is harmless.
pub async fn update_notified_jobs(
    store: &dyn JobStore,
    emailed: &[JobRecord],
    today: &str,
) -> Result<usize, StoreError> {
    if emailed.is_empty() {
        return Ok(0);
    }

    tracing::info!(
        component = "state",
        category = "Data Update",
        jobs = emailed.len(),
        store = store.name(),
        "Updating notified jobs"
    );

    let ids: HashSet<&str> = emailed.iter().map(|j| j.id.as_str()).collect();
    let rows = store.read_all().await?;
    let update = NotificationUpdate::notified(today);

    // One write per id; the store reports how many rows each write touched
    let present: HashSet<&str> = rows
        .iter()
        .map(|r| r.id.as_str())
        .filter(|id| ids.contains(id))
        .collect();

    let mut updated = 0;
    for id in &present {
        updated += store.update_fields(id, &update).await?;
    }
    store.flush().await?;

    if present.len() < ids.len() {
        tracing::warn!(
            component = "state",
            category = "Data Update",
            expected = ids.len(),
            updated,
            "Some emailed jobs were no longer in the store"
        );
    }

    tracing::info!(
        component = "state",
        category = "Data Update",
        updated,
        "Updated jobs with Status=Notified and DateNotified"
    );

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobStatus, MemoryJobStore};

    fn job(id: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            title: format!("Job {id}"),
            link: format!("https://example.com/{id}"),
            score: Some(1.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_marks_only_emailed_rows() {
        let store = MemoryJobStore::new(vec![job("a"), job("b"), job("c")]);

        let count = update_notified_jobs(&store, &[job("a"), job("c")], "2025-09-13")
            .await
            .unwrap();
        assert_eq!(count, 2);

        let rows = store.snapshot().await;
        assert_eq!(rows[0].status, JobStatus::Notified);
        assert_eq!(rows[0].date_notified.as_deref(), Some("2025-09-13"));
        assert_eq!(rows[1], job("b"));
        assert_eq!(rows[2].status, JobStatus::Notified);
    }

    #[tokio::test]
    async fn test_empty_digest_is_noop() {
        let store = MemoryJobStore::new(vec![job("a")]);
        assert_eq!(update_notified_jobs(&store, &[], "2025-09-13").await.unwrap(), 0);
        assert_eq!(store.snapshot().await, vec![job("a")]);
    }

    #[tokio::test]
    async fn test_idempotent_for_same_digest() {
        let store = MemoryJobStore::new(vec![job("a"), job("b")]);
        let digest = [job("a")];

        assert_eq!(update_notified_jobs(&store, &digest, "2025-09-13").await.unwrap(), 1);
        let first = store.snapshot().await;

        assert_eq!(update_notified_jobs(&store, &digest, "2025-09-13").await.unwrap(), 1);
        assert_eq!(store.snapshot().await, first);
    }

    #[tokio::test]
    async fn test_duplicate_ids_counted_by_rows_written() {
        let store = MemoryJobStore::new(vec![job("a"), job("a"), job("b")]);

        let count = update_notified_jobs(&store, &[job("a"), job("a")], "2025-09-13")
            .await
            .unwrap();
        assert_eq!(count, 2);

        let rows = store.snapshot().await;
        assert!(rows[..2].iter().all(|r| r.is_notified()));
        assert!(!rows[2].is_notified());
    }

    #[tokio::test]
    async fn test_deleted_rows_are_not_counted() {
        let store = MemoryJobStore::new(vec![job("a")]);
        let count = update_notified_jobs(&store, &[job("a"), job("gone")], "2025-09-13")
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
