//! Job store abstraction and implementations.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::record::{JobRecord, NotificationUpdate};
use crate::error::StoreError;

/// Tabular storage of job records keyed by `id`.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Name used in log events.
    fn name(&self) -> &'static str;

    /// Read every record in row order.
    async fn read_all(&self) -> Result<Vec<JobRecord>, StoreError>;

    /// Set `status` and `dateNotified` on every record with the given id.
    ///
    /// Returns the number of rows written.
    async fn update_fields(&self, id: &str, update: &NotificationUpdate)
        -> Result<usize, StoreError>;

    /// Persist pending updates.
    async fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Rows {
    records: Vec<JobRecord>,
    dirty: bool,
}

impl Rows {
    fn update(&mut self, id: &str, update: &NotificationUpdate) -> Result<usize, StoreError> {
        let mut written = 0;
        for record in self.records.iter_mut().filter(|r| r.id == id) {
            update.apply(record);
            written += 1;
        }
        if written == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.dirty = true;
        Ok(written)
    }
}

/// Job store backed by a JSON file holding an array of records.
///
/// `read_all` always reloads the file; updates are buffered until `flush`.
#[derive(Debug)]
pub struct JsonFileJobStore {
    path: PathBuf,
    rows: Mutex<Option<Rows>>,
}

impl JsonFileJobStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rows: Mutex::new(None),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<JobRecord>, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::Unavailable(format!(
                "job file not found: {}",
                self.path.display()
            )));
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<JobRecord> = serde_json::from_str(&content)?;
        Ok(records)
    }
}

#[async_trait]
impl JobStore for JsonFileJobStore {
    fn name(&self) -> &'static str {
        "json-file"
    }

    async fn read_all(&self) -> Result<Vec<JobRecord>, StoreError> {
        let records = self.load().await?;
        tracing::debug!(path = %self.path.display(), rows = records.len(), "Loaded job file");

        *self.rows.lock().await = Some(Rows {
            records: records.clone(),
            dirty: false,
        });
        Ok(records)
    }

    async fn update_fields(
        &self,
        id: &str,
        update: &NotificationUpdate,
    ) -> Result<usize, StoreError> {
        let mut guard = self.rows.lock().await;
        if guard.is_none() {
            *guard = Some(Rows {
                records: self.load().await?,
                dirty: false,
            });
        }
        match guard.as_mut() {
            Some(rows) => rows.update(id, update),
            None => Err(StoreError::Unavailable("job rows not loaded".to_string())),
        }
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let mut guard = self.rows.lock().await;
        let Some(rows) = guard.as_mut() else {
            return Ok(());
        };
        if !rows.dirty {
            return Ok(());
        }

        let content = serde_json::to_string_pretty(&rows.records)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, content).await?;
        rows.dirty = false;

        tracing::debug!(path = %self.path.display(), "Wrote job file");
        Ok(())
    }
}

/// In-memory job store.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    rows: Mutex<Rows>,
}

impl MemoryJobStore {
    #[must_use]
    pub fn new(records: Vec<JobRecord>) -> Self {
        Self {
            rows: Mutex::new(Rows {
                records,
                dirty: false,
            }),
        }
    }

    /// Copy of the current rows.
    pub async fn snapshot(&self) -> Vec<JobRecord> {
        self.rows.lock().await.records.clone()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read_all(&self) -> Result<Vec<JobRecord>, StoreError> {
        Ok(self.rows.lock().await.records.clone())
    }

    async fn update_fields(
        &self,
        id: &str,
        update: &NotificationUpdate,
    ) -> Result<usize, StoreError> {
        self.rows.lock().await.update(id, update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobStatus;

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
    async fn test_json_store_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileJobStore::new(dir.path().join("jobs.json"));

        let err = store.read_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_json_store_update_and_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, serde_json::to_string(&vec![job("a"), job("b")]).unwrap()).unwrap();

        let store = JsonFileJobStore::new(&path);
        assert_eq!(store.read_all().await.unwrap().len(), 2);

        store
            .update_fields("b", &NotificationUpdate::notified("2025-09-13"))
            .await
            .unwrap();

        // Nothing is written before flush
        let on_disk: Vec<JobRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk[1].status, JobStatus::New);

        store.flush().await.unwrap();

        let reopened = JsonFileJobStore::new(&path).read_all().await.unwrap();
        assert_eq!(reopened[0].status, JobStatus::New);
        assert_eq!(reopened[1].status, JobStatus::Notified);
        assert_eq!(reopened[1].date_notified.as_deref(), Some("2025-09-13"));
    }

    #[tokio::test]
    async fn test_flush_keeps_unknown_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(
            &path,
            r#"[{"id": "a", "title": "Engineer", "link": "https://example.com/a", "score": 5,
                "status": "New", "notes": "keep me", "appliedVia": "referral"}]"#,
        )
        .unwrap();

        let store = JsonFileJobStore::new(&path);
        store.read_all().await.unwrap();
        store
            .update_fields("a", &NotificationUpdate::notified("2025-09-13"))
            .await
            .unwrap();
        store.flush().await.unwrap();

        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rows[0]["notes"], "keep me");
        assert_eq!(rows[0]["appliedVia"], "referral");
        assert_eq!(rows[0]["status"], "Notified");
        assert_eq!(rows[0]["dateNotified"], "2025-09-13");
        assert_eq!(rows[0]["score"], 5.0);
    }

    #[tokio::test]
    async fn test_blank_score_does_not_break_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(
            &path,
            r#"[{"id": "a", "score": "", "status": "New"}, {"id": "b", "score": 9, "status": "New"}]"#,
        )
        .unwrap();

        let rows = JsonFileJobStore::new(&path).read_all().await.unwrap();
        assert_eq!(rows[0].score, None);
        assert_eq!(rows[1].score, Some(9.0));
    }

    #[tokio::test]
    async fn test_update_counts_every_row_written() {
        let store = MemoryJobStore::new(vec![job("a"), job("a"), job("b")]);
        let written = store
            .update_fields("a", &NotificationUpdate::notified("2025-09-13"))
            .await
            .unwrap();
        assert_eq!(written, 2);

        let rows = store.snapshot().await;
        assert!(rows[..2].iter().all(|r| r.status == JobStatus::Notified));
        assert_eq!(rows[2].status, JobStatus::New);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = MemoryJobStore::new(vec![job("a")]);
        let err = store
            .update_fields("missing", &NotificationUpdate::notified("2025-09-13"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_flush_without_changes_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, "[]").unwrap();

        let store = JsonFileJobStore::new(&path);
        assert!(store.read_all().await.unwrap().is_empty());
        store.flush().await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
