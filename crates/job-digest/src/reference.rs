//! Reference documents (cover letters) quoted in the digest email.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use crate::error::ReferenceError;

/// Default excerpt length in characters.
pub const DEFAULT_EXCERPT_LENGTH: usize = 500;

/// Lookup of reference document text by identifier.
#[async_trait]
pub trait ReferenceDocumentStore: Send + Sync {
    /// Return the first `max_len` characters of the document.
    async fn get_excerpt(&self, reference_id: &str, max_len: usize) -> Result<String, ReferenceError>;
}

/// Truncate to at most `max_len` characters, respecting UTF-8 boundaries.
#[must_use]
pub fn excerpt(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Documents stored as `<dir>/<id>.txt` or `<dir>/<id>.md`.
#[derive(Debug, Clone)]
pub struct FileReferenceStore {
    dir: PathBuf,
}

impl FileReferenceStore {
    const EXTENSIONS: [&'static str; 2] = ["txt", "md"];

    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn resolve(&self, reference_id: &str) -> Result<PathBuf, ReferenceError> {
        let id = reference_id.trim();
        let single_segment = {
            let mut components = Path::new(id).components();
            matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            )
        };
        if id.is_empty() || !single_segment {
            return Err(ReferenceError::InvalidId(reference_id.to_string()));
        }

        Self::EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{id}.{ext}")))
            .find(|p| p.is_file())
            .ok_or_else(|| ReferenceError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ReferenceDocumentStore for FileReferenceStore {
    async fn get_excerpt(&self, reference_id: &str, max_len: usize) -> Result<String, ReferenceError> {
        let path = self.resolve(reference_id)?;
        let text = tokio::fs::read_to_string(&path).await?;
        Ok(excerpt(&text, max_len))
    }
}
