use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Resume state of an interrupted setup run.
///
/// Stored as a flat JSON object so older progress files keep loading:
/// `<collection>_processed`, `<collection>_total`, `<collection>_complete`,
/// `status` and `timestamp` (unix seconds).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checkpoint(Map<String, Value>);

impl Checkpoint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn processed(&self, collection: &str) -> usize {
        self.0
            .get(&format!("{collection}_processed"))
            .and_then(Value::as_u64)
            .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX))
    }

    #[must_use]
    pub fn total(&self, collection: &str) -> Option<usize> {
        self.0
            .get(&format!("{collection}_total"))
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
    }

    #[must_use]
    pub fn is_complete(&self, collection: &str) -> bool {
        self.0
            .get(&format!("{collection}_complete"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn set_status(&mut self, status: &str) {
        self.0.insert("status".to_string(), Value::from(status));
        self.touch();
    }

    pub fn record_progress(&mut self, collection: &str, processed: usize, total: usize) {
        self.0
            .insert(format!("{collection}_processed"), Value::from(processed));
        self.0.insert(format!("{collection}_total"), Value::from(total));
        self.touch();
    }

    pub fn set_complete(&mut self, collection: &str, complete: bool) {
        self.0
            .insert(format!("{collection}_complete"), Value::from(complete));
        self.touch();
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn touch(&mut self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        self.0.insert("timestamp".to_string(), Value::from(now));
    }
}

/// Owns the on-disk checkpoint file.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    path: PathBuf,
}

impl CheckpointManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `checkpoint` through a temp file and a rename.
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(checkpoint)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Missing and unreadable files both yield `None`.
    pub async fn load(&self) -> Option<Checkpoint> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::error!("Failed to read checkpoint {}: {err}", self.path.display());
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(checkpoint) => Some(checkpoint),
            Err(err) => {
                log::error!("Ignoring corrupt checkpoint {}: {err}", self.path.display());
                None
            }
        }
    }

    /// Loads, applies `update`, saves. Keys written by earlier stages survive.
    pub async fn update(&self, update: impl FnOnce(&mut Checkpoint)) -> Result<Checkpoint> {
        let mut checkpoint = self.load().await.unwrap_or_default();
        update(&mut checkpoint);
        self.save(&checkpoint).await?;
        Ok(checkpoint)
    }

    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn manager(tmp: &TempDir) -> CheckpointManager {
        CheckpointManager::new(tmp.path().join("vectordb").join(".setup_progress"))
    }

    #[tokio::test]
    async fn updates_merge_into_existing_state() {
        let tmp = TempDir::new().unwrap();
        let manager = manager(&tmp);
        assert!(manager.load().await.is_none());

        manager
            .update(|c| {
                c.set_status("processing_cards");
                c.record_progress("eternal_cards", 100, 250);
            })
            .await
            .unwrap();
        manager
            .update(|c| c.set_complete("eternal_cards", true))
            .await
            .unwrap();

        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.status(), Some("processing_cards"));
        assert_eq!(loaded.processed("eternal_cards"), 100);
        assert_eq!(loaded.total("eternal_cards"), Some(250));
        assert!(loaded.is_complete("eternal_cards"));
        assert!(!loaded.is_complete("eternal_mechanics"));
        assert!(loaded.as_map().contains_key("timestamp"));
        assert!(!manager.path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn flat_key_format_on_disk() {
        let tmp = TempDir::new().unwrap();
        let manager = manager(&tmp);
        let mut checkpoint = Checkpoint::new();
        checkpoint.record_progress("eternal_cards", 50, 50);
        manager.save(&checkpoint).await.unwrap();

        let raw: Value =
            serde_json::from_slice(&std::fs::read(manager.path()).unwrap()).unwrap();
        assert_eq!(raw["eternal_cards_processed"], Value::from(50));
        assert_eq!(raw["eternal_cards_total"], Value::from(50));
    }

    #[tokio::test]
    async fn corrupt_file_is_treated_as_absent() {
        let tmp = TempDir::new().unwrap();
        let manager = manager(&tmp);
        std::fs::create_dir_all(manager.path().parent().unwrap()).unwrap();
        std::fs::write(manager.path(), "{not json").unwrap();
        assert!(manager.load().await.is_none());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let manager = manager(&tmp);
        manager.save(&Checkpoint::new()).await.unwrap();
        manager.clear().await.unwrap();
        assert!(!manager.path().exists());
        manager.clear().await.unwrap();
    }
}
