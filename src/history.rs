//! Run history - bounded, file-backed log of past dashboard runs

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::types::Status;

/// One completed dashboard run. Created once, appended, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Run timestamp (UTC)
    pub ts: DateTime<Utc>,
    /// Number of GREEN indicators this run (0..=6)
    pub green_count: u32,
    /// Per-indicator combined status
    pub statuses: BTreeMap<String, Status>,
}

/// Ordered run history, oldest first.
///
/// Serialized as `{"runs": [...]}` and entirely rewritten on save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunHistory {
    #[serde(default)]
    pub runs: Vec<RunRecord>,
}

impl RunHistory {
    /// Append one record and truncate to the most recent `max_runs`
    /// (strict FIFO: oldest entries dropped first).
    pub fn append(&mut self, record: RunRecord, max_runs: usize) {
        self.runs.push(record);
        if self.runs.len() > max_runs {
            let drop = self.runs.len() - max_runs;
            self.runs.drain(..drop);
        }
    }

    /// The most recent `n` runs, oldest first. Fewer if history is short.
    pub fn last_n(&self, n: usize) -> &[RunRecord] {
        let start = self.runs.len().saturating_sub(n);
        &self.runs[start..]
    }
}

/// Durable storage for the run history.
///
/// One load + one append + one save per process run; no concurrent-writer
/// protection (single external scheduler assumed).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<RunHistory>;
    async fn save(&self, history: &RunHistory) -> anyhow::Result<()>;
}

/// JSON-file-backed history store.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    /// Missing file is an empty history; an unreadable or corrupt file
    /// is an error (the engine decides whether to degrade or abort).
    async fn load(&self) -> anyhow::Result<RunHistory> {
        if !self.path.exists() {
            debug!("No history file at {:?}, starting empty", self.path);
            return Ok(RunHistory::default());
        }
        let text = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read history file {:?}", self.path))?;
        let history: RunHistory = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse history file {:?}", self.path))?;
        Ok(history)
    }

    /// Replace the file contents with the full (truncated) history.
    /// Writes via a temp file + rename so a crash mid-write cannot leave
    /// a half-written state file behind.
    async fn save(&self, history: &RunHistory) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create state dir {parent:?}"))?;
        }
        let json = serde_json::to_string_pretty(history)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)
            .await
            .with_context(|| format!("failed to write history temp file {tmp:?}"))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace history file {:?}", self.path))?;
        debug!("Saved {} runs to {:?}", history.runs.len(), self.path);
        Ok(())
    }
}

/// In-memory history store for tests and harnesses.
#[derive(Default)]
pub struct MemoryHistoryStore {
    inner: tokio::sync::RwLock<RunHistory>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: RunHistory) -> Self {
        Self {
            inner: tokio::sync::RwLock::new(history),
        }
    }

    pub async fn snapshot(&self) -> RunHistory {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> anyhow::Result<RunHistory> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, history: &RunHistory) -> anyhow::Result<()> {
        *self.inner.write().await = history.clone();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Record with the given green count and no statuses.
    pub fn run(green_count: u32) -> RunRecord {
        RunRecord {
            ts: Utc::now(),
            green_count,
            statuses: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::run;
    use super::*;

    #[test]
    fn test_append_truncates_fifo_at_cap() {
        let mut history = RunHistory::default();
        for i in 0..61 {
            history.append(run(i % 7), 60);
        }
        assert_eq!(history.runs.len(), 60);
        // Oldest entry (green_count 0) dropped, order preserved
        assert_eq!(history.runs[0].green_count, 1);
        assert_eq!(history.runs[59].green_count, 60 % 7);
    }

    #[test]
    fn test_last_n_handles_short_history() {
        let mut history = RunHistory::default();
        history.append(run(3), 60);
        assert_eq!(history.last_n(5).len(), 1);
        assert_eq!(history.last_n(0).len(), 0);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistoryStore::new(dir.path().join("state").join("history.json"));

        let mut history = RunHistory::default();
        let mut statuses = BTreeMap::new();
        statuses.insert("credit_stress".to_string(), Status::Green);
        history.append(
            RunRecord {
                ts: Utc::now(),
                green_count: 4,
                statuses,
            },
            60,
        );

        store.save(&history).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.runs.len(), 1);
        assert_eq!(loaded.runs[0].green_count, 4);
        assert_eq!(loaded.runs[0].statuses["credit_stress"], Status::Green);

        // save(load()) leaves the file content stable
        store.save(&loaded).await.unwrap();
        let again = store.load().await.unwrap();
        assert_eq!(
            serde_json::to_string(&loaded).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistoryStore::new(dir.path().join("nope.json"));
        let loaded = store.load().await.unwrap();
        assert!(loaded.runs.is_empty());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        let store = FileHistoryStore::new(&path);
        assert!(store.load().await.is_err());
    }
}
