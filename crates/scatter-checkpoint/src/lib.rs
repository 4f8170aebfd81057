/*!
# Scatter Checkpoint Store

Durable mapping from a session fingerprint to the ordered set of confirmed
entry keys. The document is read in full at startup and rewritten in full
after every confirmed chunk; within a session the set only ever grows.

The store is deliberately a whole-file JSON snapshot. At this tool's scale
(hundreds of chunks per run) rewriting the document each time is cheap, and
last-writer-wins semantics are exactly what a single sequential run needs.
A larger deployment could swap in an append-only log replayed at startup
without changing the monotonic-set contract.
*/

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

pub type CheckpointResult<T> = Result<T, CheckpointError>;

#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist checkpoint file: {0}")]
    Persist(String),
}

/// Checkpoint document plus the location it flushes to.
///
/// A disabled store (no path) keeps the same in-memory contract so callers
/// can resume within a process, but never touches the filesystem.
#[derive(Debug)]
pub struct CheckpointStore {
    path: Option<PathBuf>,
    records: BTreeMap<String, BTreeSet<String>>,
}

impl CheckpointStore {
    /// Load the checkpoint document at `path`, treating a missing file as an
    /// empty document.
    pub fn load<P: AsRef<Path>>(path: P) -> CheckpointResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match File::open(&path) {
            Ok(file) => serde_json::from_reader(file)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(CheckpointError::Io(e)),
        };

        debug!(
            path = %path.display(),
            sessions = records.len(),
            "loaded checkpoint document"
        );
        Ok(Self {
            path: Some(path),
            records,
        })
    }

    /// In-memory store that never writes to disk.
    pub fn disabled() -> Self {
        Self {
            path: None,
            records: BTreeMap::new(),
        }
    }

    pub fn is_durable(&self) -> bool {
        self.path.is_some()
    }

    /// Confirmed entry keys for a session (empty set if the session is new).
    pub fn confirmed(&self, session_id: &str) -> BTreeSet<String> {
        self.records.get(session_id).cloned().unwrap_or_default()
    }

    /// Number of confirmed keys for a session.
    pub fn confirmed_count(&self, session_id: &str) -> usize {
        self.records.get(session_id).map_or(0, BTreeSet::len)
    }

    /// Add confirmed keys to a session and synchronously flush the whole
    /// document.
    ///
    /// Keys are only ever added; the per-session set is monotonically
    /// growing. Callers must not proceed to the next chunk until this
    /// returns, preserving the confirm-then-persist ordering.
    pub fn record<I>(&mut self, session_id: &str, keys: I) -> CheckpointResult<()>
    where
        I: IntoIterator<Item = String>,
    {
        let set = self.records.entry(session_id.to_string()).or_default();
        let before = set.len();
        set.extend(keys);
        debug!(
            session = session_id,
            added = set.len() - before,
            total = set.len(),
            "recorded confirmed entries"
        );

        self.flush()
    }

    /// Rewrite the whole document. Written to a temp file in the target
    /// directory and renamed into place so a crash mid-write leaves the
    /// previous snapshot intact.
    fn flush(&self) -> CheckpointResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let tmp = match dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new_in(".")?,
        };
        serde_json::to_writer_pretty(tmp.as_file(), &self.records)?;
        tmp.persist(path)
            .map_err(|e| CheckpointError::Persist(e.to_string()))?;
        Ok(())
    }
}
