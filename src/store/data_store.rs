use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, error};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task;

use crate::errors::{Result, StorageError};
use crate::store::state::AppData;

/// Single source of truth for estimates, views, devices, notifications and
/// the contractor record.
///
/// Mutations run synchronously under the write lock and schedule a durable
/// flush. A background writer task owns the backing file and coalesces flush
/// requests, so at most one write is in flight at any time and callers never
/// block on disk I/O.
pub struct DataStore {
    data: Arc<RwLock<AppData>>,
    flush_tx: mpsc::Sender<()>,
    path: PathBuf,
}

impl DataStore {
    /// Load persisted state from `path` and start the background writer.
    ///
    /// A missing, unreadable or corrupt file is not fatal: the store starts
    /// from empty state and the failure is logged. Must be called from
    /// within a tokio runtime.
    pub fn load(path: impl Into<PathBuf>) -> Arc<Self> {
        let path = path.into();
        let data = Arc::new(RwLock::new(read_state(&path)));
        // Capacity 1: a full channel already means "flush pending".
        let (flush_tx, flush_rx) = mpsc::channel(1);
        task::spawn(flush_worker(flush_rx, data.clone(), path.clone()));
        Arc::new(DataStore {
            data,
            flush_tx,
            path,
        })
    }

    /// Apply a state transition and schedule a flush of the result.
    ///
    /// The closure runs to completion under the write lock, so no other
    /// mutation or read can observe a half-applied transition.
    pub fn mutate<R>(&self, apply: impl FnOnce(&mut AppData) -> R) -> R {
        let result = apply(&mut self.write_guard());
        match self.flush_tx.try_send(()) {
            // Full means a flush request is already pending; the writer
            // snapshots at flush time, so this mutation is covered by it.
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Closed(())) => {
                error!("flush worker has stopped; state changes are no longer persisted")
            }
        }
        result
    }

    /// Run a read-only projection over a consistent state snapshot.
    pub fn read<R>(&self, project: impl FnOnce(&AppData) -> R) -> R {
        project(&self.read_guard())
    }

    /// Write the current state to disk immediately.
    ///
    /// Routine persistence goes through the background writer; this is for
    /// shutdown and for tests that need a deterministic flush.
    pub async fn flush_now(&self) -> Result<()> {
        let snapshot =
            serde_json::to_vec_pretty(&*self.read_guard()).map_err(StorageError::Serialization)?;
        let path = self.path.clone();
        match task::spawn_blocking(move || write_atomic(&path, &snapshot)).await {
            Ok(outcome) => outcome.map_err(StorageError::Io)?,
            Err(join_err) => {
                return Err(StorageError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    join_err,
                ))
                .into())
            }
        }
        Ok(())
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, AppData> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, AppData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn read_state(path: &Path) -> AppData {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("no store file at {}, starting empty", path.display());
            return AppData::default();
        }
        Err(e) => {
            error!(
                "failed to read store file {}: {}. Starting empty.",
                path.display(),
                e
            );
            return AppData::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(data) => data,
        Err(e) => {
            error!(
                "store file {} is corrupt: {}. Starting empty.",
                path.display(),
                e
            );
            AppData::default()
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    // Write-then-rename keeps a crashed flush from truncating the live file.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// Single-writer loop: drains coalesced flush requests and persists the
/// state as of flush time. A request arriving mid-write parks in the
/// channel slot and triggers another flush as soon as this one completes.
async fn flush_worker(mut flush_rx: mpsc::Receiver<()>, data: Arc<RwLock<AppData>>, path: PathBuf) {
    while flush_rx.recv().await.is_some() {
        while flush_rx.try_recv().is_ok() {}

        let snapshot = {
            let guard = data.read().unwrap_or_else(|e| e.into_inner());
            serde_json::to_vec_pretty(&*guard)
        };
        let bytes = match snapshot {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("failed to serialize store state: {}", e);
                continue;
            }
        };

        let target = path.clone();
        match task::spawn_blocking(move || write_atomic(&target, &bytes)).await {
            Ok(Ok(())) => debug!("flushed state to {}", path.display()),
            Ok(Err(e)) => error!("flush to {} failed: {}", path.display(), e),
            Err(e) => error!("flush task for {} panicked: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimates::Estimate;
    use chrono::Utc;

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("store.json")
    }

    #[tokio::test]
    async fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::load(store_path(&dir));

        let empty = store.read(|data| data.estimates.is_empty() && data.views.is_empty());
        assert!(empty);
    }

    #[tokio::test]
    async fn test_load_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);
        fs::write(&path, b"{ not json at all").unwrap();

        let store = DataStore::load(&path);
        assert_eq!(store.read(|data| data.views.len()), 0);
        assert!(store.read(|data| data.contractor.is_none()));
    }

    #[tokio::test]
    async fn test_mutation_is_visible_to_readers() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::load(store_path(&dir));

        store.mutate(|data| {
            data.estimates.insert(
                "EST-1".to_string(),
                Estimate::stub("EST-1", Utc::now()),
            );
        });

        assert!(store.read(|data| data.estimates.contains_key("EST-1")));
    }

    #[tokio::test]
    async fn test_flush_now_round_trips_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);

        let store = DataStore::load(&path);
        store.mutate(|data| {
            data.estimates
                .insert("EST-9".to_string(), Estimate::stub("EST-9", Utc::now()));
        });
        store.flush_now().await.unwrap();
        let before = store.read(|data| data.clone());

        let reloaded = DataStore::load(&path);
        let after = reloaded.read(|data| data.clone());
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_background_flush_persists_eventually() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);

        let store = DataStore::load(&path);
        store.mutate(|data| {
            data.estimates
                .insert("EST-2".to_string(), Estimate::stub("EST-2", Utc::now()));
        });

        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            if path.exists() {
                break;
            }
        }
        assert!(path.exists(), "background writer never flushed");

        let reloaded = DataStore::load(&path);
        assert!(reloaded.read(|data| data.estimates.contains_key("EST-2")));
    }
}
