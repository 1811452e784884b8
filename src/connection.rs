use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::db::Database;
use crate::error::ConnectionError;

/// Owns at most one open [`Database`] and hands out clones of it.
///
/// The first caller of [`ConnectionManager::acquire`] opens the database while holding the
/// guard, so concurrent callers wait on that single attempt and then share its result. A
/// failed attempt leaves nothing cached and the next call tries again.
pub struct ConnectionManager {
    path: PathBuf,
    handle: Mutex<Option<Database>>,
}

impl ConnectionManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn init(&self) -> Result<Database, ConnectionError> {
        self.acquire().await
    }

    pub async fn acquire(&self) -> Result<Database, ConnectionError> {
        let mut guard = self.handle.lock().await;
        if let Some(db) = guard.as_ref() {
            return Ok(db.clone());
        }

        tracing::debug!("opening database at {:?}", self.path);
        match Database::open(&self.path).await {
            Ok(db) => {
                tracing::info!("database ready at {:?}", self.path);
                *guard = Some(db.clone());
                Ok(db)
            }
            Err(err) => {
                tracing::warn!("database connection failed: {err}");
                Err(err)
            }
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.handle.lock().await.is_some()
    }

    pub async fn close(&self) {
        if self.handle.lock().await.take().is_some() {
            tracing::info!("database handle released");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("event-booking-{name}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_connection() {
        let manager = Arc::new(ConnectionManager::new(":memory:"));
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move { manager.acquire().await })
            })
            .collect();

        let mut handles = Vec::new();
        for task in tasks {
            handles.push(task.await.unwrap().unwrap());
        }
        let first = &handles[0];
        assert!(handles.iter().all(|db| db.same_connection(first)));
        assert!(manager.is_connected().await);
    }

    #[tokio::test]
    async fn failed_attempt_is_not_cached() {
        let dir = scratch_dir("retry");
        let _ = std::fs::remove_dir_all(&dir);
        let manager = ConnectionManager::new(dir.join("db.sqlite"));

        let err = manager.acquire().await.unwrap_err();
        assert!(matches!(err, ConnectionError::Open { .. }));
        assert!(!manager.is_connected().await);

        std::fs::create_dir_all(&dir).unwrap();
        let db = manager.acquire().await.unwrap();
        assert!(manager.is_connected().await);
        assert!(db.same_connection(&manager.acquire().await.unwrap()));

        manager.close().await;
        drop(db);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn close_allows_reopening() {
        let manager = ConnectionManager::new(":memory:");
        let first = manager.init().await.unwrap();
        manager.close().await;
        assert!(!manager.is_connected().await);

        let second = manager.acquire().await.unwrap();
        assert!(!first.same_connection(&second));
    }
}
