use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use chrono::Utc;
use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::{
    db::{Database, SavedItem, StoryRecord},
    error::ArchiveError,
};

/// Result of the save/unsave toggle offered on a story page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Saved,
    Removed,
    Failed,
}

impl ToggleOutcome {
    /// Toast text shown after the toggle.
    pub fn notice(&self) -> Notice {
        match self {
            ToggleOutcome::Saved => Notice::success("Story saved to your archive"),
            ToggleOutcome::Removed => Notice::success("Story removed from your archive"),
            ToggleOutcome::Failed => Notice::error("Failed to update archive. Please try again."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient, non-blocking user notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Offline archive of saved stories.
///
/// Holds at most one live [`Database`] at a time. `open` is single-flight:
/// concurrent callers wait on the same lock and receive the connection the
/// first caller created. After `close`, the next operation opens a fresh one.
pub struct ArchiveStore {
    db_path: Option<PathBuf>,
    connection: Mutex<Option<Database>>,
    unavailable_reported: AtomicBool,
}

impl ArchiveStore {
    /// `db_path` is `None` when the host has no durable storage location.
    pub fn new(db_path: Option<PathBuf>) -> Self {
        Self {
            db_path,
            connection: Mutex::new(None),
            unavailable_reported: AtomicBool::new(false),
        }
    }

    pub async fn open(&self) -> Result<Database, ArchiveError> {
        let mut guard = self.connection.lock().await;
        match guard.as_ref() {
            Some(db) if db.is_alive() => return Ok(db.clone()),
            Some(_) => {
                warn!("Archive connection was closed underneath us; reopening");
                *guard = None;
            }
            None => {}
        }

        let Some(path) = self.db_path.clone() else {
            return Err(self.unavailable("no durable storage location configured".into()));
        };

        let opened = tokio::task::spawn_blocking(move || Database::open(path)).await;
        let db = match opened {
            Ok(Ok(db)) => db,
            Ok(Err(err)) => return Err(self.unavailable(format!("{err:#}"))),
            Err(join_err) => return Err(self.unavailable(join_err.to_string())),
        };

        *guard = Some(db.clone());
        Ok(db)
    }

    /// Whether a live connection is currently cached.
    pub async fn is_open(&self) -> bool {
        self.connection
            .lock()
            .await
            .as_ref()
            .is_some_and(Database::is_alive)
    }

    /// Archives `record`, replacing any earlier copy. Stamps `saved_at`.
    pub async fn save(&self, record: StoryRecord) -> bool {
        let db = match self.open().await {
            Ok(db) => db,
            Err(err) => {
                error!("Error in save: {err}");
                return false;
            }
        };

        let id = record.id.clone();
        let item = SavedItem::stamped(record, Utc::now());
        match db.put_saved_item(item).await {
            Ok(()) => {
                info!("Saved story {id} to archive");
                true
            }
            Err(source) => {
                error!(
                    "{}",
                    ArchiveError::StorageIo {
                        operation: "save",
                        source
                    }
                );
                false
            }
        }
    }

    /// Every archived record, in no particular order.
    pub async fn get_all(&self) -> Vec<SavedItem> {
        let db = match self.open().await {
            Ok(db) => db,
            Err(err) => {
                error!("Error in get_all: {err}");
                return Vec::new();
            }
        };

        match db.get_all_saved_items().await {
            Ok(items) => items,
            Err(source) => {
                error!(
                    "{}",
                    ArchiveError::StorageIo {
                        operation: "get_all",
                        source
                    }
                );
                Vec::new()
            }
        }
    }

    /// Archived records for the "recently saved" view, newest first.
    pub async fn saved_newest_first(&self) -> Vec<SavedItem> {
        let mut items = self.get_all().await;
        items.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        items
    }

    pub async fn get(&self, id: &str) -> Option<SavedItem> {
        let db = match self.open().await {
            Ok(db) => db,
            Err(err) => {
                error!("Error in get: {err}");
                return None;
            }
        };

        db.get_saved_item(id).await.unwrap_or_else(|source| {
            error!(
                "{}",
                ArchiveError::StorageIo {
                    operation: "get",
                    source
                }
            );
            None
        })
    }

    pub async fn is_saved(&self, id: &str) -> bool {
        let db = match self.open().await {
            Ok(db) => db,
            Err(err) => {
                error!("Error in is_saved: {err}");
                return false;
            }
        };

        match db.saved_item_exists(id).await {
            Ok(found) => found,
            Err(source) => {
                error!(
                    "{}",
                    ArchiveError::StorageIo {
                        operation: "is_saved",
                        source
                    }
                );
                false
            }
        }
    }

    /// Removes `id`. Unknown ids still report success.
    pub async fn delete(&self, id: &str) -> bool {
        let db = match self.open().await {
            Ok(db) => db,
            Err(err) => {
                error!("Error in delete: {err}");
                return false;
            }
        };

        match db.delete_saved_item(id).await {
            Ok(()) => {
                info!("Removed story {id} from archive");
                true
            }
            Err(source) => {
                error!(
                    "{}",
                    ArchiveError::StorageIo {
                        operation: "delete",
                        source
                    }
                );
                false
            }
        }
    }

    /// Saves `record` when absent, removes it when present.
    pub async fn toggle(&self, record: StoryRecord) -> ToggleOutcome {
        if self.is_saved(&record.id).await {
            if self.delete(&record.id).await {
                ToggleOutcome::Removed
            } else {
                ToggleOutcome::Failed
            }
        } else if self.save(record).await {
            ToggleOutcome::Saved
        } else {
            ToggleOutcome::Failed
        }
    }

    /// Releases the live connection, if any. Safe to call repeatedly.
    pub async fn close(&self) {
        let taken = self.connection.lock().await.take();
        if let Some(db) = taken {
            if let Err(err) = tokio::task::spawn_blocking(move || db.close()).await {
                error!("Failed to close archive database: {err}");
            }
        }
    }

    fn unavailable(&self, reason: String) -> ArchiveError {
        if !self.unavailable_reported.swap(true, Ordering::SeqCst) {
            warn!("Archive storage unavailable: {reason}");
        }
        ArchiveError::StorageUnavailable(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_storage_degrades_to_sentinels() {
        let store = ArchiveStore::new(None);

        assert!(matches!(
            store.open().await,
            Err(ArchiveError::StorageUnavailable(_))
        ));
        assert!(!store.is_saved("anything").await);
        assert!(!store.delete("anything").await);
        assert!(store.get_all().await.is_empty());
    }

    #[test]
    fn toggle_notices_match_outcome() {
        assert_eq!(ToggleOutcome::Saved.notice().level, NoticeLevel::Success);
        assert_eq!(
            ToggleOutcome::Removed.notice().message,
            "Story removed from your archive"
        );
        assert_eq!(ToggleOutcome::Failed.notice().level, NoticeLevel::Error);
    }
}
