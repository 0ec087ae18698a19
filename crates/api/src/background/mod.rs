//! Background jobs and their observable status.

pub mod group_sync;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use apimgr_core::types::Timestamp;

/// Lifecycle of the periodic sync, exposed through `GET /api/sync-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncState {
    Idle,
    Syncing,
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub state: SyncState,
    /// Completion time of the last finished run, successful or not.
    pub last_sync_at: Option<Timestamp>,
}

/// Shared handle over the sync status. Cloned into both the job task and the
/// HTTP state.
#[derive(Clone)]
pub struct SyncStatusHandle(Arc<RwLock<SyncStatus>>);

impl SyncStatusHandle {
    pub fn new() -> Self {
        Self(Arc::new(RwLock::new(SyncStatus {
            state: SyncState::Idle,
            last_sync_at: None,
        })))
    }

    pub async fn mark_syncing(&self) {
        self.0.write().await.state = SyncState::Syncing;
    }

    /// Record the outcome of a finished run and stamp the completion time.
    pub async fn mark_finished(&self, success: bool) {
        let mut status = self.0.write().await;
        status.state = if success {
            SyncState::Success
        } else {
            SyncState::Failed
        };
        status.last_sync_at = Some(chrono::Utc::now());
    }

    pub async fn snapshot(&self) -> SyncStatus {
        self.0.read().await.clone()
    }
}

impl Default for SyncStatusHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn status_starts_idle_with_no_timestamp() {
        let handle = SyncStatusHandle::new();
        let status = handle.snapshot().await;
        assert_eq!(status.state, SyncState::Idle);
        assert!(status.last_sync_at.is_none());
    }

    #[tokio::test]
    async fn finishing_stamps_time_and_outcome() {
        let handle = SyncStatusHandle::new();
        handle.mark_syncing().await;
        assert_eq!(handle.snapshot().await.state, SyncState::Syncing);

        handle.mark_finished(false).await;
        let status = handle.snapshot().await;
        assert_eq!(status.state, SyncState::Failed);
        assert!(status.last_sync_at.is_some());

        handle.mark_finished(true).await;
        assert_eq!(handle.snapshot().await.state, SyncState::Success);
    }
}
