//! The Data Gateway: the query/insert/update/delete/subscribe boundary between
//! the task board and the remote store.
//!
//! Backends:
//!
//! - [`SeaOrmGateway`](sql::SeaOrmGateway): a SeaORM connection to the configured store
//! - [`StoreClient`]: the process-wide handle that connects a `SeaOrmGateway` on first use
//! - [`MemoryGateway`](memory::MemoryGateway): in-process store used as a fake in tests

pub mod memory;
pub mod sql;

use async_trait::async_trait;
use tokio::sync::{OnceCell, broadcast};

use crate::config::StoreConfig;
use crate::error::RemoteError;
use crate::messages::ChangeNotification;
use crate::model::{NewTask, Task, TaskPatch};

use self::sql::SeaOrmGateway;

/// Live stream of store changes. Dropping it unsubscribes.
///
/// A `Lagged` receive error means notifications were dropped; subscribers
/// should treat it like any other change.
pub type ChangeStream = broadcast::Receiver<ChangeNotification>;

/// Capabilities the task board consumes from the remote store.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// All tasks, newest first (`created_at` descending).
    async fn query_all(&self) -> Result<Vec<Task>, RemoteError>;

    /// Insert a task. The store assigns `id` and `created_at`, and may return
    /// the created record.
    async fn insert(&self, task: NewTask) -> Result<Option<Task>, RemoteError>;

    /// Update the task with `id`. Fails with [`RemoteError::NotFound`] if no
    /// such task exists.
    async fn update(&self, id: &str, patch: TaskPatch) -> Result<(), RemoteError>;

    /// Delete the task with `id`. Deleting a missing task is not an error.
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;

    /// Open a change subscription covering inserts, updates and deletes.
    async fn subscribe(&self) -> Result<ChangeStream, RemoteError>;
}

/// Process-wide handle to the configured store.
///
/// Cheap to create; the underlying connection is opened on first use and kept
/// for the life of the handle. Share it behind an `Arc` and pass it to whoever
/// needs the store.
pub struct StoreClient {
    config: StoreConfig,
    gateway: OnceCell<SeaOrmGateway>,
}

impl StoreClient {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            gateway: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether the connection has been opened yet.
    pub fn is_connected(&self) -> bool {
        self.gateway.initialized()
    }

    /// Get the connected gateway, connecting on first call.
    ///
    /// Fails with [`RemoteError::MissingEndpoint`] when no endpoint is
    /// configured. A failed attempt is not cached; the next call retries.
    pub async fn gateway(&self) -> Result<&SeaOrmGateway, RemoteError> {
        self.gateway
            .get_or_try_init(|| async {
                let url = self
                    .config
                    .connection_url()
                    .ok_or(RemoteError::MissingEndpoint)?;
                log::info!("Connecting to task store");
                SeaOrmGateway::connect(&url).await
            })
            .await
    }
}

#[async_trait]
impl DataGateway for StoreClient {
    async fn query_all(&self) -> Result<Vec<Task>, RemoteError> {
        self.gateway().await?.query_all().await
    }

    async fn insert(&self, task: NewTask) -> Result<Option<Task>, RemoteError> {
        self.gateway().await?.insert(task).await
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<(), RemoteError> {
        self.gateway().await?.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.gateway().await?.delete(id).await
    }

    async fn subscribe(&self) -> Result<ChangeStream, RemoteError> {
        self.gateway().await?.subscribe().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_endpoint_fails_on_first_use() {
        let client = StoreClient::new(StoreConfig::default());
        assert!(!client.is_connected());

        let err = client.query_all().await.unwrap_err();
        assert!(matches!(err, RemoteError::MissingEndpoint));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_connects_lazily_once() {
        let client = StoreClient::new(StoreConfig::new("sqlite::memory:"));
        assert!(!client.is_connected());

        let inserted = client
            .insert(NewTask::new("Buy milk", "").unwrap())
            .await
            .expect("insert")
            .expect("created record");
        assert!(client.is_connected());

        // Same connection: an in-memory SQLite database would be empty otherwise.
        let all = client.query_all().await.expect("query");
        assert_eq!(all, vec![inserted]);
    }
}
