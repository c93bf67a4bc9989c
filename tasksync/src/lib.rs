//! # tasksync
//!
//! A live-refreshing task list over a remote task store.
//!
//! The crate keeps an in-memory view of a remote `tasks` collection in step with
//! the store: mutations go through [`TaskBoard`], which either applies the store's
//! own result to the local collection (optimistic insert) or re-queries it, and a
//! change subscription re-queries whenever the store reports a write.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tasksync::{StoreClient, StoreConfig, TaskBoard};
//!
//! let client = StoreClient::new(StoreConfig::from_env());
//! let board = TaskBoard::new(Arc::new(client));
//!
//! // Subscribe to store changes and run the initial load.
//! let _subscription = board.mount().await?;
//!
//! board.add("Buy milk", "").await?;
//! let first = board.snapshot().tasks[0].clone();
//! board.toggle(&first.id, first.completed).await?;
//! ```
//!
//! ## Key types
//!
//! - [`TaskBoard`]: owns the in-memory collection and mediates mutations
//! - [`DataGateway`]: the query/insert/update/delete/subscribe boundary to the store
//! - [`StoreClient`]: process-wide, lazily connected gateway to the configured store
//! - [`MemoryGateway`]: in-process store for tests and demos
//! - [`TaskForm`]: draft state and submission discipline for new tasks
//! - [`partition`]: splits a collection into active and completed groups

pub mod board;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod list;
pub mod messages;
pub mod model;

pub use board::{BoardOptions, BoardState, ErrorBanner, Subscription, TaskBoard, ViewPhase};
pub use config::StoreConfig;
pub use error::{BoardError, FormError, RemoteError, ValidationError};
pub use form::TaskForm;
pub use gateway::memory::{GatewayOp, MemoryGateway};
pub use gateway::sql::SeaOrmGateway;
pub use gateway::{ChangeStream, DataGateway, StoreClient};
pub use list::{TaskIntent, TaskListView, TaskPartition, partition};
pub use messages::{ChangeNotification, WriteKind};
pub use model::{NewTask, Task, TaskPatch};

// Re-export sea-orm for users of the library
pub use sea_orm;
