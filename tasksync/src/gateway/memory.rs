//! In-process task store.
//!
//! Behaves like the remote store as seen through [`DataGateway`]: it assigns
//! sequential ids (`"1"`, `"2"`, ...) and strictly increasing `created_at`
//! timestamps, orders queries newest first and broadcasts a
//! [`ChangeNotification`] after each write. Tests use the extra knobs to count
//! calls, inject one-shot failures and withhold created records.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tokio::sync::broadcast;

use crate::error::RemoteError;
use crate::gateway::sql::TASKS_TABLE;
use crate::gateway::{ChangeStream, DataGateway};
use crate::messages::{ChangeNotification, WriteKind};
use crate::model::{NewTask, Task, TaskPatch};

/// A gateway operation, used to target failure injection and call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    QueryAll,
    Insert,
    Update,
    Delete,
    Subscribe,
}

#[derive(Debug, Default)]
struct Calls {
    query_all: AtomicUsize,
    insert: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
    subscribe: AtomicUsize,
}

impl Calls {
    fn counter(&self, op: GatewayOp) -> &AtomicUsize {
        match op {
            GatewayOp::QueryAll => &self.query_all,
            GatewayOp::Insert => &self.insert,
            GatewayOp::Update => &self.update,
            GatewayOp::Delete => &self.delete,
            GatewayOp::Subscribe => &self.subscribe,
        }
    }
}

#[derive(Debug)]
struct Rows {
    tasks: Vec<Task>,
    next_id: u64,
    clock: DateTime<Utc>,
}

pub struct MemoryGateway {
    rows: Mutex<Rows>,
    change_tx: broadcast::Sender<ChangeNotification>,
    calls: Calls,
    failures: Mutex<HashSet<GatewayOp>>,
    return_created: AtomicBool,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        let (change_tx, _) = broadcast::channel(256);
        Self {
            rows: Mutex::new(Rows {
                tasks: Vec::new(),
                next_id: 1,
                clock: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            }),
            change_tx,
            calls: Calls::default(),
            failures: Mutex::new(HashSet::new()),
            return_created: AtomicBool::new(true),
        }
    }

    /// Pre-populate the store without emitting notifications.
    ///
    /// Seeded rows follow the same id and clock sequence as inserts.
    pub fn seed(&self, title: &str, description: &str, completed: bool) -> Task {
        let mut rows = self.rows.lock().unwrap();
        let task = rows.create(title, description);
        let task = Task { completed, ..task };
        rows.tasks.push(task.clone());
        task
    }

    /// The store's current contents, newest first.
    pub fn tasks(&self) -> Vec<Task> {
        self.rows.lock().unwrap().sorted()
    }

    /// Number of calls made to `op`, including failed ones.
    pub fn calls(&self, op: GatewayOp) -> usize {
        self.calls.counter(op).load(Ordering::SeqCst)
    }

    /// Make the next call to `op` fail with [`RemoteError::Unavailable`].
    pub fn fail_next(&self, op: GatewayOp) {
        self.failures.lock().unwrap().insert(op);
    }

    /// Choose whether `insert` hands back the created record.
    pub fn set_return_created(&self, enabled: bool) {
        self.return_created.store(enabled, Ordering::SeqCst);
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.change_tx.receiver_count()
    }

    /// Push a notification as if another client had written to the store.
    pub fn notify_change(&self, notification: ChangeNotification) {
        let _ = self.change_tx.send(notification);
    }

    fn enter(&self, op: GatewayOp) -> Result<(), RemoteError> {
        self.calls.counter(op).fetch_add(1, Ordering::SeqCst);
        if self.failures.lock().unwrap().remove(&op) {
            return Err(RemoteError::Unavailable(format!("injected {op:?} failure")));
        }
        Ok(())
    }

    fn notify(&self, kind: WriteKind, id: &str) {
        self.notify_change(ChangeNotification::new(TASKS_TABLE, kind, id));
    }
}

impl Rows {
    fn create(&mut self, title: &str, description: &str) -> Task {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.clock += TimeDelta::seconds(1);
        Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
            created_at: self.clock,
        }
    }

    fn sorted(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }
}

#[async_trait]
impl DataGateway for MemoryGateway {
    async fn query_all(&self) -> Result<Vec<Task>, RemoteError> {
        self.enter(GatewayOp::QueryAll)?;
        Ok(self.tasks())
    }

    async fn insert(&self, new: NewTask) -> Result<Option<Task>, RemoteError> {
        self.enter(GatewayOp::Insert)?;
        let task = {
            let mut rows = self.rows.lock().unwrap();
            let task = rows.create(new.title(), new.description());
            rows.tasks.push(task.clone());
            task
        };
        self.notify(WriteKind::Insert, &task.id);
        if self.return_created.load(Ordering::SeqCst) {
            Ok(Some(task))
        } else {
            Ok(None)
        }
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<(), RemoteError> {
        self.enter(GatewayOp::Update)?;
        {
            let mut rows = self.rows.lock().unwrap();
            let task = rows
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
            patch.apply(task);
        }
        self.notify(WriteKind::Update, id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.enter(GatewayOp::Delete)?;
        let removed = {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.tasks.len();
            rows.tasks.retain(|t| t.id != id);
            rows.tasks.len() != before
        };
        if removed {
            self.notify(WriteKind::Delete, id);
        }
        Ok(())
    }

    async fn subscribe(&self) -> Result<ChangeStream, RemoteError> {
        self.enter(GatewayOp::Subscribe)?;
        Ok(self.change_tx.subscribe())
    }
}
