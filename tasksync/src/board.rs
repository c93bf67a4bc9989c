//! The task board: the in-memory view of the store's task collection.
//!
//! [`TaskBoard`] mediates every mutation and publishes its state on a
//! [`tokio::sync::watch`] channel. The collection is a disposable cache of the
//! store; it is replaced wholesale by every successful [`TaskBoard::load`] and
//! only ever patched locally for an optimistic insert.
//!
//! Loads triggered by a mutation and loads triggered by the change
//! subscription are not sequenced against each other: whichever response
//! arrives last overwrites the collection.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::BoardError;
use crate::gateway::DataGateway;
use crate::model::{NewTask, Task, TaskPatch};

/// How long a failed add keeps its error banner up.
pub const ADD_ERROR_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone)]
pub struct BoardOptions {
    /// Delay after which the banner raised by a failed add clears itself.
    pub add_error_ttl: Duration,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            add_error_ttl: ADD_ERROR_TTL,
        }
    }
}

/// A user-visible error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Loading,
    Loaded,
    Error,
}

/// Snapshot of the board: the collection, the loading flag and the banner.
///
/// The banner is advisory and sits alongside the collection; it never blocks
/// the next load.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<ErrorBanner>,
    pending_loads: usize,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            loading: true,
            error: None,
            pending_loads: 0,
        }
    }
}

impl BoardState {
    pub fn phase(&self) -> ViewPhase {
        if self.loading {
            ViewPhase::Loading
        } else if self.error.is_some() {
            ViewPhase::Error
        } else {
            ViewPhase::Loaded
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    fn begin_load(&mut self) {
        self.pending_loads += 1;
        self.loading = true;
    }

    fn end_load(&mut self) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        self.loading = self.pending_loads > 0;
    }
}

struct BoardInner {
    gateway: Arc<dyn DataGateway>,
    state: watch::Sender<BoardState>,
    options: BoardOptions,
    banner_seq: AtomicU64,
}

/// Owns the in-memory task collection and mediates all mutations.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct TaskBoard {
    inner: Arc<BoardInner>,
}

impl TaskBoard {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self::with_options(gateway, BoardOptions::default())
    }

    pub fn with_options(gateway: Arc<dyn DataGateway>, options: BoardOptions) -> Self {
        let (state, _) = watch::channel(BoardState::default());
        Self {
            inner: Arc::new(BoardInner {
                gateway,
                state,
                options,
                banner_seq: AtomicU64::new(0),
            }),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> BoardState {
        self.inner.state.borrow().clone()
    }

    /// The current collection, newest first.
    pub fn tasks(&self) -> Vec<Task> {
        self.inner.state.borrow().tasks.clone()
    }

    /// Receiver that observes every state change.
    pub fn watch(&self) -> watch::Receiver<BoardState> {
        self.inner.state.subscribe()
    }

    /// Re-query the whole collection.
    ///
    /// On success the collection is replaced and the banner cleared. On
    /// failure the banner is set and the previous collection kept. The loading
    /// flag is cleared either way.
    pub async fn load(&self) -> Result<(), BoardError> {
        self.refresh(None).await
    }

    /// Add a task.
    ///
    /// A blank title is rejected before any store call. When the store hands
    /// back the created record it is put at the front of the collection
    /// without re-querying; otherwise the collection is reloaded. A failure
    /// raises a banner that clears itself after
    /// [`BoardOptions::add_error_ttl`].
    pub async fn add(&self, title: &str, description: &str) -> Result<(), BoardError> {
        let new = NewTask::new(title, description)?;
        match self.inner.gateway.insert(new).await {
            Ok(Some(task)) => {
                log::debug!("Added task {}", task.id);
                self.inner.state.send_modify(|s| {
                    s.tasks.retain(|t| t.id != task.id);
                    s.tasks.insert(0, task);
                    s.error = None;
                });
                Ok(())
            }
            Ok(None) => self.load().await,
            Err(err) => {
                log::error!("Error adding task: {err}");
                self.raise_transient(err.to_string(), self.inner.options.add_error_ttl);
                Err(err.into())
            }
        }
    }

    /// Flip `completed` for task `id`, then reload.
    pub async fn toggle(&self, id: &str, completed: bool) -> Result<(), BoardError> {
        if let Err(err) = self
            .inner
            .gateway
            .update(id, TaskPatch::completed(!completed))
            .await
        {
            log::error!("Error toggling task {id}: {err}");
            self.raise(err.to_string());
            return Err(err.into());
        }
        self.load().await
    }

    /// Delete task `id`, then reload.
    pub async fn remove(&self, id: &str) -> Result<(), BoardError> {
        if let Err(err) = self.inner.gateway.delete(id).await {
            log::error!("Error deleting task {id}: {err}");
            self.raise(err.to_string());
            return Err(err.into());
        }
        self.load().await
    }

    /// Clear the banner, if any.
    pub fn dismiss_error(&self) {
        self.inner.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Open the change subscription, then run the initial load.
    ///
    /// A failed initial load only raises the banner; the subscription stays
    /// open so the next change retries. A failed subscription still runs the
    /// initial load, then puts the subscription error back on the banner and
    /// returns it.
    pub async fn mount(&self) -> Result<Subscription, BoardError> {
        match self.subscribe_changes().await {
            Ok(subscription) => {
                let _ = self.load().await;
                Ok(subscription)
            }
            Err(err) => {
                if self.load().await.is_ok() {
                    self.raise(err.to_string());
                }
                Err(err)
            }
        }
    }

    /// Open a change subscription that reloads the board on every change.
    pub async fn subscribe_changes(&self) -> Result<Subscription, BoardError> {
        let mut rx = match self.inner.gateway.subscribe().await {
            Ok(rx) => rx,
            Err(err) => {
                log::error!("Error subscribing to task changes: {err}");
                self.raise(err.to_string());
                return Err(err.into());
            }
        };

        let flags = Arc::new(SubscriptionFlags {
            live: AtomicBool::new(true),
            in_flight: AtomicBool::new(false),
        });
        let board = self.clone();
        let task_flags = flags.clone();
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => log::debug!(
                        "Change notification: {} on {} ({})",
                        change.kind.as_str(),
                        change.table,
                        change.primary_key
                    ),
                    Err(RecvError::Lagged(missed)) => {
                        log::warn!("Missed {missed} change notifications, refreshing")
                    }
                    Err(RecvError::Closed) => {
                        log::info!("Change stream closed");
                        break;
                    }
                }
                let _ = board.refresh(Some(task_flags.as_ref())).await;
            }
        });
        log::info!("Subscribed to task changes");

        Ok(Subscription {
            board: self.clone(),
            flags,
            task: Some(task),
        })
    }

    /// Load, optionally on behalf of a subscription. A subscription load that
    /// finds its subscription torn down, before or after the query, leaves the
    /// state untouched.
    async fn refresh(&self, flags: Option<&SubscriptionFlags>) -> Result<(), BoardError> {
        let started = self.inner.state.send_if_modified(|s| {
            if let Some(flags) = flags {
                if !flags.live.load(Ordering::SeqCst) {
                    return false;
                }
                flags.in_flight.store(true, Ordering::SeqCst);
            }
            s.begin_load();
            true
        });
        if !started {
            return Ok(());
        }

        let (tasks, banner, result) = match self.inner.gateway.query_all().await {
            Ok(tasks) => {
                log::debug!("Fetched {} tasks", tasks.len());
                (Some(tasks), None, Ok(()))
            }
            Err(err) => {
                log::error!("Error fetching tasks: {err}");
                let banner = self.next_banner(err.to_string());
                (None, Some(banner), Err(BoardError::from(err)))
            }
        };

        self.inner.state.send_if_modified(|s| {
            if let Some(flags) = flags {
                if !flags.live.load(Ordering::SeqCst) {
                    return false;
                }
                flags.in_flight.store(false, Ordering::SeqCst);
            }
            s.end_load();
            match tasks {
                Some(tasks) => {
                    s.tasks = tasks;
                    s.error = None;
                }
                None => s.error = banner,
            }
            true
        });
        result
    }

    fn next_banner(&self, message: String) -> ErrorBanner {
        let seq = self.inner.banner_seq.fetch_add(1, Ordering::SeqCst) + 1;
        ErrorBanner { message, seq }
    }

    fn raise(&self, message: String) -> u64 {
        let banner = self.next_banner(message);
        let seq = banner.seq;
        self.inner.state.send_modify(|s| s.error = Some(banner));
        seq
    }

    /// Raise a banner that clears itself after `ttl`, unless another banner
    /// replaced it in the meantime.
    fn raise_transient(&self, message: String, ttl: Duration) {
        let seq = self.raise(message);
        let inner: Weak<BoardInner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = inner.upgrade() {
                inner.state.send_if_modified(|s| match &s.error {
                    Some(banner) if banner.seq == seq => {
                        s.error = None;
                        true
                    }
                    _ => false,
                });
            }
        });
    }
}

struct SubscriptionFlags {
    live: AtomicBool,
    in_flight: AtomicBool,
}

/// Handle to a live change subscription opened by [`TaskBoard::mount`] or
/// [`TaskBoard::subscribe_changes`].
///
/// Dropping it unsubscribes. Once [`Subscription::unsubscribe`] returns, no
/// refresh started by this subscription can touch the board, including one
/// whose query is still in flight.
pub struct Subscription {
    board: TaskBoard,
    flags: Arc<SubscriptionFlags>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    pub fn unsubscribe(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        // Flip the flag under the state lock so a refresh cannot be halfway
        // through applying its result.
        let flags = &self.flags;
        self.board.inner.state.send_if_modified(|s| {
            flags.live.store(false, Ordering::SeqCst);
            if flags.in_flight.swap(false, Ordering::SeqCst) {
                s.end_load();
                true
            } else {
                false
            }
        });
        task.abort();
        log::info!("Unsubscribed from task changes");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
