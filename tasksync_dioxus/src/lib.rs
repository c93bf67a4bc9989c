//! Dioxus integration for tasksync.
//!
//! - [`launch()`]: creates a tokio runtime, builds the process-wide
//!   [`StoreClient`](tasksync::StoreClient) and launches Dioxus desktop with the
//!   store available via context.
//! - [`use_store()`]: retrieves the shared store handle from context.
//! - [`use_task_board()`]: a [`TaskBoard`](tasksync::TaskBoard) bound to the
//!   component, with its state mirrored into a signal and its change
//!   subscription held for the component's lifetime.
//!
//! ## Example
//!
//! ```ignore
//! fn main() {
//!     tasksync_dioxus::launch(tasksync::StoreConfig::from_env(), App);
//! }
//!
//! fn App() -> Element {
//!     let (board, state) = tasksync_dioxus::use_task_board();
//!     // ... render state.read().tasks, call board.add/toggle/remove
//!     todo!()
//! }
//! ```

pub mod hooks;
pub mod launch;

pub use hooks::*;
pub use launch::{launch, use_store};
