//! Reactive Dioxus hooks for the task board.
//!
//! The board publishes its state on a `watch` channel; these hooks mirror it
//! into a Dioxus signal so components re-render whenever the collection, the
//! loading flag or the error banner changes, whether from a local mutation or
//! from a change pushed by the store.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use tasksync::{BoardState, Subscription, TaskBoard, TaskForm};

use crate::launch::use_store;

/// A [`TaskBoard`] over the store from context, plus a signal tracking its state.
///
/// On mount the board opens its change subscription and performs the initial
/// load; every change notification from the store reloads it. The
/// subscription is torn down when the component unmounts, including when it
/// unmounts before the subscription finished opening.
pub fn use_task_board() -> (TaskBoard, Signal<BoardState>) {
    let store = use_store();
    let board = use_hook(|| TaskBoard::new(store));
    let mut state = use_signal(|| board.snapshot());
    let subscription: Rc<RefCell<Option<Subscription>>> = use_hook(|| Rc::new(RefCell::new(None)));

    // Mirror board state into the signal
    use_effect({
        let board = board.clone();
        move || {
            let mut rx = board.watch();
            spawn(async move {
                while rx.changed().await.is_ok() {
                    let snapshot = rx.borrow_and_update().clone();
                    state.set(snapshot);
                }
            });
        }
    });

    // Subscribe to changes and load
    use_effect({
        let board = board.clone();
        let subscription = subscription.clone();
        move || {
            let board = board.clone();
            let subscription = subscription.clone();
            spawn(async move {
                match board.mount().await {
                    Ok(handle) => *subscription.borrow_mut() = Some(handle),
                    Err(e) => log::error!("Failed to subscribe to task changes: {}", e),
                }
            });
        }
    });

    use_drop(move || {
        if let Some(mut handle) = subscription.borrow_mut().take() {
            handle.unsubscribe();
        }
    });

    (board, state)
}

/// Signal holding the new-task form draft.
pub fn use_task_form() -> Signal<TaskForm> {
    use_signal(TaskForm::new)
}
