use dioxus::prelude::*;
use tasksync::{Task, TaskIntent, TaskListView, partition};

/// Tasks split into an active section and a collapsible completed section.
///
/// Rows never talk to the store; they emit a [`TaskIntent`] and the owner
/// applies it to the board.
#[component]
pub fn TaskList(tasks: Vec<Task>, on_intent: EventHandler<TaskIntent>) -> Element {
    let mut view = use_signal(TaskListView::default);
    let parts = partition(&tasks);

    if parts.is_empty() {
        return rsx! {
            div { class: "empty",
                h3 { "No tasks yet" }
                p { "Get started by adding your first task above." }
            }
        };
    }

    let active_count = parts.active.len();
    let completed_count = parts.completed.len();
    let expanded = view.read().completed_expanded;

    rsx! {
        div { class: "task-list",
            if !parts.active.is_empty() {
                section {
                    h2 { class: "section-title", "Active Tasks ({active_count})" }
                    for task in parts.active.iter() {
                        TaskRow { key: "{task.id}", task: (*task).clone(), on_intent }
                    }
                }
            }
            if !parts.completed.is_empty() {
                section {
                    button {
                        class: "section-title",
                        onclick: move |_| view.write().toggle_completed(),
                        "Completed ({completed_count})"
                        span { class: if expanded { "chevron open" } else { "chevron" }, "▾" }
                    }
                    if expanded {
                        for task in parts.completed.iter() {
                            TaskRow { key: "{task.id}", task: (*task).clone(), on_intent }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TaskRow(task: Task, on_intent: EventHandler<TaskIntent>) -> Element {
    let toggle = TaskIntent::toggle(&task);
    let delete = TaskIntent::delete(&task);

    // Active rows show when the task was created; completed rows only the day.
    let date = task.created_date_label();
    let when = if task.completed {
        date
    } else {
        format!("{date} at {}", task.created_time_label())
    };
    let (row_class, toggle_title) = if task.completed {
        ("task-item completed", "Mark as incomplete")
    } else {
        ("task-item", "Mark as complete")
    };

    rsx! {
        div { class: "{row_class}",
            button {
                class: "check",
                title: "{toggle_title}",
                onclick: move |_| on_intent.call(toggle.clone()),
                if task.completed { "✓" }
            }
            div { class: "body",
                h3 { "{task.title}" }
                if !task.description.is_empty() {
                    p { "{task.description}" }
                }
                span { class: "when", "{when}" }
            }
            button {
                class: "delete",
                title: "Delete task",
                onclick: move |_| on_intent.call(delete.clone()),
                "Delete"
            }
        }
    }
}
