mod components;

use components::{NewTaskForm, TaskList};
use dioxus::prelude::*;
use tasksync::{StoreConfig, TaskIntent};
use tasksync_dioxus::use_task_board;

const STYLE: &str = r#"
    body { font-family: sans-serif; margin: 0; background: linear-gradient(135deg, #eff6ff, #e0e7ff); min-height: 100vh; }
    main { max-width: 640px; margin: 0 auto; padding: 24px; }
    .card { background: white; border-radius: 8px; box-shadow: 0 10px 20px rgba(0,0,0,0.08); overflow: hidden; }
    header { background: linear-gradient(90deg, #2563eb, #4f46e5); padding: 24px 32px; color: white; }
    header h1 { margin: 0; font-size: 28px; }
    header p { margin: 4px 0 0; color: #dbeafe; }
    .content { padding: 32px; }
    .error { display: flex; justify-content: space-between; margin-bottom: 16px; padding: 12px 16px; background: #fef2f2; border: 1px solid #fecaca; color: #b91c1c; border-radius: 8px; }
    .error button { background: none; border: none; color: inherit; cursor: pointer; font-size: 16px; }
    .add-form { display: flex; flex-direction: column; gap: 12px; margin-bottom: 32px; }
    .add-form label { font-size: 14px; color: #374151; }
    .add-form input, .add-form textarea { padding: 8px 12px; font-size: 14px; border: 1px solid #d1d5db; border-radius: 8px; resize: none; }
    .add-form .prompt { color: #b91c1c; font-size: 13px; }
    .add-form button { padding: 10px 16px; background: #4f46e5; color: white; border: none; border-radius: 8px; cursor: pointer; }
    .add-form button:disabled { opacity: 0.5; cursor: not-allowed; }
    .spinner { margin: 48px auto; width: 32px; height: 32px; border-radius: 50%; border-bottom: 2px solid #4f46e5; animation: spin 1s linear infinite; }
    @keyframes spin { to { transform: rotate(360deg); } }
    .empty { text-align: center; padding: 48px 0; color: #6b7280; }
    .empty h3 { color: #111827; }
    .section-title { display: flex; align-items: center; gap: 8px; font-size: 18px; margin: 0 0 12px; background: none; border: none; cursor: pointer; padding: 0; }
    .chevron { transition: transform 0.2s; }
    .chevron.open { transform: rotate(180deg); }
    .task-item { display: flex; align-items: flex-start; gap: 12px; padding: 12px 16px; margin-bottom: 10px; border-radius: 8px; border: 1px solid #dbeafe; background: #eff6ff; }
    .task-item.completed { border-color: #e5e7eb; background: #f9fafb; color: #9ca3af; }
    .task-item.completed h3, .task-item.completed p { text-decoration: line-through; }
    .task-item h3 { margin: 0; font-size: 15px; }
    .task-item p { margin: 4px 0 0; font-size: 13px; }
    .task-item .body { flex: 1; min-width: 0; }
    .task-item .when { display: block; margin-top: 6px; font-size: 12px; color: #6b7280; }
    .task-item .check { width: 24px; height: 24px; border-radius: 50%; border: 2px solid #60a5fa; background: white; cursor: pointer; }
    .task-item.completed .check { border-color: #22c55e; background: #22c55e; color: white; }
    .task-item .delete { background: none; border: none; color: #f87171; cursor: pointer; }
    footer { text-align: center; margin-top: 32px; color: #1e3a8a; font-size: 14px; }
"#;

fn main() {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    env_logger::init();
    tasksync_dioxus::launch(StoreConfig::from_env(), App);
}

#[allow(non_snake_case)]
fn App() -> Element {
    let (board, state) = use_task_board();
    use_context_provider(|| board.clone());

    let snapshot = state.read().clone();
    let error = snapshot.error_message().map(str::to_string);
    let dismiss_board = board.clone();

    rsx! {
        style { {STYLE} }
        main {
            div { class: "card",
                header {
                    h1 { "My To-Do List" }
                    p { "Stay organized and productive" }
                }
                div { class: "content",
                    if let Some(message) = error {
                        div { class: "error",
                            span { "{message}" }
                            button {
                                title: "Dismiss",
                                onclick: move |_| dismiss_board.dismiss_error(),
                                "×"
                            }
                        }
                    }

                    NewTaskForm {}

                    if snapshot.loading {
                        div { class: "spinner" }
                    } else {
                        TaskList {
                            tasks: snapshot.tasks.clone(),
                            on_intent: move |intent: TaskIntent| {
                                let board = board.clone();
                                spawn(async move {
                                    // Failures are already on the board's banner.
                                    let _ = match intent {
                                        TaskIntent::Toggle { id, completed } => board.toggle(&id, completed).await,
                                        TaskIntent::Delete { id } => board.remove(&id).await,
                                    };
                                });
                            },
                        }
                    }
                }
            }
            footer { p { "Built with Dioxus and tasksync." } }
        }
    }
}
