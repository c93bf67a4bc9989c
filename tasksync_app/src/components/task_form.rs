use dioxus::prelude::*;
use tasksync::TaskBoard;
use tasksync_dioxus::use_task_form;

/// Title and description inputs plus the submit button.
///
/// Adds through the [`TaskBoard`] provided by the app root. Inputs and the
/// button stay disabled while a submission is in flight.
#[component]
pub fn NewTaskForm() -> Element {
    let board = use_context::<TaskBoard>();
    let mut form = use_task_form();
    let mut prompt = use_signal(|| None::<String>);

    let (title, description, submitting, label) = {
        let form = form.read();
        (
            form.title.clone(),
            form.description.clone(),
            form.is_submitting(),
            form.submit_label(),
        )
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let new_task = match form.write().begin_submit() {
            Ok(new_task) => new_task,
            Err(e) => {
                prompt.set(e.prompt());
                return;
            }
        };
        prompt.set(None);

        let board = board.clone();
        spawn(async move {
            let result = board.add(new_task.title(), new_task.description()).await;
            if let Err(e) = &result {
                log::warn!("Add failed, keeping draft: {}", e);
            }
            form.write().finish_submit(result.is_ok());
        });
    };

    rsx! {
        form { class: "add-form", onsubmit: on_submit,
            label { r#for: "title", "Task Title" }
            input {
                id: "title",
                r#type: "text",
                placeholder: "Enter a new task...",
                value: "{title}",
                disabled: submitting,
                oninput: move |evt| form.write().title = evt.value(),
            }
            if let Some(message) = prompt() {
                span { class: "prompt", "{message}" }
            }
            label { r#for: "description", "Description (optional)" }
            textarea {
                id: "description",
                rows: "3",
                placeholder: "Add some details...",
                value: "{description}",
                disabled: submitting,
                oninput: move |evt| form.write().description = evt.value(),
            }
            button { r#type: "submit", disabled: submitting, "{label}" }
        }
    }
}
