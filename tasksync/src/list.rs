//! Task list rendering model: active/completed grouping and the intents a
//! rendered list can emit.

use crate::model::Task;

/// The collection split into active and completed tasks, each keeping the
/// caller's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPartition<'a> {
    pub active: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl TaskPartition<'_> {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}

pub fn partition(tasks: &[Task]) -> TaskPartition<'_> {
    let (completed, active) = tasks.iter().partition(|t| t.completed);
    TaskPartition { active, completed }
}

/// What a rendered list asks its owner to do. The list itself never calls the
/// store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskIntent {
    /// Flip `completed`; carries the state the task was rendered with.
    Toggle { id: String, completed: bool },
    Delete { id: String },
}

impl TaskIntent {
    pub fn toggle(task: &Task) -> Self {
        TaskIntent::Toggle {
            id: task.id.clone(),
            completed: task.completed,
        }
    }

    pub fn delete(task: &Task) -> Self {
        TaskIntent::Delete {
            id: task.id.clone(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TaskIntent::Toggle { id, .. } | TaskIntent::Delete { id } => id,
        }
    }
}

/// Ephemeral view state of the list. The completed section starts collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListView {
    pub completed_expanded: bool,
}

impl TaskListView {
    pub fn toggle_completed(&mut self) {
        self.completed_expanded = !self.completed_expanded;
    }
}
