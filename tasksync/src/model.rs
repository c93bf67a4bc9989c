use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A persisted to-do item.
///
/// `id` and `created_at` are assigned by the store on insert and never change;
/// `completed` is the only field mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creation date in the local time zone, e.g. `"Oct 17, 2026"`.
    pub fn created_date_label(&self) -> String {
        self.created_date_label_in(&Local)
    }

    /// Creation time in the local time zone, e.g. `"4:05 PM"`.
    pub fn created_time_label(&self) -> String {
        self.created_time_label_in(&Local)
    }

    pub fn created_date_label_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.created_at.with_timezone(tz).format("%b %-d, %Y").to_string()
    }

    pub fn created_time_label_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.created_at.with_timezone(tz).format("%-I:%M %p").to_string()
    }
}

/// A validated insert payload. The title is guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    title: String,
    description: String,
}

impl NewTask {
    /// Build an insert payload, rejecting a title that is empty once trimmed.
    ///
    /// The title and description are stored exactly as typed.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        Ok(Self {
            title,
            description: description.into(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Fields to change on an existing task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_none()
    }

    /// Apply the patch to an in-memory task.
    pub fn apply(&self, task: &mut Task) {
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}
