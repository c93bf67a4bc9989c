//! Draft state for the new-task form.
//!
//! The form only talks to the store through [`TaskBoard::add`]. While a
//! submission is in flight the form is disabled; a second submission is
//! refused rather than queued.

use crate::board::TaskBoard;
use crate::error::FormError;
use crate::model::NewTask;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    submitting: bool,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the inputs and the submit control are disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Label for the submit control.
    pub fn submit_label(&self) -> &'static str {
        if self.submitting { "Adding..." } else { "Add Task" }
    }

    /// Validate the draft and disable the form.
    ///
    /// Fails without side effects when the title is blank or a submission is
    /// already in flight.
    pub fn begin_submit(&mut self) -> Result<NewTask, FormError> {
        if self.submitting {
            return Err(FormError::Busy);
        }
        let new = NewTask::new(self.title.clone(), self.description.clone())?;
        self.submitting = true;
        Ok(new)
    }

    /// Re-enable the form, clearing the draft only if the add succeeded.
    pub fn finish_submit(&mut self, success: bool) {
        if success {
            self.title.clear();
            self.description.clear();
        }
        self.submitting = false;
    }

    /// Submit the draft to `board`.
    pub async fn submit(&mut self, board: &TaskBoard) -> Result<(), FormError> {
        let new = self.begin_submit()?;
        let result = board.add(new.title(), new.description()).await;
        self.finish_submit(result.is_ok());
        result.map_err(FormError::from)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::ValidationError;
    use crate::gateway::memory::{GatewayOp, MemoryGateway};

    fn draft(title: &str, description: &str) -> TaskForm {
        TaskForm {
            title: title.into(),
            description: description.into(),
            ..TaskForm::default()
        }
    }

    #[test]
    fn test_blank_title_does_not_disable() {
        let mut form = draft("   ", "details");
        let err = form.begin_submit().unwrap_err();
        assert!(matches!(err, FormError::Validation(ValidationError::BlankTitle)));
        assert_eq!(err.prompt().as_deref(), Some("Please enter a title"));
        assert!(!form.is_submitting());
        assert_eq!(form.description, "details");
    }

    #[test]
    fn test_second_submit_is_busy() {
        let mut form = draft("Buy milk", "");
        form.begin_submit().unwrap();
        assert!(form.is_submitting());
        assert_eq!(form.submit_label(), "Adding...");
        assert!(matches!(form.begin_submit(), Err(FormError::Busy)));
    }

    #[test]
    fn test_failure_keeps_draft() {
        let mut form = draft("Buy milk", "2 litres");
        form.begin_submit().unwrap();
        form.finish_submit(false);
        assert!(!form.is_submitting());
        assert_eq!(form.title, "Buy milk");
        assert_eq!(form.description, "2 litres");
    }

    #[tokio::test]
    async fn test_submit_clears_on_success() {
        let gateway = Arc::new(MemoryGateway::new());
        let board = TaskBoard::new(gateway.clone());
        let mut form = draft("Buy milk", "2 litres");

        form.submit(&board).await.unwrap();
        assert_eq!(form, TaskForm::default());
        assert_eq!(board.tasks()[0].title, "Buy milk");
        assert_eq!(board.tasks()[0].description, "2 litres");
    }

    #[tokio::test]
    async fn test_submit_failure_reenables() {
        let gateway = Arc::new(MemoryGateway::new());
        let board = TaskBoard::new(gateway.clone());
        gateway.fail_next(GatewayOp::Insert);
        let mut form = draft("Buy milk", "");

        assert!(matches!(form.submit(&board).await, Err(FormError::Board(_))));
        assert!(!form.is_submitting());
        assert_eq!(form.title, "Buy milk");
    }

    #[tokio::test]
    async fn test_blank_submit_never_reaches_store() {
        let gateway = Arc::new(MemoryGateway::new());
        let board = TaskBoard::new(gateway.clone());
        let mut form = draft("", "");

        assert!(form.submit(&board).await.is_err());
        assert_eq!(gateway.calls(GatewayOp::Insert), 0);
    }
}
