use sea_orm::DbErr;
use thiserror::Error;

use crate::config::STORE_URL_VAR;

/// A task rejected locally, before any store call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a title")]
    BlankTitle,
}

/// Any failure reported by, or on the way to, the remote store.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Missing {var} environment variable.", var = STORE_URL_VAR)]
    MissingEndpoint,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Task {0} not found")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Error returned by [`TaskBoard`](crate::TaskBoard) operations.
#[derive(Error, Debug)]
pub enum BoardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Error returned by [`TaskForm`](crate::TaskForm) submission.
#[derive(Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A submission is already in progress")]
    Busy,

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl FormError {
    /// The prompt to show the user when the form refused to submit locally.
    pub fn prompt(&self) -> Option<String> {
        match self {
            FormError::Validation(err) => Some(err.to_string()),
            FormError::Board(BoardError::Validation(err)) => Some(err.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_endpoint_names_the_variable() {
        let msg = RemoteError::MissingEndpoint.to_string();
        assert!(msg.contains("TASKSYNC_STORE_URL"), "{msg}");
    }

    #[test]
    fn test_board_error_is_transparent() {
        let err = BoardError::from(RemoteError::NotFound("7".into()));
        assert_eq!(err.to_string(), "Task 7 not found");
    }

    #[test]
    fn test_form_prompt_only_for_validation() {
        assert_eq!(
            FormError::from(ValidationError::BlankTitle).prompt().as_deref(),
            Some("Please enter a title")
        );
        assert!(FormError::Busy.prompt().is_none());
    }
}
