//! Errors returned by the task list operations

use thiserror::Error;

use crate::task::TaskId;
use crate::traits::RemoteError;

/// The prompt shown when the create form is incomplete
pub const VALIDATION_PROMPT: &str = "Please fill in both title and due date.";

/// A local precondition of the create form that does not hold. No remote call is ever issued in this case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("the task title is blank")]
    MissingTitle,
    #[error("the task has no due date")]
    MissingDueDate,
}

/// Errors of the write operations of a [`TaskListSynchronizer`](crate::TaskListSynchronizer)
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("invalid task: {0}")]
    Validation(#[from] ValidationError),

    #[error("the account session is not signed in")]
    SignedOut,

    /// A create was submitted while another one is in flight. Its alert is the generic failure one, not the
    /// validation prompt: the draft itself may be complete.
    #[error("another task is already being added")]
    Busy,

    #[error("the account has no task list")]
    NoTaskList,

    #[error("task {0} is not in the local task list")]
    UnknownTask(TaskId),

    #[error("remote error: {0}")]
    Remote(RemoteError),
}

impl SyncError {
    /// Whether this error happened before any remote call was attempted
    pub fn is_local(&self) -> bool {
        match self {
            SyncError::Remote(_) | SyncError::NoTaskList => false,
            _ => true,
        }
    }

    /// The message to show to the user after a failed create.
    pub fn alert(&self) -> &'static str {
        match self {
            SyncError::Validation(_) => VALIDATION_PROMPT,
            SyncError::SignedOut => "Sign in to view and manage your tasks",
            _ => "Failed to add task. Please try again.",
        }
    }

    /// The message to show to the user after a failed completion.
    pub fn completion_alert(&self) -> &'static str {
        match self {
            SyncError::SignedOut => "Sign in to view and manage your tasks",
            _ => "Failed to complete task. Please try again.",
        }
    }
}
