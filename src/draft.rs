//! The "add a task" form

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::ValidationError;
use crate::priority::Priority;
use crate::task::{NewTask, TaskStatus};

/// What the user has typed in the "add a task" form so far
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DraftTask {
    pub title: String,
    /// A calendar date, without any time of day
    pub due: Option<NaiveDate>,
    pub priority: Priority,
}

impl DraftTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<S: ToString>(title: S, due: Option<NaiveDate>, priority: Priority) -> Self {
        Self { title: title.to_string(), due, priority }
    }

    /// Check the local preconditions of a task creation
    pub fn validate(&self) -> Result<ValidatedDraft, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let due = self.due.ok_or(ValidationError::MissingDueDate)?;

        Ok(ValidatedDraft {
            title: self.title.clone(),
            due,
            priority: self.priority,
        })
    }

    /// Empty the form, the priority going back to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A draft that is fit to be sent to the remote stores
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedDraft {
    title: String,
    due: NaiveDate,
    priority: Priority,
}

impl ValidatedDraft {
    pub fn title(&self) -> &str         { &self.title   }
    pub fn due(&self) -> NaiveDate      { self.due      }
    pub fn priority(&self) -> Priority  { self.priority }

    /// The due date, as the timestamp the task store expects: midnight UTC of that day
    pub fn due_timestamp(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.due.and_time(NaiveTime::MIN))
    }

    /// The payload that creates this task
    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            due: self.due_timestamp(),
            notes: self.priority.encode(),
            status: TaskStatus::NeedsAction,
        }
    }
}
