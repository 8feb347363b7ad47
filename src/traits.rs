//! Traits used by the remote stores the synchronizer talks to

use std::error::Error;

use async_trait::async_trait;

use crate::task::{NewTask, Task, TaskId, TaskStatus};
use crate::task_list::{TaskList, TaskListId};
use crate::event::{CompanionEvent, EventId};

/// Any error that happens while talking to a remote store
pub type RemoteError = Box<dyn Error + Send + Sync>;

/// A remote store of task lists and tasks (e.g. the Google Tasks API)
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns (at most `max_results` of) the task lists of the account, in the order the store returns them
    async fn list_task_lists(&self, max_results: u32) -> Result<Vec<TaskList>, RemoteError>;

    /// Returns (at most `max_results` of) the tasks of a list that are not completed yet.
    /// The order is whatever the store returns.
    async fn list_incomplete_tasks(&self, task_list: &TaskListId, max_results: u32) -> Result<Vec<Task>, RemoteError>;

    /// Insert a task into a list, and returns it as created by the store (with its new ID)
    async fn insert_task(&self, task_list: &TaskListId, task: &NewTask) -> Result<Task, RemoteError>;

    /// Change the status of a task
    async fn patch_task_status(&self, task_list: &TaskListId, task: &TaskId, status: TaskStatus) -> Result<Task, RemoteError>;
}

/// A remote store of calendar events (e.g. the Google Calendar API)
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Insert an all-day event into a calendar, and returns the ID the store has assigned to it
    async fn insert_event(&self, calendar_id: &str, event: &CompanionEvent) -> Result<EventId, RemoteError>;
}
