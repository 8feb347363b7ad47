//! This crate provides the task-list widget of a personal dashboard.
//!
//! It talks to two remote systems of a single account provider: a task store and a calendar store.
//! Both are abstracted behind the traits of the [`traits`] module. The [`client`] module implements them
//! over the Google Tasks and Google Calendar REST APIs, and the [`mock`] module provides an in-memory remote.
//!
//! The [`TaskListSynchronizer`](synchronizer::TaskListSynchronizer) keeps a local, re-fetchable snapshot of
//! the undone tasks of the first task list of the account. \
//! It creates tasks (together with a companion all-day calendar event), and completes tasks optimistically,
//! reconciling its local state with the remote by reloading. \
//! Nothing happens until the [`Session`](session::Session) reports the account as signed in.

pub mod traits;
pub mod config;
pub mod error;
pub use error::{SyncError, ValidationError};

pub mod session;
pub use session::Session;
pub mod task;
pub use task::{Task, TaskId, TaskStatus};
pub mod task_list;
pub use task_list::{TaskList, TaskListId};
pub mod priority;
pub use priority::Priority;
pub mod draft;
pub use draft::DraftTask;
pub mod event;
pub use event::CompanionEvent;

pub mod client;
pub mod mock;
pub mod synchronizer;
pub use synchronizer::TaskListSynchronizer;
pub mod view;

pub mod utils;

/// A [`TaskListSynchronizer`] that talks to the actual Google APIs
pub type GoogleSynchronizer = TaskListSynchronizer<client::GoogleClient, client::GoogleClient>;
