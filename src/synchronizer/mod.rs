//! This module keeps a local view of the undone tasks of the account in sync with the remote stores
//!
//! There is no transaction between the two remote stores, and no local persistence:
//! * the local task list is a snapshot that every load replaces entirely,
//! * creating a task is two independent remote writes (the task, then its companion event),
//! * completing a task updates the local list right away, then the local list is reconciled by reloading
//!   everything, whatever the outcome of the remote update. This can briefly show a wrong state when another
//!   client edits the same tasks.

use std::sync::{Arc, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{MAX_TASK_LISTS, MAX_TASKS, PRIMARY_CALENDAR};
use crate::draft::{DraftTask, ValidatedDraft};
use crate::error::SyncError;
use crate::event::CompanionEvent;
use crate::session::Session;
use crate::task::{self, Task, TaskId, TaskStatus};
use crate::task_list::TaskList;
use crate::traits::{CalendarStore, RemoteError, TaskStore};
use crate::view::{TaskRow, WidgetView};

pub mod feedback;
use feedback::{FeedbackSender, OperationProgress, WidgetEvent};

/// What happened during a [`TaskListSynchronizer::load`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The session is signed out, nothing has been fetched
    SignedOut,
    /// The account has no task list. The local list is now empty
    NoTaskList,
    /// The local list has been replaced by this many tasks
    Loaded(usize),
    /// A remote call failed (see the logs). The local list is unchanged
    Failed,
}

#[derive(Default)]
struct WidgetState {
    tasks: Vec<Task>,
    /// How many loads are in flight
    loading: usize,
}

/// Clears the "adding" flag when a creation is over, whatever its outcome
struct AddingGuard<'a>(&'a AtomicBool);

impl<'a> AddingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl<'a> Drop for AddingGuard<'a> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Counts a load in flight, until it is over or dropped halfway
struct LoadingGuard<'a>(&'a Mutex<WidgetState>);

impl<'a> LoadingGuard<'a> {
    fn acquire(state: &'a Mutex<WidgetState>) -> Self {
        lock_state(state).loading += 1;
        Self(state)
    }
}

impl<'a> Drop for LoadingGuard<'a> {
    fn drop(&mut self) {
        lock_state(self.0).loading -= 1;
    }
}

fn lock_state(state: &Mutex<WidgetState>) -> MutexGuard<'_, WidgetState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The undone tasks of the first task list of an account, and the operations on them.
///
/// `T` is the task store (usually a [`GoogleClient`](crate::client::GoogleClient)), `C` is the calendar store that
/// receives companion events (usually the same client). In tests, both are usually a [`MockRemote`](crate::mock::MockRemote).
///
/// Every method takes `&self`, so that a synchronizer can be shared (e.g. in an `Arc`) between concurrent UI actions.
pub struct TaskListSynchronizer<T, C>
where
    T: TaskStore,
    C: CalendarStore,
{
    task_store: T,
    calendar_store: C,
    session: Arc<Session>,

    state: Mutex<WidgetState>,
    adding: AtomicBool,
    feedback_sender: Option<FeedbackSender>,
}

impl<T, C> TaskListSynchronizer<T, C>
where
    T: TaskStore,
    C: CalendarStore,
{
    /// Create a synchronizer. Its task list is empty until the first [`load`](Self::load)
    pub fn new(task_store: T, calendar_store: C, session: Arc<Session>) -> Self {
        Self {
            task_store,
            calendar_store,
            session,
            state: Mutex::new(WidgetState::default()),
            adding: AtomicBool::new(false),
            feedback_sender: None,
        }
    }

    /// Create a synchronizer that reports the progress of its operations to a [`feedback_channel`](feedback::feedback_channel)
    pub fn new_with_feedback(task_store: T, calendar_store: C, session: Arc<Session>, feedback_sender: FeedbackSender) -> Self {
        let mut synchronizer = Self::new(task_store, calendar_store, session);
        synchronizer.feedback_sender = Some(feedback_sender);
        synchronizer
    }

    pub fn task_store(&self) -> &T { &self.task_store }
    pub fn calendar_store(&self) -> &C { &self.calendar_store }
    pub fn session(&self) -> &Arc<Session> { &self.session }

    fn state(&self) -> MutexGuard<'_, WidgetState> {
        lock_state(&self.state)
    }

    fn progress(&self) -> OperationProgress<'_> {
        OperationProgress::new_with_feedback_channel(self.feedback_sender.as_ref())
    }

    /// A copy of the local task list, in display order
    pub fn tasks(&self) -> Vec<Task> {
        self.state().tasks.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading > 0
    }

    /// Whether a task creation is in progress. No other creation can start meanwhile
    pub fn is_adding(&self) -> bool {
        self.adding.load(Ordering::Acquire)
    }

    /// What the widget should currently display
    pub fn view(&self) -> WidgetView {
        if self.session.is_signed_in() == false {
            return WidgetView::SignedOut;
        }

        let state = self.state();
        if state.tasks.is_empty() {
            if state.loading > 0 {
                WidgetView::Syncing
            } else {
                WidgetView::Empty
            }
        } else {
            WidgetView::Tasks(state.tasks.iter().map(TaskRow::from).collect())
        }
    }

    /// Fetch the undone tasks of the first task list, and replace the local list with them.
    ///
    /// Tasks are sorted by due date, undated tasks last.
    /// Errors are logged and otherwise ignored: the local list keeps its previous content.
    pub async fn load(&self) -> LoadOutcome {
        let mut progress = self.progress();
        let outcome = self.refresh(&mut progress).await;
        if outcome != LoadOutcome::SignedOut {
            progress.finish();
        }
        outcome
    }

    /// The body of [`Self::load`]. The caller owns `progress`, and publishes the end of its own operation
    async fn refresh(&self, progress: &mut OperationProgress<'_>) -> LoadOutcome {
        if self.session.is_signed_in() == false {
            log::debug!("Not loading tasks, the session is signed out");
            return LoadOutcome::SignedOut;
        }

        progress.debug("Loading tasks...");
        progress.feedback(WidgetEvent::Loading);
        let _loading = LoadingGuard::acquire(&self.state);

        let outcome = match self.fetch_sorted_tasks().await {
            Err(err) => {
                progress.error(&format!("Unable to fetch tasks: {}", err));
                LoadOutcome::Failed
            },
            Ok(None) => {
                progress.info("This account has no task list");
                self.state().tasks.clear();
                LoadOutcome::NoTaskList
            },
            Ok(Some(tasks)) => {
                let n_tasks = tasks.len();
                progress.debug(&format!("Loaded {} tasks", n_tasks));
                self.state().tasks = tasks;
                LoadOutcome::Loaded(n_tasks)
            },
        };

        outcome
    }

    async fn fetch_sorted_tasks(&self) -> Result<Option<Vec<Task>>, RemoteError> {
        let task_lists = self.task_store.list_task_lists(MAX_TASK_LISTS).await?;
        let task_list = match task_lists.into_iter().next() {
            None => return Ok(None),
            Some(list) => list,
        };

        let mut tasks = self.task_store.list_incomplete_tasks(task_list.id(), MAX_TASKS).await?;
        task::sort_by_due_date(&mut tasks);
        Ok(Some(tasks))
    }

    /// Always query the remote for the first task list, it is never cached
    async fn first_task_list(&self) -> Result<TaskList, SyncError> {
        self.task_store.list_task_lists(1).await
            .map_err(SyncError::Remote)?
            .into_iter()
            .next()
            .ok_or(SyncError::NoTaskList)
    }

    /// Create a task from the "add a task" form, along with its companion calendar event, then reload the tasks.
    ///
    /// An incomplete draft is rejected before any remote call. Only one creation can run at a time: a second one
    /// fails with [`SyncError::Busy`] until the first is over. \
    /// On success, the draft is reset. On failure, it is kept, so that the user can submit it again.
    ///
    /// Note that in case the companion event cannot be created, the task still exists on the remote.
    pub async fn create(&self, draft: &mut DraftTask) -> Result<(), SyncError> {
        let validated = draft.validate()?;
        if self.session.is_signed_in() == false {
            return Err(SyncError::SignedOut);
        }
        let _adding = AddingGuard::acquire(&self.adding).ok_or(SyncError::Busy)?;

        let mut progress = self.progress();
        progress.info(&format!("Adding task {}", validated.title()));
        progress.feedback(WidgetEvent::Adding{ title: validated.title().to_string() });

        if let Err(err) = self.push_new_task(&validated).await {
            progress.error(&format!("Unable to add task {}: {}", validated.title(), err));
            progress.finish();
            return Err(err);
        }

        draft.reset();
        self.refresh(&mut progress).await;
        progress.finish();
        Ok(())
    }

    async fn push_new_task(&self, draft: &ValidatedDraft) -> Result<(), SyncError> {
        let task_list = self.first_task_list().await?;

        let created = self.task_store.insert_task(task_list.id(), &draft.to_new_task()).await
            .map_err(SyncError::Remote)?;
        log::debug!("Task {} created", created.id());

        let event = CompanionEvent::for_task(draft);
        let event_id = self.calendar_store.insert_event(PRIMARY_CALENDAR, &event).await
            .map_err(SyncError::Remote)?;
        log::debug!("Companion event {} created", event_id);

        Ok(())
    }

    /// Mark a task as completed.
    ///
    /// The task leaves the local list right away, before the remote store is even contacted. \
    /// Whatever the outcome of the remote update, the whole list is then reloaded. After a failure, this brings the
    /// task back if the update did not happen, or confirms it is gone if it did. The error is returned after that reload.
    pub async fn complete(&self, task_id: &TaskId) -> Result<(), SyncError> {
        if self.session.is_signed_in() == false {
            return Err(SyncError::SignedOut);
        }

        let removed = {
            let mut state = self.state();
            let n_before = state.tasks.len();
            state.tasks.retain(|t| t.id() != task_id);
            state.tasks.len() != n_before
        };
        if removed == false {
            return Err(SyncError::UnknownTask(task_id.clone()));
        }

        let mut progress = self.progress();
        progress.debug(&format!("Completing task {}", task_id));
        progress.feedback(WidgetEvent::Completing{ task: task_id.clone() });

        let result = self.mark_completed(task_id).await;
        if let Err(err) = &result {
            progress.error(&format!("Unable to complete task {}: {}", task_id, err));
        }

        self.refresh(&mut progress).await;
        progress.finish();
        result
    }

    async fn mark_completed(&self, task_id: &TaskId) -> Result<(), SyncError> {
        let task_list = self.first_task_list().await?;
        self.task_store.patch_task_status(task_list.id(), task_id, TaskStatus::Completed).await
            .map_err(SyncError::Remote)?;
        Ok(())
    }

    /// Load the tasks every time the session becomes signed in (and right away if it already is).
    ///
    /// The synchronizer holds the session, so this never returns: spawn it alongside the UI, and abort it when the
    /// widget goes away.
    pub async fn follow_session(&self) {
        let mut receiver = self.session.subscribe();
        let mut was_signed_in = false;

        loop {
            let signed_in = receiver.borrow_and_update().is_signed_in();
            if signed_in && was_signed_in == false {
                self.load().await;
            }
            was_signed_in = signed_in;

            if receiver.changed().await.is_err() {
                log::debug!("The session is gone, not following it anymore");
                break;
            }
        }
    }
}
