//! An in-memory remote, that behaves as both a task store and a calendar store.
//!
//! This is mostly useful in tests, where a [`MockBehaviour`] can make some remote calls fail.
//! It can also be used to play with the synchronizer without any account (see the `offline` demo).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use crate::event::{CompanionEvent, EventId};
use crate::task::{NewTask, Task, TaskId, TaskStatus};
use crate::task_list::{TaskList, TaskListId};
use crate::traits::{CalendarStore, RemoteError, TaskStore};

/// This stores some behaviour tweaks, that describe how a mocked remote will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    // From the TaskStore trait
    pub list_task_lists_behaviour: (u32, u32),
    pub list_tasks_behaviour: (u32, u32),
    pub insert_task_behaviour: (u32, u32),
    pub patch_task_behaviour: (u32, u32),

    // From the CalendarStore trait
    pub insert_event_behaviour: (u32, u32),

    /// When set, failing patches are still applied, as if only their response had been lost
    pub apply_failed_patches: bool,
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            list_task_lists_behaviour: (0, n_fails),
            list_tasks_behaviour: (0, n_fails),
            insert_task_behaviour: (0, n_fails),
            patch_task_behaviour: (0, n_fails),
            insert_event_behaviour: (0, n_fails),
            apply_failed_patches: false,
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_list_task_lists(&mut self) -> Result<(), RemoteError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_task_lists_behaviour, "list_task_lists")
    }
    pub fn can_list_tasks(&mut self) -> Result<(), RemoteError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_tasks_behaviour, "list_tasks")
    }
    pub fn can_insert_task(&mut self) -> Result<(), RemoteError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.insert_task_behaviour, "insert_task")
    }
    pub fn can_patch_task(&mut self) -> Result<(), RemoteError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.patch_task_behaviour, "patch_task")
    }
    pub fn can_insert_event(&mut self) -> Result<(), RemoteError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.insert_event_behaviour, "insert_event")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), RemoteError> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}


#[derive(Default)]
struct RemoteData {
    task_lists: Vec<TaskList>,
    tasks: HashMap<TaskListId, Vec<Task>>,
    events: Vec<(String, EventId, CompanionEvent)>,

    behaviour: MockBehaviour,
    read_calls: usize,
    write_calls: usize,
    pending_patches: usize,
}

/// A mocked account, shared by all its clones
#[derive(Clone, Default)]
pub struct MockRemote {
    data: Arc<Mutex<RemoteData>>,
    patch_gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, RemoteData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a new (empty) task list
    pub fn add_task_list(&self, title: &str) -> TaskListId {
        let id = TaskListId::from(TaskId::random().as_str());
        let mut data = self.data();
        data.task_lists.push(TaskList::new(id.clone(), title.to_string()));
        data.tasks.insert(id.clone(), Vec::new());
        id
    }

    /// Append a task to a list, as if another client had created it
    pub fn add_task(&self, task_list: &TaskListId, title: &str, due: Option<DateTime<Utc>>, notes: Option<&str>) -> TaskId {
        let id = TaskId::random();
        let task = Task::new_with_parameters(id.clone(), title.to_string(), due, notes.map(String::from), TaskStatus::NeedsAction);
        self.data().tasks.entry(task_list.clone()).or_default().push(task);
        id
    }

    /// Change the status of a task, as if another client had done it
    pub fn set_task_status(&self, task_list: &TaskListId, task: &TaskId, status: TaskStatus) {
        let mut data = self.data();
        if let Some(t) = data.tasks.get_mut(task_list).and_then(|tasks| tasks.iter_mut().find(|t| t.id() == task)) {
            t.set_status(status);
        }
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        self.data().behaviour = behaviour;
    }

    /// Every task of a list, including the completed ones
    pub fn tasks(&self, task_list: &TaskListId) -> Vec<Task> {
        self.data().tasks.get(task_list).cloned().unwrap_or_default()
    }

    pub fn task(&self, task_list: &TaskListId, task: &TaskId) -> Option<Task> {
        self.tasks(task_list).into_iter().find(|t| t.id() == task)
    }

    /// Every event that has been inserted, along with the calendar it has been inserted into
    pub fn events(&self) -> Vec<(String, CompanionEvent)> {
        self.data().events.iter()
            .map(|(calendar, _id, event)| (calendar.clone(), event.clone()))
            .collect()
    }

    /// How many read calls (successful or not) this remote has received
    pub fn read_calls(&self) -> usize {
        self.data().read_calls
    }

    /// How many write calls (successful or not) this remote has received
    pub fn write_calls(&self) -> usize {
        self.data().write_calls
    }

    /// Hold every subsequent status patch until the returned `Notify` is notified (once per held patch)
    pub fn hold_patches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.patch_gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(gate.clone());
        gate
    }

    /// How many status patches are currently held. See [`Self::hold_patches`]
    pub fn pending_patches(&self) -> usize {
        self.data().pending_patches
    }
}

#[async_trait]
impl TaskStore for MockRemote {
    async fn list_task_lists(&self, max_results: u32) -> Result<Vec<TaskList>, RemoteError> {
        let mut data = self.data();
        data.read_calls += 1;
        data.behaviour.can_list_task_lists()?;

        Ok(data.task_lists.iter()
            .take(max_results as usize)
            .cloned()
            .collect())
    }

    async fn list_incomplete_tasks(&self, task_list: &TaskListId, max_results: u32) -> Result<Vec<Task>, RemoteError> {
        let mut data = self.data();
        data.read_calls += 1;
        data.behaviour.can_list_tasks()?;

        let tasks = data.tasks.get(task_list)
            .ok_or_else(|| format!("No task list {}", task_list))?;
        Ok(tasks.iter()
            .filter(|t| t.completed() == false)
            .take(max_results as usize)
            .cloned()
            .collect())
    }

    async fn insert_task(&self, task_list: &TaskListId, task: &NewTask) -> Result<Task, RemoteError> {
        let mut data = self.data();
        data.write_calls += 1;
        data.behaviour.can_insert_task()?;

        let created = Task::from_new_task(TaskId::random(), task);
        let tasks = data.tasks.get_mut(task_list)
            .ok_or_else(|| format!("No task list {}", task_list))?;
        tasks.push(created.clone());
        Ok(created)
    }

    async fn patch_task_status(&self, task_list: &TaskListId, task: &TaskId, status: TaskStatus) -> Result<Task, RemoteError> {
        self.data().write_calls += 1;

        let gate = self.patch_gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone();
        if let Some(gate) = gate {
            self.data().pending_patches += 1;
            gate.notified().await;
            self.data().pending_patches -= 1;
        }

        let mut data = self.data();
        let allowed = data.behaviour.can_patch_task();
        let apply = allowed.is_ok() || data.behaviour.apply_failed_patches;

        let mut patched = None;
        if apply {
            if let Some(t) = data.tasks.get_mut(task_list).and_then(|tasks| tasks.iter_mut().find(|t| t.id() == task)) {
                t.set_status(status);
                patched = Some(t.clone());
            }
        }

        allowed?;
        patched.ok_or_else(|| format!("No task {} in list {}", task, task_list).into())
    }
}

#[async_trait]
impl CalendarStore for MockRemote {
    async fn insert_event(&self, calendar_id: &str, event: &CompanionEvent) -> Result<EventId, RemoteError> {
        let mut data = self.data();
        data.write_calls += 1;
        data.behaviour.can_insert_event()?;

        let id = EventId::from(uuid::Uuid::new_v4().to_hyphenated().to_string());
        data.events.push((calendar_id.to_string(), id.clone(), event.clone()));
        Ok(id)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_list_task_lists().is_ok());
        assert!(ok.can_list_task_lists().is_ok());
        assert!(ok.can_list_task_lists().is_ok());
        assert!(ok.can_patch_task().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_list_task_lists().is_err());
        assert!(now.can_insert_task().is_err());
        assert!(now.can_insert_task().is_err());
        assert!(now.can_list_task_lists().is_err());
        assert!(now.can_list_task_lists().is_ok());
        assert!(now.can_list_task_lists().is_ok());
        assert!(now.can_insert_task().is_ok());

        let mut custom = MockBehaviour{
            list_task_lists_behaviour: (0,1),
            insert_event_behaviour: (1,3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_list_task_lists().is_err());
        assert!(custom.can_list_task_lists().is_ok());
        assert!(custom.can_list_task_lists().is_ok());
        assert!(custom.can_insert_event().is_ok());
        assert!(custom.can_insert_event().is_err());
        assert!(custom.can_insert_event().is_err());
        assert!(custom.can_insert_event().is_err());
        assert!(custom.can_insert_event().is_ok());

        let mut suspended = MockBehaviour::fail_now(1);
        suspended.suspend();
        assert!(suspended.can_patch_task().is_ok());
        suspended.resume();
        assert!(suspended.can_patch_task().is_err());
    }

    #[tokio::test]
    async fn test_list_caps_and_filters() {
        let remote = MockRemote::new();
        let list = remote.add_task_list("Default");
        for i in 0..60 {
            remote.add_task(&list, &format!("task {}", i), None, None);
        }
        let done = remote.add_task(&list, "done", None, None);
        remote.set_task_status(&list, &done, TaskStatus::Completed);

        let tasks = remote.list_incomplete_tasks(&list, 50).await.unwrap();
        assert_eq!(tasks.len(), 50);
        assert!(tasks.iter().all(|t| t.completed() == false));
        assert_eq!(remote.tasks(&list).len(), 61);
        assert_eq!(remote.read_calls(), 1);
        assert_eq!(remote.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_lost_patch_response() {
        let remote = MockRemote::new();
        let list = remote.add_task_list("Default");
        let id = remote.add_task(&list, "Report", None, None);
        remote.set_behaviour(MockBehaviour {
            patch_task_behaviour: (0, 1),
            apply_failed_patches: true,
            ..MockBehaviour::default()
        });

        assert!(remote.patch_task_status(&list, &id, TaskStatus::Completed).await.is_err());
        assert!(remote.task(&list, &id).unwrap().completed());
    }
}
