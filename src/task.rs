//! To-do tasks, as stored in the remote task store

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::priority::{self, Priority, PriorityColor};

/// The opaque, stable identifier of a task, as assigned by the remote store
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a random TaskId.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The completion status of a task.
/// These are the only two values of the `status` field of the remote schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    NeedsAction,
    Completed,
}
impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}
impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::NeedsAction
    }
}

/// A to-do task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// The task ID, assigned by the remote store
    id: TaskId,

    /// The display name of the task
    #[serde(default)]
    title: String,

    /// When this task is due. `None` means "undated"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due: Option<DateTime<Utc>>,

    /// Free text. Tasks created by this crate carry their priority there
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,

    #[serde(default)]
    status: TaskStatus,
}

impl Task {
    /// Create a Task instance, e.g. from what a store has returned
    pub fn new_with_parameters(id: TaskId, title: String, due: Option<DateTime<Utc>>,
                               notes: Option<String>, status: TaskStatus) -> Self
    {
        Self { id, title, due, notes, status }
    }

    /// Build the task a store creates from an insert request
    pub fn from_new_task(id: TaskId, new_task: &NewTask) -> Self {
        Self::new_with_parameters(
            id,
            new_task.title.clone(),
            Some(new_task.due),
            Some(new_task.notes.clone()),
            new_task.status,
        )
    }

    pub fn id(&self) -> &TaskId              { &self.id             }
    pub fn title(&self) -> &str              { &self.title          }
    pub fn due(&self) -> Option<&DateTime<Utc>> { self.due.as_ref() }
    pub fn notes(&self) -> Option<&str>      { self.notes.as_deref() }
    pub fn status(&self) -> TaskStatus       { self.status          }
    pub fn completed(&self) -> bool          { self.status.is_completed() }

    pub fn set_status(&mut self, new_status: TaskStatus) {
        self.status = new_status;
    }

    /// The priority tag to display, if the notes carry a priority marker. See [`priority::decode_tag`]
    pub fn priority_tag(&self) -> Option<&str> {
        self.notes().and_then(priority::decode_tag)
    }

    /// The priority of this task, if its notes carry a well-formed one
    pub fn priority(&self) -> Option<Priority> {
        self.notes().and_then(Priority::from_notes)
    }

    pub fn priority_color(&self) -> PriorityColor {
        PriorityColor::for_notes(self.notes())
    }
}

/// Compare tasks by due date. Undated tasks come after every dated task, and are equal to each other.
pub fn compare_due_dates(left: &Task, right: &Task) -> Ordering {
    match (left.due(), right.due()) {
        (Some(l), Some(r)) => l.cmp(r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort tasks by ascending due date, undated tasks last.
///
/// The sort is stable, so tasks with equal due dates (and undated tasks) keep the order the store returned them in.
pub fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by(compare_due_dates);
}

/// The payload sent to a task store to create a task
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub due: DateTime<Utc>,
    pub notes: String,
    pub status: TaskStatus,
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: &str, due: Option<(i32, u32, u32)>) -> Task {
        let due = due.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap());
        Task::new_with_parameters(TaskId::from(id), id.to_string(), due, None, TaskStatus::NeedsAction)
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id().as_str()).collect()
    }

    #[test]
    fn test_sort_by_due_date() {
        let mut tasks = vec![
            task("undated-1", None),
            task("june", Some((2024, 6, 1))),
            task("undated-2", None),
            task("january", Some((2024, 1, 15))),
            task("march", Some((2024, 3, 2))),
            task("undated-3", None),
        ];
        sort_by_due_date(&mut tasks);
        assert_eq!(ids(&tasks), vec!["january", "march", "june", "undated-1", "undated-2", "undated-3"]);
    }

    #[test]
    fn test_sort_keeps_ties_in_store_order() {
        let mut tasks = vec![
            task("b", Some((2024, 6, 1))),
            task("a", Some((2024, 6, 1))),
            task("c", Some((2024, 5, 1))),
        ];
        sort_by_due_date(&mut tasks);
        assert_eq!(ids(&tasks), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_deserialize_remote_task() {
        let json = r#"{
            "kind": "tasks#task",
            "id": "MTIzNDU2",
            "etag": "\"LTE0\"",
            "title": "Report",
            "updated": "2024-05-30T08:12:45.000Z",
            "position": "00000000000000000000",
            "notes": "Priority: High",
            "status": "needsAction",
            "due": "2024-06-01T00:00:00.000Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id().as_str(), "MTIzNDU2");
        assert_eq!(task.title(), "Report");
        assert_eq!(task.due(), Some(&Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
        assert_eq!(task.status(), TaskStatus::NeedsAction);
        assert_eq!(task.priority(), Some(Priority::High));
        assert_eq!(task.priority_tag(), Some("High"));
        assert_eq!(task.priority_color(), PriorityColor::Red);
    }

    #[test]
    fn test_deserialize_minimal_task() {
        let task: Task = serde_json::from_str(r#"{"id": "x", "title": "Undated"}"#).unwrap();
        assert_eq!(task.due(), None);
        assert_eq!(task.notes(), None);
        assert_eq!(task.priority_tag(), None);
        assert_eq!(task.completed(), false);
    }

    #[test]
    fn test_serialize_new_task() {
        let new_task = NewTask {
            title: "Report".to_string(),
            due: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            notes: "Priority: High".to_string(),
            status: TaskStatus::NeedsAction,
        };
        let value = serde_json::to_value(&new_task).unwrap();
        assert_eq!(value["title"], "Report");
        assert_eq!(value["due"], "2024-06-01T00:00:00Z");
        assert_eq!(value["notes"], "Priority: High");
        assert_eq!(value["status"], "needsAction");
    }
}
