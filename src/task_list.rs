//! Task lists, i.e. the containers of tasks in the remote task store

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The opaque identifier of a task list, as assigned by the remote store
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskListId(String);

impl TaskListId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for TaskListId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl From<&str> for TaskListId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
impl Display for TaskListId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named collection of tasks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    id: TaskListId,
    #[serde(default)]
    title: String,
}

impl TaskList {
    pub fn new(id: TaskListId, title: String) -> Self {
        Self { id, title }
    }

    pub fn id(&self) -> &TaskListId { &self.id    }
    pub fn title(&self) -> &str     { &self.title }
}
