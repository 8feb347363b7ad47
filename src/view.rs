//! What the task list widget displays

use chrono::NaiveDate;

use crate::priority::PriorityColor;
use crate::task::{Task, TaskId};

/// The state of the task list widget, ready to be rendered
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetView {
    /// The account is not signed in
    SignedOut,
    /// Tasks are being fetched and there is nothing to show yet
    Syncing,
    /// There is no task to show (either the account has no task list, or its first list has no undone task)
    Empty,
    Tasks(Vec<TaskRow>),
}

impl WidgetView {
    /// The text to display in place of the task list, if any
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            WidgetView::SignedOut => Some("Sign in to view and manage your tasks"),
            WidgetView::Syncing => Some("Syncing tasks..."),
            WidgetView::Empty => Some("No tasks for now."),
            WidgetView::Tasks(_) => None,
        }
    }

    pub fn rows(&self) -> &[TaskRow] {
        match self {
            WidgetView::Tasks(rows) => rows,
            _ => &[],
        }
    }
}

/// A task, as displayed in the list
#[derive(Clone, Debug, PartialEq)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    /// The day the task is due
    pub due_date: Option<NaiveDate>,
    /// The text of the priority badge. There is no badge when the notes carry no priority marker
    pub priority_tag: Option<String>,
    pub color: PriorityColor,
}

impl TaskRow {
    /// The color of the priority bar, as a CSS hex string
    pub fn css_color(&self) -> String {
        self.color.color().to_hex_string()
    }
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().clone(),
            title: task.title().to_string(),
            due_date: task.due().map(|due| due.date_naive()),
            priority_tag: task.priority_tag().map(String::from),
            color: task.priority_color(),
        }
    }
}
