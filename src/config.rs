//! Support for library configuration options

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use url::Url;

/// Base URL of the Google Tasks API
pub static TASKS_API_URL: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://tasks.googleapis.com/tasks/v1/").unwrap(/* this cannot panic since this is a valid URL */)
});

/// Base URL of the Google Calendar API
pub static CALENDAR_API_URL: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://www.googleapis.com/calendar/v3/").unwrap(/* this cannot panic since this is a valid URL */)
});

/// The prefix of the summary of every companion event (example of a summary: `[Task] Report (High)`).
/// Feel free to override it when initing this library.
pub static COMPANION_EVENT_PREFIX: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("[Task]".to_string())));

/// How many task lists are enumerated when loading tasks
pub const MAX_TASK_LISTS: u32 = 10;

/// How many undone tasks are fetched from the task list
pub const MAX_TASKS: u32 = 50;

/// The calendar that receives the companion events
pub const PRIMARY_CALENDAR: &str = "primary";

/// The environment variable the demos read an OAuth access token from
pub const ACCESS_TOKEN_ENV: &str = "TASKBOARD_ACCESS_TOKEN";

/// Returns the current value of [`COMPANION_EVENT_PREFIX`]
pub fn companion_event_prefix() -> String {
    COMPANION_EVENT_PREFIX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}
