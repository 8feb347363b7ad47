//! Calendar events
//!
//! This crate only ever creates one kind of event: the all-day companion of a newly created task.
//! Companion events are never read back, and nothing links them to their task once they are created.

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::draft::ValidatedDraft;

/// The identifier a calendar store has assigned to an event
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The date of an all-day event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDate {
    pub date: NaiveDate,
}

/// An all-day calendar event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanionEvent {
    summary: String,
    description: String,
    start: EventDate,
    end: EventDate,
}

impl CompanionEvent {
    /// The event that goes along a task that is being created
    pub fn for_task(draft: &ValidatedDraft) -> Self {
        let prefix = crate::config::companion_event_prefix();
        let day = EventDate { date: draft.due() };
        Self {
            summary: format!("{} {} ({})", prefix, draft.title(), draft.priority()),
            description: format!("Synced task with {} priority.", draft.priority()),
            start: day,
            end: day,
        }
    }

    pub fn summary(&self) -> &str         { &self.summary     }
    pub fn description(&self) -> &str     { &self.description }
    pub fn start_date(&self) -> NaiveDate { self.start.date   }
    pub fn end_date(&self) -> NaiveDate   { self.end.date     }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DraftTask, Priority};

    #[test]
    fn test_companion_event() {
        let draft = DraftTask::with_fields("Report", NaiveDate::from_ymd_opt(2024, 6, 1), Priority::High)
            .validate()
            .unwrap();
        let event = CompanionEvent::for_task(&draft);

        assert_eq!(event.summary(), "[Task] Report (High)");
        assert_eq!(event.description(), "Synced task with High priority.");
        assert_eq!(event.start_date(), event.end_date());

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["start"]["date"], "2024-06-01");
        assert_eq!(value["end"]["date"], "2024-06-01");
        assert_eq!(value["summary"], "[Task] Report (High)");
    }
}
