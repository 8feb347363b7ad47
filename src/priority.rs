//! Task priorities
//!
//! The remote task store has no priority field. A priority is stored as a `Priority: <value>` marker inside the
//! free-text notes of a task, and is recovered by substring search.
//! This module is the only place that knows about this encoding.
//!
//! Note that this is lossy: any remote edit of the notes that does not keep the exact marker loses the priority.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use csscolorparser::Color;
use serde::{Deserialize, Serialize};

/// The marker that precedes the priority value in the notes of a task
pub const PRIORITY_MARKER: &str = "Priority: ";

/// How urgent a task is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// The notes a task is created with to carry this priority
    pub fn encode(&self) -> String {
        format!("{}{}", PRIORITY_MARKER, self)
    }

    /// Recover the priority from the notes of a task.
    ///
    /// This reads the first word of the [`decode_tag`] text, so `"Priority: Low extra text"` is `Low`.
    pub fn from_notes(notes: &str) -> Option<Self> {
        decode_tag(notes)?
            .split_whitespace()
            .next()?
            .parse()
            .ok()
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Priority::High),
            "Medium" => Ok(Priority::Medium),
            "Low" => Ok(Priority::Low),
            other => Err(format!("Unknown priority {:?}", other)),
        }
    }
}

/// The tag displayed next to a task: the text between the first priority marker and the next one (or the end of the notes).
///
/// This is a plain substring split. Notes such as `"Priority: Low extra text"` give `"Low extra text"`,
/// and anything written after the marker ends up in the tag.
pub fn decode_tag(notes: &str) -> Option<&str> {
    notes.split(PRIORITY_MARKER).nth(1)
}

/// The color a task is displayed with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorityColor {
    Red,
    Amber,
    Blue,
}

impl PriorityColor {
    /// `High` is red, `Medium` is amber, and anything else (`Low`, no marker, garbled marker) is blue.
    pub fn for_notes(notes: Option<&str>) -> Self {
        let notes = notes.unwrap_or_default();
        if notes.contains(&Priority::High.encode()) {
            PriorityColor::Red
        } else if notes.contains(&Priority::Medium.encode()) {
            PriorityColor::Amber
        } else {
            PriorityColor::Blue
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            PriorityColor::Red => "#ef4444",
            PriorityColor::Amber => "#f59e0b",
            PriorityColor::Blue => "#3b82f6",
        }
    }

    pub fn color(&self) -> Color {
        self.hex()
            .parse()
            .unwrap_or_else(|_| Color::new(0.0, 0.0, 0.0, 1.0))
    }
}

impl From<Priority> for PriorityColor {
    fn from(priority: Priority) -> Self {
        PriorityColor::for_notes(Some(&priority.encode()))
    }
}
