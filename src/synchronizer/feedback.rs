//! Utilities to track the progression of the task list operations

use std::fmt::{Display, Error, Formatter};

use crate::task::TaskId;

/// An event that happens during a task list operation
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetEvent {
    /// No operation has started yet
    NotStarted,
    /// Tasks are being fetched from the remote
    Loading,
    /// A task (and its companion event) is being created
    Adding { title: String },
    /// A task is being marked as completed on the remote
    Completing { task: TaskId },
    /// The last operation is finished
    Finished { success: bool },
}

impl Display for WidgetEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            WidgetEvent::NotStarted => write!(f, "Not started"),
            WidgetEvent::Loading => write!(f, "Syncing tasks..."),
            WidgetEvent::Adding{title} => write!(f, "Adding task {}...", title),
            WidgetEvent::Completing{task} => write!(f, "Completing task {}...", task),
            WidgetEvent::Finished{success} => match success {
                true => write!(f, "Done"),
                false => write!(f, "Finished with errors"),
            }
        }
    }
}

impl Default for WidgetEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<WidgetEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<WidgetEvent>;

/// Create a feeback channel, that can be used to retrieve the current progress of the task list operations
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(WidgetEvent::default())
}




/// A structure that tracks the progression and the errors that happen during an operation
pub struct OperationProgress<'a> {
    n_errors: u32,
    feedback_channel: Option<&'a FeedbackSender>,
}
impl<'a> OperationProgress<'a> {
    pub fn new_with_feedback_channel(channel: Option<&'a FeedbackSender>) -> Self {
        Self { n_errors: 0, feedback_channel: channel }
    }

    pub fn is_success(&self) -> bool {
        self.n_errors == 0
    }

    /// Log an error
    pub fn error(&mut self, text: &str) {
        log::error!("{}", text);
        self.n_errors += 1;
    }
    /// Log an info
    pub fn info(&mut self, text: &str) {
        log::info!("{}", text);
    }
    /// Log a debug message
    pub fn debug(&mut self, text: &str) {
        log::debug!("{}", text);
    }
    /// Send an event as a feedback to the listener (if any).
    pub fn feedback(&mut self, event: WidgetEvent) {
        if let Some(sender) = self.feedback_channel {
            sender.send_replace(event);
        }
    }
    /// Tell the listener (if any) that this operation is over
    pub fn finish(&mut self) {
        let success = self.is_success();
        self.feedback(WidgetEvent::Finished{ success });
    }
}
