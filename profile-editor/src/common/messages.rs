use profile_model::Profile;

use crate::common::task::Task;
use crate::domains::profile::{AvatarDisplay, ProfileMessage};

/// Notifications for the host, emitted alongside the follow-up task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The avatar shown to the user now points somewhere else
    AvatarChanged(AvatarDisplay),
    /// A save round-trip finished and this record is now canonical
    ProfileCommitted(Profile),
    /// The profile shown by the editor was (re)loaded
    ProfileLoaded(Option<Profile>),
    /// Sign-out finished and the host was redirected
    SignedOut,
}

/// Result of a profile domain update
#[derive(Debug)]
pub struct DomainUpdateResult {
    /// The task to execute (may produce more messages)
    pub task: Task<ProfileMessage>,
    /// Events to hand to the host immediately
    pub events: Vec<EditorEvent>,
}

impl DomainUpdateResult {
    /// Nothing to do and nothing to report
    pub fn none() -> Self {
        Self::task(Task::none())
    }

    /// Create a result with just a task
    pub fn task(task: Task<ProfileMessage>) -> Self {
        Self {
            task,
            events: Vec::new(),
        }
    }

    /// Add an event to this result
    pub fn add_event(mut self, event: EditorEvent) -> Self {
        self.events.push(event);
        self
    }
}

impl Default for DomainUpdateResult {
    fn default() -> Self {
        Self::none()
    }
}
