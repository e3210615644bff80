//! Tokio driver for the editor's message loop
//!
//! The runtime owns the [`ProfileEditor`], spawns every task future returned
//! by `update` onto a [`JoinSet`] and feeds completions back one at a time.
//! Collaborator calls may run concurrently, but editor state is only touched
//! from the loop.

use log::{debug, error};
use profile_model::{CandidateId, ProfileField};
use tokio::task::JoinSet;

use crate::common::messages::{DomainUpdateResult, EditorEvent};
use crate::domains::profile::{ProfileEditor, ProfileMessage, SelectedFile};

#[derive(Debug)]
pub struct EditorRuntime {
    editor: ProfileEditor,
    in_flight: JoinSet<ProfileMessage>,
    events: Vec<EditorEvent>,
}

impl EditorRuntime {
    pub fn new(editor: ProfileEditor) -> Self {
        Self {
            editor,
            in_flight: JoinSet::new(),
            events: Vec::new(),
        }
    }

    /// Apply `message` and spawn the work it produced
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, message: ProfileMessage) {
        let result = self.editor.update(message);
        self.absorb(result);
    }

    fn absorb(&mut self, result: DomainUpdateResult) {
        let DomainUpdateResult { task, events } = result;
        for future in task.into_futures() {
            self.in_flight.spawn(future);
        }
        self.events.extend(events);
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns `false` once nothing is in flight.
    pub async fn step(&mut self) -> bool {
        match self.in_flight.join_next().await {
            Some(Ok(message)) => {
                debug!("[EditorRuntime] completed {}", message.name());
                self.dispatch(message);
                true
            }
            Some(Err(err)) => {
                error!("[EditorRuntime] editor task failed: {}", err);
                true
            }
            None => false,
        }
    }

    /// Drive completions until no work remains
    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }

    pub fn load_profile(&mut self, username: impl Into<String>) {
        self.dispatch(ProfileMessage::LoadProfile(username.into()));
    }

    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        self.dispatch(ProfileMessage::SelectFile(file));
    }

    pub fn select_candidate(&mut self, id: CandidateId) {
        self.dispatch(ProfileMessage::SelectCandidate(id));
    }

    pub fn remove_candidate(&mut self, id: CandidateId) {
        self.dispatch(ProfileMessage::RemoveCandidate(id));
    }

    pub fn edit_field(&mut self, field: ProfileField, value: impl Into<String>) {
        self.dispatch(ProfileMessage::EditField(field, value.into()));
    }

    pub fn save(&mut self) {
        self.dispatch(ProfileMessage::Save);
    }

    pub fn logout(&mut self) {
        self.dispatch(ProfileMessage::Logout);
    }

    /// Tear down the editing session
    ///
    /// Compressions are cancelled and their results discarded. Saves and
    /// sign-outs already in flight still run to completion, so the editor
    /// never waits on a completion that was thrown away.
    pub fn end_session(&mut self) {
        self.dispatch(ProfileMessage::EndSession);
    }

    pub fn editor(&self) -> &ProfileEditor {
        &self.editor
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn into_editor(self) -> ProfileEditor {
        self.editor
    }
}
