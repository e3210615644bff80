use std::time::Duration;

use log::trace;
use profile_model::{
    CandidateId, Profile, ProfileDraft, ProfileField, TransformOptions,
};

use super::candidates::AvatarCandidateSet;
use super::compression::CompressionTracker;
use super::context::ProfileContext;
use super::messages::{ProfileMessage, SelectedFile};
use super::state::{AvatarDisplay, ProfileEditorState};
use super::update;
use crate::common::messages::{DomainUpdateResult, EditorEvent};
use crate::infrastructure::preview::PreviewRegistry;
use crate::infrastructure::services::EditorServices;
use crate::infrastructure::services::navigation::routes;

/// Tunables for a profile editing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub transform: TransformOptions,
    /// Window after which an avatar compression is cancelled
    pub compress_timeout: Duration,
    /// Where to send the user after signing out
    pub login_path: String,
}

impl EditorSettings {
    pub const DEFAULT_COMPRESS_TIMEOUT: Duration = Duration::from_millis(1500);
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            transform: TransformOptions::default(),
            compress_timeout: Self::DEFAULT_COMPRESS_TIMEOUT,
            login_path: routes::LOGIN.to_string(),
        }
    }
}

/// Client-side controller for the profile screen
///
/// All state changes go through [`ProfileEditor::update`]. Operations that
/// need a collaborator return their async work as a task in the
/// [`DomainUpdateResult`]; the follow-up message must be fed back through
/// `update` for the operation to take effect.
#[derive(Debug)]
pub struct ProfileEditor {
    pub(super) context: ProfileContext,
    pub(super) services: EditorServices,
    pub(super) settings: EditorSettings,
    pub(super) previews: PreviewRegistry,
    pub(super) state: ProfileEditorState,
    pub(super) compressions: CompressionTracker,
}

impl ProfileEditor {
    pub fn new(
        context: ProfileContext,
        services: EditorServices,
        settings: EditorSettings,
    ) -> Self {
        let draft = context
            .read()
            .map(|profile| ProfileDraft::from_profile(&profile))
            .unwrap_or_default();

        Self {
            context,
            services,
            settings,
            previews: PreviewRegistry::default(),
            state: ProfileEditorState {
                draft,
                ..ProfileEditorState::default()
            },
            compressions: CompressionTracker::new(),
        }
    }

    /// Use a caller-owned preview registry (e.g. one shared with a renderer)
    pub fn with_previews(mut self, previews: PreviewRegistry) -> Self {
        self.previews = previews;
        self
    }

    /// Apply one message and return the work it spawned
    pub fn update(&mut self, message: ProfileMessage) -> DomainUpdateResult {
        trace!("[ProfileEditor] {}", message.name());
        let shown_before = self.avatar_display();

        let result = match message {
            ProfileMessage::LoadProfile(username) => {
                update::handle_load_profile(self, username)
            }
            ProfileMessage::ProfileLoaded(result) => {
                update::handle_profile_loaded(self, result)
            }
            ProfileMessage::SelectFile(file) => {
                update::handle_select_file(self, file)
            }
            ProfileMessage::CompressionFinished { ticket, result } => {
                update::handle_compression_finished(self, ticket, result)
            }
            ProfileMessage::SelectCandidate(id) => {
                update::handle_select_candidate(self, id)
            }
            ProfileMessage::RemoveCandidate(id) => {
                update::handle_remove_candidate(self, id)
            }
            ProfileMessage::EditField(field, value) => {
                update::handle_edit_field(self, field, value)
            }
            ProfileMessage::Save => update::handle_save(self),
            ProfileMessage::SaveFinished(result) => {
                update::handle_save_finished(self, result)
            }
            ProfileMessage::Logout => update::handle_logout(self),
            ProfileMessage::SignedOut(result) => {
                update::handle_signed_out(self, result)
            }
            ProfileMessage::EndSession => update::handle_end_session(self),
        };

        let shown_after = self.avatar_display();
        if shown_after != shown_before {
            result.add_event(EditorEvent::AvatarChanged(shown_after))
        } else {
            result
        }
    }

    pub fn load_profile(
        &mut self,
        username: impl Into<String>,
    ) -> DomainUpdateResult {
        self.update(ProfileMessage::LoadProfile(username.into()))
    }

    pub fn select_file(
        &mut self,
        file: Option<SelectedFile>,
    ) -> DomainUpdateResult {
        self.update(ProfileMessage::SelectFile(file))
    }

    pub fn remove_candidate(&mut self, id: CandidateId) -> DomainUpdateResult {
        self.update(ProfileMessage::RemoveCandidate(id))
    }

    pub fn select_candidate(&mut self, id: CandidateId) -> DomainUpdateResult {
        self.update(ProfileMessage::SelectCandidate(id))
    }

    pub fn edit_field(
        &mut self,
        field: ProfileField,
        value: impl Into<String>,
    ) -> DomainUpdateResult {
        self.update(ProfileMessage::EditField(field, value.into()))
    }

    pub fn save(&mut self) -> DomainUpdateResult {
        self.update(ProfileMessage::Save)
    }

    pub fn logout(&mut self) -> DomainUpdateResult {
        self.update(ProfileMessage::Logout)
    }

    pub fn end_session(&mut self) -> DomainUpdateResult {
        self.update(ProfileMessage::EndSession)
    }

    pub fn context(&self) -> &ProfileContext {
        &self.context
    }

    /// Canonical profile, as last loaded or committed
    pub fn profile(&self) -> Option<Profile> {
        self.context.read()
    }

    pub fn username(&self) -> Option<String> {
        self.context.username()
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.state.draft
    }

    pub fn candidates(&self) -> &AvatarCandidateSet {
        &self.state.candidates
    }

    /// Selected preview, else the stored avatar, else nothing
    pub fn avatar_display(&self) -> AvatarDisplay {
        if let Some(candidate) = self.state.candidates.selected() {
            return AvatarDisplay::Preview(candidate.preview_url().clone());
        }

        self.context
            .read()
            .and_then(|profile| profile.avatar().map(str::to_string))
            .map(AvatarDisplay::Stored)
            .unwrap_or(AvatarDisplay::Empty)
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn state(&self) -> &ProfileEditorState {
        &self.state
    }

    pub fn is_saving(&self) -> bool {
        self.state.saving
    }

    pub fn is_signing_out(&self) -> bool {
        self.state.signing_out || self.state.sign_out_after_save
    }

    /// Draft fields or a staged avatar that a save would submit
    pub fn has_unsaved_changes(&self) -> bool {
        let Some(profile) = self.context.read() else {
            return false;
        };
        self.state.draft.differs_from(&profile)
            || self.state.candidates.selected().is_some()
    }

    pub fn is_compressing(&self) -> bool {
        self.compressions.pending_count() > 0
    }

    pub fn pending_compressions(&self) -> usize {
        self.compressions.pending_count()
    }

    /// Last failure worth showing to the user
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.state.success_message.as_deref()
    }
}
