//! Update handlers for the profile domain
//!
//! One function per [`ProfileMessage`](super::ProfileMessage) variant. The
//! handlers are synchronous; anything that needs a collaborator is returned
//! as a task whose output message comes back through `ProfileEditor::update`.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use log::{debug, error, info, warn};
use profile_model::{
    CandidateId, Profile, ProfileDraft, ProfileField, TransformOptions,
};
use tokio_util::sync::CancellationToken;

use super::candidates::AvatarCandidate;
use super::compression::CompressionTicket;
use super::editor::ProfileEditor;
use super::messages::{ProfileMessage, SelectedFile};
use crate::common::messages::{DomainUpdateResult, EditorEvent};
use crate::common::task::Task;
use crate::errors::{AuthError, StoreError, TransformError};
use crate::infrastructure::services::ImageTransform;

pub const SAVE_SUCCESS_MESSAGE: &str = "Profile updated";

/// Handle mount-time profile fetch
pub fn handle_load_profile(
    editor: &mut ProfileEditor,
    username: String,
) -> DomainUpdateResult {
    info!("Loading profile for {}", username);
    let profiles = Arc::clone(&editor.services.profiles);

    DomainUpdateResult::task(Task::perform(
        async move { profiles.get(&username).await },
        ProfileMessage::ProfileLoaded,
    ))
}

/// Handle profile fetch result
pub fn handle_profile_loaded(
    editor: &mut ProfileEditor,
    result: Result<Option<Profile>, StoreError>,
) -> DomainUpdateResult {
    match result {
        Ok(Some(profile)) => {
            debug!("Loaded profile for {}", profile.username);
            editor.state.draft = ProfileDraft::from_profile(&profile);
            editor.context.update(profile.clone());
            DomainUpdateResult::none()
                .add_event(EditorEvent::ProfileLoaded(Some(profile)))
        }
        Ok(None) => {
            warn!("No profile exists for the current user");
            editor.state.draft = ProfileDraft::default();
            editor.context.clear();
            DomainUpdateResult::none().add_event(EditorEvent::ProfileLoaded(None))
        }
        Err(err) => {
            error!("Failed to load profile: {}", err);
            editor.state.error = Some(err.to_string());
            DomainUpdateResult::none()
        }
    }
}

/// Handle a file picked for the avatar
pub fn handle_select_file(
    editor: &mut ProfileEditor,
    file: Option<SelectedFile>,
) -> DomainUpdateResult {
    let Some(file) = file else {
        return DomainUpdateResult::none();
    };

    let (ticket, token) = editor.compressions.begin(file.name.as_str());
    debug!(
        "Compressing {} ({} bytes) as compression {}",
        file.name,
        file.bytes.len(),
        ticket
    );

    let images = Arc::clone(&editor.services.images);
    let options = editor.settings.transform;
    let limit = editor.settings.compress_timeout;

    DomainUpdateResult::task(Task::perform(
        compress_with_deadline(images, file.bytes, options, token, limit),
        move |result| ProfileMessage::CompressionFinished { ticket, result },
    ))
}

/// Run the transform, cancelling it once `limit` has elapsed
pub async fn compress_with_deadline(
    images: Arc<dyn ImageTransform>,
    source: Bytes,
    options: TransformOptions,
    token: CancellationToken,
    limit: Duration,
) -> Result<Bytes, TransformError> {
    let work = images.compress(source, &options, token.clone());
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => {
            token.cancel();
            Err(TransformError::TimedOut(limit))
        }
    }
}

/// Handle a finished compression
pub fn handle_compression_finished(
    editor: &mut ProfileEditor,
    ticket: CompressionTicket,
    result: Result<Bytes, TransformError>,
) -> DomainUpdateResult {
    let Some(pending) = editor.compressions.finish(ticket) else {
        debug!("Discarding result of stale compression {}", ticket);
        return DomainUpdateResult::none();
    };
    let elapsed = pending.started_at.elapsed();

    match result {
        Ok(bytes) => {
            let preview = editor
                .previews
                .register(bytes.clone(), editor.settings.transform.output_format);
            let candidate = AvatarCandidate::new(pending.file_name, bytes, preview);
            let id = editor.state.candidates.push_selected(candidate);
            debug!("Staged avatar candidate {} after {:?}", id, elapsed);
            editor.state.error = None;
        }
        Err(err) => {
            warn!(
                "Avatar compression failed for {}: {}",
                pending.file_name, err
            );
            editor.state.error =
                Some(format!("Could not process {}: {}", pending.file_name, err));
        }
    }

    DomainUpdateResult::none()
}

/// Handle picking one of the staged candidates
pub fn handle_select_candidate(
    editor: &mut ProfileEditor,
    id: CandidateId,
) -> DomainUpdateResult {
    if !editor.state.candidates.select(id) {
        debug!("Ignoring selection of unknown candidate {}", id);
    }
    DomainUpdateResult::none()
}

/// Handle discarding a staged candidate
pub fn handle_remove_candidate(
    editor: &mut ProfileEditor,
    id: CandidateId,
) -> DomainUpdateResult {
    match editor.state.candidates.remove(id) {
        Some(candidate) => {
            debug!(
                "Removed avatar candidate {} ({})",
                id,
                candidate.preview_url()
            );
            // Dropping the candidate releases its preview.
            drop(candidate);
        }
        None => debug!("Ignoring removal of unknown candidate {}", id),
    }
    DomainUpdateResult::none()
}

/// Handle a form field edit
pub fn handle_edit_field(
    editor: &mut ProfileEditor,
    field: ProfileField,
    value: String,
) -> DomainUpdateResult {
    editor.state.draft.set(field, value);
    editor.state.success_message = None;
    DomainUpdateResult::none()
}

/// Handle submit profile changes
pub fn handle_save(editor: &mut ProfileEditor) -> DomainUpdateResult {
    let Some(canonical) = editor.context.read() else {
        debug!("Save requested before a profile was loaded");
        return DomainUpdateResult::none();
    };

    if editor.state.signing_out || editor.state.sign_out_after_save {
        warn!("Ignoring save requested during sign-out");
        return DomainUpdateResult::none();
    }

    if editor.state.saving {
        debug!("Save already in flight");
        return DomainUpdateResult::none();
    }

    let profile = editor.state.draft.apply_to(&canonical);
    let avatar = editor
        .state
        .candidates
        .selected()
        .map(|candidate| candidate.bytes().clone());

    info!(
        "Saving profile for {} (new avatar: {})",
        profile.username,
        avatar.is_some()
    );

    editor.state.saving = true;
    editor.state.clear_notices();

    let profiles = Arc::clone(&editor.services.profiles);
    DomainUpdateResult::task(Task::perform(
        async move {
            let submitted = profile.clone();
            profiles.update(profile, avatar).await.map(|()| submitted)
        },
        ProfileMessage::SaveFinished,
    ))
}

/// Handle profile change result
pub fn handle_save_finished(
    editor: &mut ProfileEditor,
    result: Result<Profile, StoreError>,
) -> DomainUpdateResult {
    editor.state.saving = false;

    let mut outcome = match result {
        Ok(profile) => {
            info!("Profile updated successfully");
            editor.context.update(profile.clone());
            editor.state.success_message = Some(SAVE_SUCCESS_MESSAGE.to_string());
            DomainUpdateResult::none()
                .add_event(EditorEvent::ProfileCommitted(profile))
        }
        Err(err) => {
            error!("Failed to update profile: {}", err);
            editor.state.error = Some(err.to_string());
            DomainUpdateResult::none()
        }
    };

    if editor.state.sign_out_after_save {
        editor.state.sign_out_after_save = false;
        info!("Save settled, continuing deferred sign-out");
        outcome.task = begin_sign_out(editor);
    }

    outcome
}

/// Handle logout
///
/// A pending save is allowed to finish first; the sign-out is started from
/// `handle_save_finished` in that case.
pub fn handle_logout(editor: &mut ProfileEditor) -> DomainUpdateResult {
    if editor.state.signing_out || editor.state.sign_out_after_save {
        debug!("Sign-out already requested");
        return DomainUpdateResult::none();
    }

    if editor.state.saving {
        info!("Deferring sign-out until the pending save completes");
        editor.state.sign_out_after_save = true;
        return DomainUpdateResult::none();
    }

    DomainUpdateResult::task(begin_sign_out(editor))
}

fn begin_sign_out(editor: &mut ProfileEditor) -> Task<ProfileMessage> {
    editor.state.signing_out = true;
    let session = Arc::clone(&editor.services.session);

    Task::perform(
        async move { session.sign_out().await },
        ProfileMessage::SignedOut,
    )
}

/// Handle sign-out result
pub fn handle_signed_out(
    editor: &mut ProfileEditor,
    result: Result<(), AuthError>,
) -> DomainUpdateResult {
    match result {
        Ok(()) => info!("Signed out"),
        Err(err) => warn!("Sign-out failed, redirecting anyway: {}", err),
    }

    release_session(editor);
    editor.context.clear();
    editor.state.draft = ProfileDraft::default();
    editor.state.signing_out = false;
    editor.services.navigator.go_to(&editor.settings.login_path);

    DomainUpdateResult::none().add_event(EditorEvent::SignedOut)
}

/// Handle teardown of the editing session
pub fn handle_end_session(editor: &mut ProfileEditor) -> DomainUpdateResult {
    release_session(editor);
    DomainUpdateResult::none()
}

fn release_session(editor: &mut ProfileEditor) {
    let cancelled = editor.compressions.cancel_all();
    let released = editor.state.candidates.clear();
    editor.state.clear_notices();
    debug!(
        "Editing session ended: released {} previews, cancelled {} compressions",
        released, cancelled
    );
}
