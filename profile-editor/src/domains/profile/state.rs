use profile_model::{PreviewUrl, ProfileDraft};

use super::candidates::AvatarCandidateSet;

/// What the avatar slot currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarDisplay {
    /// A staged candidate's preview
    Preview(PreviewUrl),
    /// The avatar reference stored on the profile
    Stored(String),
    Empty,
}

impl AvatarDisplay {
    /// Source string for an image widget, if anything should be shown
    pub fn as_src(&self) -> Option<&str> {
        match self {
            AvatarDisplay::Preview(url) => Some(url.as_str()),
            AvatarDisplay::Stored(url) => Some(url.as_str()),
            AvatarDisplay::Empty => None,
        }
    }

    pub fn is_preview(&self) -> bool {
        matches!(self, AvatarDisplay::Preview(_))
    }
}

/// Profile editor view state
#[derive(Debug, Default)]
pub struct ProfileEditorState {
    pub draft: ProfileDraft,
    pub candidates: AvatarCandidateSet,
    pub saving: bool,
    pub signing_out: bool,
    /// Sign-out requested while a save was in flight
    pub sign_out_after_save: bool,
    pub error: Option<String>,
    pub success_message: Option<String>,
}

impl ProfileEditorState {
    pub fn clear_notices(&mut self) {
        self.error = None;
        self.success_message = None;
    }
}
