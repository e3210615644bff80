use std::fmt;

use bytes::Bytes;
use profile_model::{CandidateId, Profile, ProfileField};

use super::compression::CompressionTicket;
use crate::errors::{AuthError, StoreError, TransformError};

/// A user-chosen file, as handed over by the host
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum ProfileMessage {
    // Mount
    LoadProfile(String),
    ProfileLoaded(Result<Option<Profile>, StoreError>),

    // Avatar staging
    SelectFile(Option<SelectedFile>),
    CompressionFinished {
        ticket: CompressionTicket,
        result: Result<Bytes, TransformError>,
    },
    SelectCandidate(CandidateId),
    RemoveCandidate(CandidateId),

    // Form
    EditField(ProfileField, String),
    Save,
    /// Carries the record that was submitted when the save succeeded
    SaveFinished(Result<Profile, StoreError>),

    // Session
    Logout,
    SignedOut(Result<(), AuthError>),
    EndSession,
}

impl ProfileMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadProfile(_) => "Profile::LoadProfile",
            Self::ProfileLoaded(_) => "Profile::ProfileLoaded",
            Self::SelectFile(_) => "Profile::SelectFile",
            Self::CompressionFinished { .. } => "Profile::CompressionFinished",
            Self::SelectCandidate(_) => "Profile::SelectCandidate",
            Self::RemoveCandidate(_) => "Profile::RemoveCandidate",
            Self::EditField(_, _) => "Profile::EditField",
            Self::Save => "Profile::Save",
            Self::SaveFinished(_) => "Profile::SaveFinished",
            Self::Logout => "Profile::Logout",
            Self::SignedOut(_) => "Profile::SignedOut",
            Self::EndSession => "Profile::EndSession",
        }
    }
}
