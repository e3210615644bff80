use std::fmt;

use uuid::Uuid;

/// Strongly typed ID for a staged avatar candidate
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateId(pub Uuid);

impl Default for CandidateId {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateId {
    pub fn new() -> Self {
        CandidateId(Uuid::now_v7())
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to an in-memory preview, shaped like a browser object URL.
///
/// The URL only names the preview; the bytes live in whatever registry
/// issued it and disappear once that registry entry is released.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviewUrl(String);

impl PreviewUrl {
    pub const SCHEME: &'static str = "blob:";

    /// Build the preview URL for `id` under `origin`, e.g.
    /// `blob:profile-editor/0190c6...`.
    pub fn for_id(origin: &str, id: Uuid) -> Self {
        Self(format!("{}{}/{}", Self::SCHEME, origin, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_preview(raw: &str) -> bool {
        raw.starts_with(Self::SCHEME)
    }
}

impl fmt::Display for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PreviewUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_url_carries_scheme_and_origin() {
        let id = Uuid::now_v7();
        let url = PreviewUrl::for_id("profile-editor", id);

        assert!(PreviewUrl::is_preview(url.as_str()));
        assert_eq!(url.as_str(), format!("blob:profile-editor/{id}"));
        assert!(!PreviewUrl::is_preview("/a.png"));
    }

    #[test]
    fn candidate_ids_are_unique() {
        assert_ne!(CandidateId::new(), CandidateId::new());
    }
}
