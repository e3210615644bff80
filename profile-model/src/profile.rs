//! Profile records and the local draft used while editing them.
//!
//! The canonical [`Profile`] belongs to the profile store. Editing happens on
//! a [`ProfileDraft`] that only carries the editable fields; the draft is
//! merged into a copy of the canonical record when a save is committed, so
//! the canonical record is never touched by keystrokes.

use std::fmt;

/// A user's profile as stored by the backend
///
/// `username` is the identity key and is never edited locally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub username: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub full_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub website: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub avatar_url: String,
}

impl Profile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = website.into();
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = avatar_url.into();
        self
    }

    /// Stored avatar reference, if the profile has one
    pub fn avatar(&self) -> Option<&str> {
        if self.avatar_url.is_empty() {
            None
        } else {
            Some(&self.avatar_url)
        }
    }
}

/// Fields the editor allows the user to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProfileField {
    FullName,
    Website,
}

impl ProfileField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProfileField::FullName => "full_name",
            ProfileField::Website => "website",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local, uncommitted copy of the editable profile fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileDraft {
    pub full_name: String,
    pub website: String,
}

impl ProfileDraft {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            website: profile.website.clone(),
        }
    }

    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FullName => &self.full_name,
            ProfileField::Website => &self.website,
        }
    }

    /// Any string is accepted; validation is the backend's concern.
    pub fn set(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::FullName => self.full_name = value,
            ProfileField::Website => self.website = value,
        }
    }

    /// Copy of `base` with the draft fields merged in.
    pub fn apply_to(&self, base: &Profile) -> Profile {
        Profile {
            full_name: self.full_name.clone(),
            website: self.website.clone(),
            ..base.clone()
        }
    }

    pub fn differs_from(&self, base: &Profile) -> bool {
        self.full_name != base.full_name || self.website != base.website
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bob() -> Profile {
        Profile::new("bob@x.com")
            .with_full_name("Bob")
            .with_avatar_url("/a.png")
    }

    #[test]
    fn apply_to_only_touches_editable_fields() {
        let base = bob();
        let mut draft = ProfileDraft::from_profile(&base);
        draft.set(ProfileField::FullName, "Alice".into());

        let merged = draft.apply_to(&base);

        assert_eq!(merged.full_name, "Alice");
        assert_eq!(merged.username, "bob@x.com");
        assert_eq!(merged.website, "");
        assert_eq!(merged.avatar_url, "/a.png");
        // Canonical record is untouched.
        assert_eq!(base.full_name, "Bob");
    }

    #[test]
    fn draft_tracks_divergence() {
        let base = bob();
        let mut draft = ProfileDraft::from_profile(&base);
        assert!(!draft.differs_from(&base));

        draft.set(ProfileField::Website, "https://bob.example".into());
        assert!(draft.differs_from(&base));
        assert_eq!(draft.get(ProfileField::Website), "https://bob.example");
    }

    #[test]
    fn empty_avatar_url_means_no_avatar() {
        assert_eq!(bob().avatar(), Some("/a.png"));
        assert_eq!(Profile::new("x").avatar(), None);
    }
}
