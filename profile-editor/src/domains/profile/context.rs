//! Shared handle to the canonical profile record.
//!
//! The context is passed explicitly to whoever needs the profile. Readers get
//! clones; the only writes are whole-record replacements, made after a load
//! or a committed save.

use std::sync::Arc;

use parking_lot::RwLock;
use profile_model::Profile;

#[derive(Debug, Clone, Default)]
pub struct ProfileContext {
    inner: Arc<RwLock<ContextInner>>,
}

#[derive(Debug, Default)]
struct ContextInner {
    profile: Option<Profile>,
    revision: u64,
}

impl ProfileContext {
    pub fn new(profile: Option<Profile>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ContextInner {
                profile,
                revision: 0,
            })),
        }
    }

    /// Snapshot of the canonical profile
    pub fn read(&self) -> Option<Profile> {
        self.inner.read().profile.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.inner
            .read()
            .profile
            .as_ref()
            .map(|profile| profile.username.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.read().profile.is_some()
    }

    /// Replace the canonical record
    pub fn update(&self, profile: Profile) {
        let mut inner = self.inner.write();
        inner.profile = Some(profile);
        inner.revision = inner.revision.wrapping_add(1);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.profile = None;
        inner.revision = inner.revision.wrapping_add(1);
    }

    /// Bumped on every write; lets hosts notice replacements cheaply
    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }
}
