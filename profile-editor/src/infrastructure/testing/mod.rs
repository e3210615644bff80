//! In-memory collaborators for tests and the binary's stub mode
//!
//! All stubs can share a [`CallJournal`] so tests can assert on the order in
//! which the editor reached its collaborators (e.g. save before sign-out).

pub mod stubs;

use std::sync::Arc;

use parking_lot::Mutex;
use profile_model::Profile;

pub use stubs::{
    RecordedUpdate, RecordingNavigator, StubOutcome, TestImageTransform,
    TestProfileStore, TestSessionService,
};

use crate::infrastructure::services::EditorServices;

/// Ordered log of collaborator calls
#[derive(Debug, Clone, Default)]
pub struct CallJournal(Arc<Mutex<Vec<String>>>);

impl CallJournal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Index of the first entry equal to `entry`
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.0.lock().iter().position(|e| e == entry)
    }
}

/// A full set of stub collaborators wired to one journal
#[derive(Debug, Clone)]
pub struct StubServices {
    pub session: Arc<TestSessionService>,
    pub profiles: Arc<TestProfileStore>,
    pub images: Arc<TestImageTransform>,
    pub navigator: Arc<RecordingNavigator>,
    pub journal: CallJournal,
}

impl Default for StubServices {
    fn default() -> Self {
        Self::new()
    }
}

impl StubServices {
    pub fn new() -> Self {
        let journal = CallJournal::default();
        Self {
            session: Arc::new(TestSessionService::new(journal.clone())),
            profiles: Arc::new(TestProfileStore::new(journal.clone())),
            images: Arc::new(TestImageTransform::new(journal.clone())),
            navigator: Arc::new(RecordingNavigator::new(journal.clone())),
            journal,
        }
    }

    /// Stubs with `profile` already stored
    pub fn with_profile(profile: Profile) -> Self {
        let stubs = Self::new();
        stubs.profiles.insert(profile);
        stubs
    }

    pub fn services(&self) -> EditorServices {
        EditorServices::new(
            self.session.clone(),
            self.profiles.clone(),
            self.images.clone(),
            self.navigator.clone(),
        )
    }
}
