//! Staged avatar previews.
//!
//! [`AvatarCandidateSet`] keeps candidates in insertion order with at most
//! one selected. The selected id is always a member of the set: removing
//! the selected candidate promotes the first remaining one, or clears the
//! selection when nothing is left. Each candidate owns its
//! [`PreviewHandle`], so whatever drops a candidate also releases its
//! preview.

use bytes::Bytes;
use profile_model::{CandidateId, PreviewUrl};

use crate::infrastructure::preview::PreviewHandle;

#[derive(Debug)]
pub struct AvatarCandidate {
    id: CandidateId,
    file_name: String,
    bytes: Bytes,
    preview: PreviewHandle,
}

impl AvatarCandidate {
    pub fn new(
        file_name: impl Into<String>,
        bytes: Bytes,
        preview: PreviewHandle,
    ) -> Self {
        Self {
            id: CandidateId::new(),
            file_name: file_name.into(),
            bytes,
            preview,
        }
    }

    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Compressed image data, cheap to clone
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn preview_url(&self) -> &PreviewUrl {
        self.preview.url()
    }
}

#[derive(Debug, Default)]
pub struct AvatarCandidateSet {
    entries: Vec<AvatarCandidate>,
    selected: Option<CandidateId>,
}

impl AvatarCandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `candidate` and make it the selection
    pub fn push_selected(&mut self, candidate: AvatarCandidate) -> CandidateId {
        let id = candidate.id();
        self.entries.push(candidate);
        self.selected = Some(id);
        self.debug_check();
        id
    }

    /// Remove and return the candidate with `id`
    ///
    /// The caller decides when the returned candidate (and its preview)
    /// goes away; dropping it releases the preview.
    pub fn remove(&mut self, id: CandidateId) -> Option<AvatarCandidate> {
        let index = self.entries.iter().position(|c| c.id() == id)?;
        let removed = self.entries.remove(index);

        if self.selected == Some(id) {
            self.selected = self.entries.first().map(AvatarCandidate::id);
        }

        self.debug_check();
        Some(removed)
    }

    /// Select an existing candidate; unknown ids leave the set untouched
    pub fn select(&mut self, id: CandidateId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn selected(&self) -> Option<&AvatarCandidate> {
        let id = self.selected?;
        self.get(id)
    }

    pub fn selected_id(&self) -> Option<CandidateId> {
        self.selected
    }

    pub fn is_selected(&self, id: CandidateId) -> bool {
        self.selected == Some(id)
    }

    pub fn get(&self, id: CandidateId) -> Option<&AvatarCandidate> {
        self.entries.iter().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: CandidateId) -> bool {
        self.get(id).is_some()
    }

    /// Candidate at `index` in insertion order
    pub fn nth(&self, index: usize) -> Option<&AvatarCandidate> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AvatarCandidate> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<CandidateId> {
        self.entries.iter().map(AvatarCandidate::id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every candidate, releasing all previews
    pub fn clear(&mut self) -> usize {
        let released = self.entries.len();
        self.selected = None;
        self.entries.clear();
        released
    }

    fn debug_check(&self) {
        debug_assert!(
            self.selected.is_none_or(|id| self.contains(id)),
            "selected candidate must be a member of the set"
        );
    }
}
