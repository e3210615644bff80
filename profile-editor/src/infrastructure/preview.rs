//! In-memory preview table backing staged avatar candidates.
//!
//! Registering bytes yields a [`PreviewHandle`] that owns exactly one
//! registry entry. The entry lives until the handle is dropped, so a preview
//! is released exactly once no matter which path drops its candidate
//! (explicit removal, session end, or the editor itself going away).

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use log::{trace, warn};
use profile_model::{ImageFormat, PreviewUrl};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct PreviewEntry {
    bytes: Bytes,
    format: ImageFormat,
}

/// Shared table of live previews
#[derive(Clone)]
pub struct PreviewRegistry {
    origin: Arc<str>,
    entries: Arc<DashMap<PreviewUrl, PreviewEntry>>,
}

impl fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewRegistry")
            .field("origin", &self.origin)
            .field("live", &self.entries.len())
            .finish()
    }
}

impl Default for PreviewRegistry {
    fn default() -> Self {
        Self::new("profile-editor")
    }
}

impl PreviewRegistry {
    pub fn new(origin: impl Into<Arc<str>>) -> Self {
        Self {
            origin: origin.into(),
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Stage `bytes` and return the handle owning the new preview
    pub fn register(&self, bytes: Bytes, format: ImageFormat) -> PreviewHandle {
        let url = PreviewUrl::for_id(&self.origin, Uuid::now_v7());
        trace!("Registering preview {} ({} bytes)", url, bytes.len());
        self.entries
            .insert(url.clone(), PreviewEntry { bytes, format });

        PreviewHandle {
            url,
            entries: Arc::clone(&self.entries),
        }
    }

    /// Bytes behind a live preview, if it has not been released
    pub fn resolve(&self, url: &PreviewUrl) -> Option<Bytes> {
        self.entries.get(url).map(|entry| entry.bytes.clone())
    }

    pub fn format_of(&self, url: &PreviewUrl) -> Option<ImageFormat> {
        self.entries.get(url).map(|entry| entry.format)
    }

    pub fn contains(&self, url: &PreviewUrl) -> bool {
        self.entries.contains_key(url)
    }

    /// Number of previews that have not been released yet
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}

/// Owner of one registry entry; dropping it releases the preview
pub struct PreviewHandle {
    url: PreviewUrl,
    entries: Arc<DashMap<PreviewUrl, PreviewEntry>>,
}

impl PreviewHandle {
    pub fn url(&self) -> &PreviewUrl {
        &self.url
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.url).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if self.entries.remove(&self.url).is_some() {
            trace!("Released preview {}", self.url);
        } else {
            warn!("Preview {} was already released", self.url);
        }
    }
}
