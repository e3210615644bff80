//! Collaborator traits consumed by the profile domain and their adapters

pub mod image_transform;
pub mod navigation;
pub mod profile_store;
pub mod session;

use std::fmt;
use std::sync::Arc;

pub use image_transform::{ImageCrateTransform, ImageTransform};
pub use navigation::{LogNavigator, Navigator};
pub use profile_store::{ProfileApiAdapter, ProfileStore};
pub use session::{SessionApiAdapter, SessionService};

/// The full set of collaborators a `ProfileEditor` talks to
#[derive(Clone)]
pub struct EditorServices {
    pub session: Arc<dyn SessionService>,
    pub profiles: Arc<dyn ProfileStore>,
    pub images: Arc<dyn ImageTransform>,
    pub navigator: Arc<dyn Navigator>,
}

impl EditorServices {
    pub fn new(
        session: Arc<dyn SessionService>,
        profiles: Arc<dyn ProfileStore>,
        images: Arc<dyn ImageTransform>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            profiles,
            images,
            navigator,
        }
    }
}

impl fmt::Debug for EditorServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorServices")
            .field("session", &"dyn SessionService")
            .field("profiles", &"dyn ProfileStore")
            .field("images", &"dyn ImageTransform")
            .field("navigator", &"dyn Navigator")
            .finish()
    }
}
