//! Profile editor library
//!
//! This crate contains the headless profile editing controller used by the
//! executable in `src/main.rs`. The controller owns the editing view state
//! (draft fields, staged avatar previews, save/sign-out progress) and
//! delegates everything else to collaborators: a session service, a profile
//! store, an image transform and a navigator.
//!
//! Notes
//! - Every user action and async completion is a
//!   [`ProfileMessage`](domains::profile::ProfileMessage); state only changes
//!   inside `ProfileEditor::update`.
//! - [`EditorRuntime`](app::runtime::EditorRuntime) drives the message loop
//!   on tokio for hosts that do not bring their own.

pub mod app;
pub mod common;
pub mod domains;
pub mod errors;
pub mod infrastructure;

pub use app::bootstrap::AppConfig;
pub use app::runtime::EditorRuntime;
pub use domains::profile::{
    AvatarCandidate, AvatarCandidateSet, AvatarDisplay, EditorSettings,
    ProfileContext, ProfileEditor, ProfileMessage, SelectedFile,
};
pub use errors::{AuthError, StoreError, TransformError};
