//! Profile editing domain
//!
//! Holds the draft copy of the editable fields, the staged avatar candidates
//! and the save/sign-out progress, and turns [`ProfileMessage`]s into state
//! changes plus follow-up work for the collaborators.

pub mod candidates;
pub mod compression;
pub mod context;
pub mod editor;
pub mod messages;
pub mod state;
pub mod update;

pub use candidates::{AvatarCandidate, AvatarCandidateSet};
pub use compression::{CompressionTicket, CompressionTracker};
pub use context::ProfileContext;
pub use editor::{EditorSettings, ProfileEditor};
pub use messages::{ProfileMessage, SelectedFile};
pub use state::{AvatarDisplay, ProfileEditorState};
