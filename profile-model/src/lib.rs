//! Core data model definitions shared across the profile editor crates.
#![allow(missing_docs)]

pub mod api;
pub mod error;
pub mod ids;
pub mod image;
pub mod profile;

// Intentionally curated re-exports for downstream consumers.
pub use api::ApiResponse;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{CandidateId, PreviewUrl};
pub use image::{ImageFormat, TransformOptions};
pub use profile::{Profile, ProfileDraft, ProfileField};
