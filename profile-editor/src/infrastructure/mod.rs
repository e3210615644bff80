//! Infrastructure module containing collaborator adapters and shared plumbing
//!
//! Domains depend on the service traits in [`services`]; concrete HTTP and
//! image adapters live alongside them, and [`testing`] provides in-memory
//! stand-ins used by tests and the binary's stub mode.

pub mod api_client;
pub mod preview;
pub mod services;
pub mod testing;

// Re-export commonly used items
pub use api_client::{ApiClient, ApiStatusError};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use services::EditorServices;
