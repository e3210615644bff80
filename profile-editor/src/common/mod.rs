pub mod messages;
pub mod task;

pub use messages::{DomainUpdateResult, EditorEvent};
pub use task::Task;
