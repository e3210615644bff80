pub mod bootstrap;
pub mod runtime;

pub use bootstrap::{AppConfig, runtime_boot};
pub use runtime::EditorRuntime;
