//! Redirect collaborator

use log::info;
use parking_lot::RwLock;

pub mod routes {
    pub const LOGIN: &str = "/login";
}

/// Fire-and-forget navigation requested by the editor
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// Navigator for headless hosts: remembers and logs the requested path
#[derive(Debug, Default)]
pub struct LogNavigator {
    current: RwLock<Option<String>>,
}

impl LogNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.current.read().clone()
    }
}

impl Navigator for LogNavigator {
    fn go_to(&self, path: &str) {
        info!("Navigating to {}", path);
        *self.current.write() = Some(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remembers_last_path() {
        let navigator = LogNavigator::new();
        assert_eq!(navigator.current(), None);

        navigator.go_to(routes::LOGIN);
        assert_eq!(navigator.current().as_deref(), Some("/login"));
    }
}
