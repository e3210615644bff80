use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use log::{info, warn};
use profile_model::{ImageFormat, Profile, TransformOptions};

use crate::app::runtime::EditorRuntime;
use crate::domains::profile::{EditorSettings, ProfileContext, ProfileEditor};
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::services::navigation::routes;
use crate::infrastructure::services::{
    EditorServices, ImageCrateTransform, LogNavigator, ProfileApiAdapter,
    SessionApiAdapter,
};
use crate::infrastructure::testing::StubServices;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_url: Arc<str>,
    pub auth_token: Option<Arc<str>>,
    pub use_test_stubs: bool,
    pub compress_timeout: Duration,
    pub transform: TransformOptions,
    pub login_path: Arc<str>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

impl AppConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: Arc::from(server_url.into()),
            auth_token: None,
            use_test_stubs: false,
            compress_timeout: EditorSettings::DEFAULT_COMPRESS_TIMEOUT,
            transform: TransformOptions::default(),
            login_path: Arc::from(routes::LOGIN),
        }
    }

    /// Read configuration from `PROFILE_EDITOR_*` variables
    ///
    /// Unparseable values are reported and replaced by their defaults.
    pub fn from_environment() -> Self {
        let server_url = std::env::var("PROFILE_EDITOR_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(server_url);

        config.auth_token = std::env::var("PROFILE_EDITOR_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(Arc::from);

        config.use_test_stubs = std::env::var("PROFILE_EDITOR_USE_TEST_STUBS")
            .map(|value| {
                matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes"
                )
            })
            .unwrap_or(false);

        if let Some(timeout) = env_parsed("PROFILE_EDITOR_COMPRESS_TIMEOUT", |raw| {
            humantime::parse_duration(raw).map_err(|e| e.to_string())
        }) {
            config.compress_timeout = timeout;
        }

        let max_dimension = env_parsed("PROFILE_EDITOR_AVATAR_MAX_DIMENSION", |raw| {
            raw.parse::<u32>().map_err(|e| e.to_string())
        })
        .unwrap_or(config.transform.max_dimension);
        let output_format = env_parsed("PROFILE_EDITOR_AVATAR_FORMAT", |raw| {
            ImageFormat::from_str(raw).map_err(|e| e.to_string())
        })
        .unwrap_or(config.transform.output_format);

        match TransformOptions::new(max_dimension, output_format) {
            Ok(options) => {
                config.transform = options.with_jpeg_quality(config.transform.jpeg_quality)
            }
            Err(err) => warn!("Ignoring avatar settings from environment: {}", err),
        }

        if let Ok(path) = std::env::var("PROFILE_EDITOR_LOGIN_PATH")
            && !path.trim().is_empty()
        {
            config.login_path = Arc::from(path);
        }

        config
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn use_test_stubs(&self) -> bool {
        self.use_test_stubs
    }

    pub fn with_test_stubs(mut self, enabled: bool) -> Self {
        self.use_test_stubs = enabled;
        self
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = Arc::from(server_url.into());
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(Arc::from(token.into()));
        self
    }

    pub fn with_compress_timeout(mut self, timeout: Duration) -> Self {
        self.compress_timeout = timeout;
        self
    }

    pub fn with_transform(mut self, transform: TransformOptions) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Arc::from(path.into());
        self
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            transform: self.transform,
            compress_timeout: self.compress_timeout,
            login_path: self.login_path.to_string(),
        }
    }

    /// Collaborators backed by the profile server
    pub async fn api_services(&self) -> anyhow::Result<EditorServices> {
        let client = Arc::new(
            ApiClient::new(self.server_url())
                .context("Failed to configure profile server client")?,
        );
        if let Some(token) = &self.auth_token {
            client.set_token(Some(token.to_string())).await;
        } else {
            warn!("No auth token configured; server requests will be anonymous");
        }

        Ok(EditorServices::new(
            Arc::new(SessionApiAdapter::new(Arc::clone(&client))),
            Arc::new(ProfileApiAdapter::new(client)),
            Arc::new(ImageCrateTransform),
            Arc::new(LogNavigator::new()),
        ))
    }
}

fn env_parsed<T>(
    key: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match parse(raw.trim()) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("Ignoring {}={:?}: {}", key, raw, err);
            None
        }
    }
}

/// In-memory collaborators seeded with a profile for `username`
///
/// Images still go through the real transform so stub runs exercise the
/// `image` pipeline end to end.
pub fn stub_services(username: &str) -> EditorServices {
    let stubs = StubServices::with_profile(
        Profile::new(username).with_full_name("Demo User"),
    );
    EditorServices::new(
        stubs.session.clone(),
        stubs.profiles.clone(),
        Arc::new(ImageCrateTransform),
        stubs.navigator.clone(),
    )
}

/// Build a runtime for `username` and start loading their profile
pub async fn runtime_boot(
    config: &AppConfig,
    username: &str,
) -> anyhow::Result<EditorRuntime> {
    let services = if config.use_test_stubs() {
        info!("Using in-memory test stubs");
        stub_services(username)
    } else {
        info!("Using profile server at {}", config.server_url());
        config.api_services().await?
    };

    let editor = ProfileEditor::new(
        ProfileContext::default(),
        services,
        config.editor_settings(),
    );
    let mut runtime = EditorRuntime::new(editor);
    runtime.load_profile(username);
    Ok(runtime)
}
