//! Session service trait and HTTP implementation

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::StatusCode;

use crate::errors::{AuthError, AuthResult};
use crate::infrastructure::api_client::{ApiClient, ApiStatusError};

pub mod routes {
    pub const LOGOUT: &str = "/auth/logout";
}

/// Session management used by the editor
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionService: Send + Sync {
    /// End the current session
    async fn sign_out(&self) -> AuthResult<()>;
}

#[derive(Debug, Clone)]
pub struct SessionApiAdapter {
    client: Arc<ApiClient>,
}

impl SessionApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionService for SessionApiAdapter {
    async fn sign_out(&self) -> AuthResult<()> {
        if self.client.get_token().await.is_none() {
            return Err(AuthError::NotAuthenticated);
        }

        let result = self.client.post_no_content(routes::LOGOUT).await;
        // The local token is dropped whatever the server says.
        self.client.set_token(None).await;

        match result {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(err) => {
                warn!("Server-side sign-out failed: {err:#}");
                Err(map_auth_error(err))
            }
        }
    }
}

fn map_auth_error(err: anyhow::Error) -> AuthError {
    match err.downcast_ref::<ApiStatusError>() {
        Some(status) if status.status == StatusCode::UNAUTHORIZED => {
            AuthError::NotAuthenticated
        }
        Some(status) => AuthError::Internal(status.to_string()),
        None => AuthError::Network(format!("{err:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_out_without_token_is_not_authenticated() {
        let client = Arc::new(ApiClient::new("http://localhost:9").unwrap());
        let session = SessionApiAdapter::new(client);

        assert_eq!(session.sign_out().await, Err(AuthError::NotAuthenticated));
    }

    #[test]
    fn unauthorized_status_maps_to_not_authenticated() {
        let err: anyhow::Error = ApiStatusError {
            status: StatusCode::UNAUTHORIZED,
            message: "expired".into(),
        }
        .into();

        assert_eq!(map_auth_error(err), AuthError::NotAuthenticated);
        assert!(matches!(
            map_auth_error(anyhow::anyhow!("connection refused")),
            AuthError::Network(_)
        ));
    }
}
