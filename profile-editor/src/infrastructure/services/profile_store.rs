//! Profile persistence trait and HTTP implementation

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};
use profile_model::{ImageFormat, Profile};
use reqwest::StatusCode;

use crate::errors::{StoreError, StoreResult};
use crate::infrastructure::api_client::{ApiClient, ApiStatusError};

pub mod routes {
    pub const PROFILE_ITEM: &str = "/profiles/{username}";
    pub const PROFILE_AVATAR: &str = "/profiles/{username}/avatar";

    pub fn replace_username(template: &str, username: &str) -> String {
        template.replace("{username}", &urlencode(username))
    }

    fn urlencode(raw: &str) -> String {
        url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
    }
}

/// Read/write access to profile records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile for `username`, `None` when it does not exist
    async fn get(&self, username: &str) -> StoreResult<Option<Profile>>;

    /// Persist `profile`, uploading `avatar` as the new avatar image if given
    async fn update(
        &self,
        profile: Profile,
        avatar: Option<Bytes>,
    ) -> StoreResult<()>;
}

#[derive(Debug, Clone)]
pub struct ProfileApiAdapter {
    client: Arc<ApiClient>,
}

impl ProfileApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileStore for ProfileApiAdapter {
    async fn get(&self, username: &str) -> StoreResult<Option<Profile>> {
        let path = routes::replace_username(routes::PROFILE_ITEM, username);
        match self.client.get::<Profile>(&path).await {
            Ok(profile) => Ok(Some(profile)),
            Err(err) => match map_store_error(err, username) {
                StoreError::NotFound { .. } => Ok(None),
                other => Err(other),
            },
        }
    }

    async fn update(
        &self,
        profile: Profile,
        avatar: Option<Bytes>,
    ) -> StoreResult<()> {
        let username = profile.username.clone();

        if let Some(avatar) = avatar {
            let format = sniff_format(&avatar).unwrap_or_default();
            debug!(
                "Uploading {} byte avatar for {} as {}",
                avatar.len(),
                username,
                format
            );
            let path =
                routes::replace_username(routes::PROFILE_AVATAR, &username);
            self.client
                .put_bytes(&path, avatar, format.mime_type())
                .await
                .map_err(|err| map_store_error(err, &username))?;
        }

        let path = routes::replace_username(routes::PROFILE_ITEM, &username);
        self.client
            .put_no_content(&path, &profile)
            .await
            .map_err(|err| map_store_error(err, &username))?;

        info!("Profile for {} updated", username);
        Ok(())
    }
}

/// Detect the encoding of compressed avatar bytes from their magic number
pub fn sniff_format(data: &[u8]) -> Option<ImageFormat> {
    if data.len() < 12 {
        return None;
    }

    match &data[0..4] {
        [0xFF, 0xD8, 0xFF, _] => Some(ImageFormat::Jpeg),
        [0x89, 0x50, 0x4E, 0x47] => Some(ImageFormat::Png),
        [0x52, 0x49, 0x46, 0x46] if &data[8..12] == b"WEBP" => {
            Some(ImageFormat::Webp)
        }
        _ => None,
    }
}

fn map_store_error(err: anyhow::Error, username: &str) -> StoreError {
    match err.downcast_ref::<ApiStatusError>() {
        Some(status) => match status.status {
            StatusCode::NOT_FOUND => StoreError::NotFound {
                username: username.to_string(),
            },
            StatusCode::UNAUTHORIZED => StoreError::NotAuthenticated,
            code => StoreError::Rejected {
                status: code.as_u16(),
                message: status.message.clone(),
            },
        },
        None => StoreError::Network(format!("{err:#}")),
    }
}
