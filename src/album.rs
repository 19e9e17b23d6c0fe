/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{ApiClient, JSON_ENDPOINT};
use crate::credential::Credential;
use crate::errors::GifyuError;
use crate::forms::{DEFAULT_ALBUM_NAME, album_form};
use crate::properties::AlbumPrivacy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Properties that can be used in the creation of an Album
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct AlbumSpec {
    /// Defaults to `My Album`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Defaults to [`AlbumPrivacy::PrivateButLink`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<AlbumPrivacy>,

    /// Only sent when `privacy` is [`AlbumPrivacy::Password`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AlbumSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_privacy(mut self, privacy: AlbumPrivacy) -> Self {
        self.privacy = Some(privacy);
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Album name sent to the site, `My Album` when no title was given
    pub fn name(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_ALBUM_NAME)
    }
}

/// Creates an album holding the given image identifiers and returns the raw response body
pub(crate) async fn create_album(
    api: &ApiClient,
    credential: &Credential,
    image_ids: &[String],
    spec: &AlbumSpec,
) -> Result<Value, GifyuError> {
    let form = album_form(credential, image_ids, spec);

    log::info!("Creating album {}", spec.name());
    api.post_form(JSON_ENDPOINT, credential.cookie(), form)
        .await
}
