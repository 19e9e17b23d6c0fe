/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::album::{AlbumSpec, create_album};
use crate::api::{API_ORIGIN, ApiClient, LOGIN_ENDPOINT};
use crate::credential::{Credential, acquire_credential};
use crate::errors::{ErrorResponse, GifyuError};
use crate::forms::{DEFAULT_USER_AGENT, login_form};
use crate::image::{BatchResult, ImageInput, UploadInput, upload_many, upload_one};
use crate::parsers::{MarkerTokenExtractor, TokenExtractor, image_id_from_upload, session_cookie};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_CONCURRENT_UPLOADS: usize = 8;

/// Result of [`GifyuClient::gifyu`].
///
/// Serializes to the same JSON shapes the site's own upload page works with, so it can be
/// handed on as-is.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Outcome {
    Image(Value),
    ImageWithAlbum {
        data: Value,
        #[serde(rename = "dataAlbum")]
        data_album: Value,
    },
    Batch(BatchResult),
    BatchWithAlbum {
        data: BatchResult,
        #[serde(rename = "dataAlbum")]
        data_album: Value,
    },
    Failed(ErrorResponse),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn error(&self) -> Option<&ErrorResponse> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Album creation response, when an album was requested
    pub fn album(&self) -> Option<&Value> {
        match self {
            Outcome::ImageWithAlbum { data_album, .. }
            | Outcome::BatchWithAlbum { data_album, .. } => Some(data_album),
            _ => None,
        }
    }
}

/// Client for the Gifyu upload flow.
///
/// Holds no session state: every call to [`GifyuClient::gifyu`] acquires a fresh
/// [`Credential`]. The lower level operations take a credential explicitly so a caller can
/// reuse one across several calls.
#[derive(Debug, Clone)]
pub struct GifyuClient {
    api_client: Arc<ApiClient>,
    token_extractor: Arc<dyn TokenExtractor>,
    max_concurrent_uploads: usize,
    detailed_batch_errors: bool,
}

impl GifyuClient {
    /// Client with a custom base URL and defaults for everything else
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, GifyuError> {
        GifyuClientBuilder::new().base_url(base_url)?.build()
    }

    pub fn builder() -> GifyuClientBuilder {
        GifyuClientBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        self.api_client.base_url()
    }

    pub fn max_concurrent_uploads(&self) -> usize {
        self.max_concurrent_uploads
    }

    /// Fetches the landing page and extracts a fresh token and session cookie
    pub async fn acquire_credential(&self) -> Result<Credential, GifyuError> {
        acquire_credential(&self.api_client, self.token_extractor.as_ref()).await
    }

    /// Uploads a single image
    pub async fn upload_one(
        &self,
        credential: &Credential,
        input: &ImageInput,
    ) -> Result<Value, GifyuError> {
        upload_one(&self.api_client, credential, input).await
    }

    /// Uploads several images concurrently, never failing as a whole
    pub async fn upload_many(&self, credential: &Credential, inputs: &[ImageInput]) -> BatchResult {
        upload_many(
            &self.api_client,
            credential,
            inputs,
            self.max_concurrent_uploads,
            self.detailed_batch_errors,
        )
        .await
    }

    /// Creates an album from already uploaded image identifiers
    pub async fn create_album(
        &self,
        credential: &Credential,
        image_ids: &[String],
        spec: &AlbumSpec,
    ) -> Result<Value, GifyuError> {
        create_album(&self.api_client, credential, image_ids, spec).await
    }

    /// Signs in to an account.
    ///
    /// Returns a credential carrying the session cookie the login response set, or the
    /// original credential when the response set none.
    pub async fn login(
        &self,
        credential: &Credential,
        username: &str,
        password: &str,
    ) -> Result<Credential, GifyuError> {
        let form = login_form(credential, username, password);

        log::info!("Logging in as {username}");
        let resp = self
            .api_client
            .post_form_raw(LOGIN_ENDPOINT, credential.cookie(), form)
            .await?;

        Ok(match session_cookie(resp.headers()) {
            Ok(cookie) => credential.with_cookie(cookie),
            Err(_) => credential.clone(),
        })
    }

    /// Uploads `input` and, if `album` is given, gathers the uploads into a new album.
    ///
    /// Never fails: any error along the way is returned as [`Outcome::Failed`]. A body sent
    /// back by the site is passed through untouched, local failures become a `400`
    /// [`crate::ErrorEnvelope`].
    ///
    /// An album is not created for [`UploadInput::Descriptor`].
    pub async fn gifyu(&self, input: impl Into<UploadInput>, album: Option<AlbumSpec>) -> Outcome {
        match self.run(input.into(), album.as_ref()).await {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("Upload failed: {err}");
                Outcome::Failed(err.into())
            }
        }
    }

    async fn run(
        &self,
        input: UploadInput,
        album: Option<&AlbumSpec>,
    ) -> Result<Outcome, GifyuError> {
        let credential = self.acquire_credential().await?;

        match input {
            UploadInput::Source(source) => {
                let data = self
                    .upload_one(&credential, &ImageInput::new(source))
                    .await?;
                match album {
                    Some(spec) => {
                        let image_ids = vec![image_id_from_upload(&data)?];
                        let data_album = self.create_album(&credential, &image_ids, spec).await?;
                        Ok(Outcome::ImageWithAlbum { data, data_album })
                    }
                    None => Ok(Outcome::Image(data)),
                }
            }
            UploadInput::Sources(sources) => {
                let inputs: Vec<ImageInput> = sources.into_iter().map(ImageInput::new).collect();
                self.run_batch(&credential, &inputs, album).await
            }
            UploadInput::Descriptors(inputs) => self.run_batch(&credential, &inputs, album).await,
            UploadInput::Descriptor(input) => {
                if album.is_some() {
                    log::warn!("Album creation is not supported for a single descriptor input");
                }
                Ok(Outcome::Image(self.upload_one(&credential, &input).await?))
            }
        }
    }

    async fn run_batch(
        &self,
        credential: &Credential,
        inputs: &[ImageInput],
        album: Option<&AlbumSpec>,
    ) -> Result<Outcome, GifyuError> {
        let data = self.upload_many(credential, inputs).await;

        let Some(spec) = album else {
            return Ok(Outcome::Batch(data));
        };

        let image_ids = data
            .success
            .iter()
            .map(image_id_from_upload)
            .collect::<Result<Vec<_>, _>>()?;
        let data_album = self.create_album(credential, &image_ids, spec).await?;
        Ok(Outcome::BatchWithAlbum { data, data_album })
    }
}

/// Uploads with a default [`GifyuClient`] built for this call only
pub async fn gifyu(input: impl Into<UploadInput>, album: Option<AlbumSpec>) -> Outcome {
    match GifyuClient::builder().build() {
        Ok(client) => client.gifyu(input, album).await,
        Err(err) => Outcome::Failed(err.into()),
    }
}

/// Builder for [`GifyuClient`].
#[derive(Debug)]
pub struct GifyuClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
    token_extractor: Option<Arc<dyn TokenExtractor>>,
    max_concurrent_uploads: usize,
    detailed_batch_errors: bool,
}

impl Default for GifyuClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GifyuClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
            http_client: None,
            token_extractor: None,
            max_concurrent_uploads: DEFAULT_MAX_CONCURRENT_UPLOADS,
            detailed_batch_errors: false,
        }
    }

    /// Builder seeded from `GIFYU_BASE_URL`, `GIFYU_USER_AGENT` and
    /// `GIFYU_MAX_CONCURRENT_UPLOADS` when they are set
    pub fn from_env() -> Result<Self, GifyuError> {
        let mut builder = Self::new();
        if let Ok(base_url) = std::env::var("GIFYU_BASE_URL") {
            builder = builder.base_url(base_url)?;
        }
        if let Ok(user_agent) = std::env::var("GIFYU_USER_AGENT") {
            builder = builder.user_agent(user_agent);
        }
        if let Ok(limit) = std::env::var("GIFYU_MAX_CONCURRENT_UPLOADS") {
            let limit = limit.trim().parse::<usize>().map_err(|e| {
                GifyuError::Config(format!("GIFYU_MAX_CONCURRENT_UPLOADS={limit}: {e}"))
            })?;
            builder = builder.max_concurrent_uploads(limit);
        }
        Ok(builder)
    }

    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, GifyuError> {
        self.base_url = Some(Url::parse(base_url.as_ref())?);
        Ok(self)
    }

    /// Overrides the browser user agent sent with every request
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Request timeout. None is set by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured reqwest client. `timeout` is not applied to it.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn token_extractor(mut self, extractor: impl TokenExtractor + 'static) -> Self {
        self.token_extractor = Some(Arc::new(extractor));
        self
    }

    /// Upper bound on simultaneous requests during a batch upload (at least 1)
    pub fn max_concurrent_uploads(mut self, limit: usize) -> Self {
        self.max_concurrent_uploads = limit.max(1);
        self
    }

    /// Keep each failed batch item's own error instead of the generic
    /// `Error uploading file` envelope
    pub fn detailed_batch_errors(mut self, detailed: bool) -> Self {
        self.detailed_batch_errors = detailed;
        self
    }

    pub fn build(self) -> Result<GifyuClient, GifyuError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(API_ORIGIN)?,
        };
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let https_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder().user_agent(user_agent.as_str());
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(GifyuClient {
            api_client: Arc::new(ApiClient::new(https_client, base_url, user_agent)),
            token_extractor: self
                .token_extractor
                .unwrap_or_else(|| Arc::new(MarkerTokenExtractor::default())),
            max_concurrent_uploads: self.max_concurrent_uploads,
            detailed_batch_errors: self.detailed_batch_errors,
        })
    }
}
