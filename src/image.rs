/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{ApiClient, JSON_ENDPOINT};
use crate::credential::Credential;
use crate::errors::{ErrorEnvelope, ErrorResponse, GifyuError};
use crate::forms::image_upload_form;
use crate::properties::SourceType;
use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An image to upload: a remote URL or a local path, with optional metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ImageInput {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            filename: None,
            description: None,
        }
    }

    /// Sent as the image title
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn source_type(&self) -> SourceType {
        classify_source(&self.source)
    }
}

/// Anything that parses as a URL with a host is fetched remotely, everything else is a path.
///
/// `C:\img.png` parses as a URL with scheme `c` and `file:///tmp/a.png` has an empty host,
/// so both stay local files.
pub fn classify_source(source: &str) -> SourceType {
    match url::Url::parse(source) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => SourceType::Url,
        _ => SourceType::File,
    }
}

/// What the caller wants uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadInput {
    /// One URL or path
    Source(String),
    /// Several URLs or paths, uploaded concurrently
    Sources(Vec<String>),
    /// One image with title/description
    Descriptor(ImageInput),
    /// Several images with title/description, uploaded concurrently
    Descriptors(Vec<ImageInput>),
}

impl From<&str> for UploadInput {
    fn from(value: &str) -> Self {
        UploadInput::Source(value.to_string())
    }
}

impl From<String> for UploadInput {
    fn from(value: String) -> Self {
        UploadInput::Source(value)
    }
}

impl From<Vec<String>> for UploadInput {
    fn from(value: Vec<String>) -> Self {
        UploadInput::Sources(value)
    }
}

impl From<Vec<&str>> for UploadInput {
    fn from(value: Vec<&str>) -> Self {
        UploadInput::Sources(value.into_iter().map(str::to_string).collect())
    }
}

impl From<ImageInput> for UploadInput {
    fn from(value: ImageInput) -> Self {
        UploadInput::Descriptor(value)
    }
}

impl From<Vec<ImageInput>> for UploadInput {
    fn from(value: Vec<ImageInput>) -> Self {
        UploadInput::Descriptors(value)
    }
}

/// Outcome of a batch upload, in completion order rather than input order
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub success: Vec<Value>,
    pub failed: Vec<ErrorResponse>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.success.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Uploads one image and stamps the session cookie into the response's `request` echo
pub(crate) async fn upload_one(
    api: &ApiClient,
    credential: &Credential,
    input: &ImageInput,
) -> Result<Value, GifyuError> {
    let form = image_upload_form(credential, input, input.source_type())?;

    log::info!("Uploading {} ...", input.source);
    let mut body: Value = api
        .post_form(JSON_ENDPOINT, credential.cookie(), form)
        .await?;

    body.get_mut("request")
        .and_then(Value::as_object_mut)
        .ok_or(GifyuError::MissingField("request"))?
        .insert("cookie".into(), Value::String(credential.cookie().into()));

    Ok(body)
}

/// Uploads every input with at most `concurrency` requests in flight.
///
/// Every item settles; failures never cut the batch short. Unless `detailed_errors` is set,
/// each failure is reported as [`ErrorEnvelope::batch_item`].
pub(crate) async fn upload_many(
    api: &ApiClient,
    credential: &Credential,
    inputs: &[ImageInput],
    concurrency: usize,
    detailed_errors: bool,
) -> BatchResult {
    let mut result = BatchResult::default();

    let mut uploads = stream::iter(inputs)
        .map(|input| async move { (input, upload_one(api, credential, input).await) })
        .buffer_unordered(concurrency.max(1));

    while let Some((input, outcome)) = uploads.next().await {
        match outcome {
            Ok(body) => result.success.push(body),
            Err(err) => {
                log::warn!("Failed uploading {}: {err}", input.source);
                result.failed.push(if detailed_errors {
                    ErrorResponse::from(err)
                } else {
                    ErrorResponse::Envelope(ErrorEnvelope::batch_item())
                });
            }
        }
    }

    log::info!(
        "Batch upload finished: {} succeeded, {} failed",
        result.success.len(),
        result.failed.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_classify_as_url() {
        for src in [
            "https://example.com/a.png",
            "http://i.imgur.com/x.gif?raw=1",
            "http://localhost:8080/cat.jpg",
        ] {
            assert_eq!(classify_source(src), SourceType::Url, "{src}");
        }
    }

    #[test]
    fn paths_classify_as_file() {
        for src in [
            "/tmp/a.png",
            "./images/b.jpg",
            "c.gif",
            "C:\\Users\\me\\d.png",
            "file:///tmp/e.png",
            "",
        ] {
            assert_eq!(classify_source(src), SourceType::File, "{src}");
        }
    }

    #[test]
    fn input_conversions() {
        assert_eq!(
            UploadInput::from("a.png"),
            UploadInput::Source("a.png".into())
        );
        assert_eq!(
            UploadInput::from(vec!["a.png", "b.png"]),
            UploadInput::Sources(vec!["a.png".into(), "b.png".into()])
        );
        let desc = ImageInput::new("a.png").with_filename("A");
        assert_eq!(
            UploadInput::from(desc.clone()),
            UploadInput::Descriptor(desc)
        );
    }

    #[test]
    fn descriptor_deserializes_with_optional_fields() {
        let input: ImageInput = serde_json::from_str(r#"{"source": "a.png"}"#).unwrap();
        assert_eq!(input, ImageInput::new("a.png"));
    }
}
