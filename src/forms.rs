/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Multipart payloads for the `/json` and `/login` endpoints.
//!
//! Payloads are kept as an ordered list of fields until they are sent so the exact wire
//! content can be inspected before any network I/O happens.

use crate::album::AlbumSpec;
use crate::credential::Credential;
use crate::errors::GifyuError;
use crate::image::ImageInput;
use crate::properties::{AlbumPrivacy, SourceType};
use chrono::Utc;
use reqwest::Url;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, COOKIE, HeaderMap, HeaderName,
    HeaderValue, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::multipart::{Form, Part};
use std::path::Path;

/// Browser identity the service's upload form expects
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/72.0.3626.119 Safari/537.36";

pub const DEFAULT_ALBUM_NAME: &str = "My Album";

/// A single multipart field value
#[derive(Clone, PartialEq, Eq)]
pub enum FormField {
    Text(String),
    File {
        file_name: String,
        mime_type: String,
        data: Vec<u8>,
    },
}

impl std::fmt::Debug for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormField::Text(v) => f.debug_tuple("Text").field(v).finish(),
            FormField::File {
                file_name,
                mime_type,
                data,
            } => f
                .debug_struct("File")
                .field("file_name", file_name)
                .field("mime_type", mime_type)
                .field("len", &data.len())
                .finish(),
        }
    }
}

/// Ordered multipart fields, converted to a [`Form`] when sent
#[derive(Debug, Default, Clone)]
pub struct FormPayload {
    fields: Vec<(&'static str, FormField)>,
}

impl FormPayload {
    fn text(mut self, name: &'static str, value: impl ToString) -> Self {
        self.fields.push((name, FormField::Text(value.to_string())));
        self
    }

    fn file(mut self, name: &'static str, field: FormField) -> Self {
        self.fields.push((name, field));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FormField)> {
        self.fields.iter().map(|(name, field)| (*name, field))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| *n == name)
    }

    /// First text value for `name`
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.text_values(name).into_iter().next()
    }

    /// Every text value for a repeated field such as `album[ids][]`
    pub fn text_values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| *n == name)
            .filter_map(|(_, field)| match field {
                FormField::Text(v) => Some(v.as_str()),
                FormField::File { .. } => None,
            })
            .collect()
    }

    pub(crate) fn into_multipart(self) -> Result<Form, GifyuError> {
        let mut form = Form::new();
        for (name, field) in self.fields {
            form = match field {
                FormField::Text(value) => form.text(name, value),
                FormField::File {
                    file_name,
                    mime_type,
                    data,
                } => form.part(
                    name,
                    Part::bytes(data).file_name(file_name).mime_str(&mime_type)?,
                ),
            };
        }
        Ok(form)
    }
}

/// Builds the image upload payload.
///
/// For [`SourceType::File`] the path is checked and read here, so a missing file fails
/// before anything is sent.
pub fn image_upload_form(
    credential: &Credential,
    input: &ImageInput,
    source_type: SourceType,
) -> Result<FormPayload, GifyuError> {
    let mut form = FormPayload::default()
        .text("nsfw", 0)
        .text("action", "upload")
        .text("expiration", 0)
        .text("timestamp", Utc::now().timestamp_millis())
        .text("type", source_type.as_str())
        .text("auth_token", credential.auth_token());

    if let Some(filename) = input.filename.as_deref().filter(|v| !v.is_empty()) {
        form = form.text("title", filename);
    }
    if let Some(description) = input.description.as_deref().filter(|v| !v.is_empty()) {
        form = form.text("description", description);
    }

    let form = match source_type {
        SourceType::File => form.file("source", read_source_file(Path::new(&input.source))?),
        SourceType::Url => form.text("source", &input.source),
    };
    Ok(form)
}

fn read_source_file(path: &Path) -> Result<FormField, GifyuError> {
    if !path.exists() {
        return Err(GifyuError::FileNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(GifyuError::NotAFile(path.to_path_buf()));
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".into());
    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = std::fs::read(path)?;

    Ok(FormField::File {
        file_name,
        mime_type,
        data,
    })
}

/// Builds the album creation payload.
///
/// `album[password]` is only present when the privacy is [`AlbumPrivacy::Password`], and is
/// sent empty if no password was supplied.
pub fn album_form(credential: &Credential, image_ids: &[String], spec: &AlbumSpec) -> FormPayload {
    let privacy = spec.privacy.unwrap_or_default();

    let mut form = FormPayload::default()
        .text("auth_token", credential.auth_token())
        .text("action", "create-album")
        .text("type", "images");
    for id in image_ids {
        form = form.text("album[ids][]", id);
    }
    form = form
        .text("album[new]", "true")
        .text("album[name]", spec.name())
        .text("album[description]", spec.description.as_deref().unwrap_or_default())
        .text("album[privacy]", privacy.as_str());

    if privacy == AlbumPrivacy::Password {
        form = form.text("album[password]", spec.password.as_deref().unwrap_or_default());
    }
    form
}

pub fn login_form(credential: &Credential, username: &str, password: &str) -> FormPayload {
    FormPayload::default()
        .text("login-subject", username)
        .text("password", password)
        .text("auth_token", credential.auth_token())
        .text("keep-login", 1)
}

/// Headers sent with every form submission.
///
/// `Content-Type` with the multipart boundary is added by reqwest when the form is attached.
pub fn form_headers(
    base_url: &Url,
    user_agent: &str,
    cookie: &str,
) -> Result<HeaderMap, GifyuError> {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        ORIGIN,
        HeaderValue::from_str(&base_url.origin().ascii_serialization())?,
    );
    headers.insert(REFERER, HeaderValue::from_str(base_url.as_str())?);
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9,id;q=0.8"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    Ok(headers)
}
