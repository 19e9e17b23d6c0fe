/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::errors::GifyuError;
use crate::forms::{FormPayload, form_headers};
use chrono::Local;
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

// Root of the Gifyu site
pub const API_ORIGIN: &str = "https://gifyu.com/";

// Endpoint shared by uploads and album creation, told apart by the `action` field
pub(crate) const JSON_ENDPOINT: &str = "json";
pub(crate) const LOGIN_ENDPOINT: &str = "login";

/// Directly communicates with the site.
#[derive(Clone)]
pub struct ApiClient {
    https_client: reqwest::Client,
    base_url: Url,
    user_agent: String,
}

impl ApiClient {
    pub fn new(https_client: reqwest::Client, base_url: Url, user_agent: String) -> Self {
        Self {
            https_client,
            base_url,
            user_agent,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetches the landing page, returning its headers and HTML body
    pub async fn get_landing_page(&self) -> Result<(HeaderMap, String), GifyuError> {
        let resp = self
            .https_client
            .get(self.base_url.clone())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        let headers = resp.headers().clone();
        Ok((headers, resp.text().await?))
    }

    /// Posts a multipart form and decodes the JSON response
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        cookie: &str,
        form: FormPayload,
    ) -> Result<T, GifyuError> {
        let resp = self.post_form_raw(path, cookie, form).await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Posts a multipart form, returning the response once its status is known to be good
    pub async fn post_form_raw(
        &self,
        path: &str,
        cookie: &str,
        form: FormPayload,
    ) -> Result<Response, GifyuError> {
        let url = self.base_url.join(path)?;
        let headers = form_headers(&self.base_url, &self.user_agent, cookie)?;
        let form = form.into_multipart()?;

        log::info!(
            "POST request sent to {} at {}",
            url,
            Local::now().format("%H:%M:%S")
        );
        let resp = self
            .https_client
            .post(url)
            .headers(headers)
            .multipart(form)
            .send()
            .await?;
        Self::check_status(resp).await
    }

    // Non-2xx answers keep their body so callers can hand it back verbatim
    async fn check_status(resp: Response) -> Result<Response, GifyuError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            log::debug!("Failed reading error body for status {status}: {e}");
            String::new()
        });
        let body = serde_json::from_str::<serde_json::Value>(&text)
            .unwrap_or(serde_json::Value::String(text));
        log::debug!("Request failed with status {status}");
        Err(GifyuError::ApiResponse { status, body })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_base() {
        let base = Url::parse(API_ORIGIN).unwrap();
        assert_eq!(
            base.join(JSON_ENDPOINT).unwrap().as_str(),
            "https://gifyu.com/json"
        );
        assert_eq!(
            base.join(LOGIN_ENDPOINT).unwrap().as_str(),
            "https://gifyu.com/login"
        );
    }
}
