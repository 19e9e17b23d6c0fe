/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::errors::GifyuError;
use reqwest::header::{HeaderMap, SET_COOKIE};
use std::fmt::Debug;

/// Marker preceding the auth token inside the landing page's inline script
pub const AUTH_TOKEN_MARKER: &str = "PF.obj.config.auth_token = ";

/// Pulls the anti-forgery auth token out of the landing page HTML.
///
/// The page format is owned by the remote operator and changes without notice, so the
/// extraction is a swappable strategy. Implementations must fail with
/// [`GifyuError::Auth`] instead of returning a guessed value.
pub trait TokenExtractor: Send + Sync + Debug {
    fn extract(&self, body: &str) -> Result<String, GifyuError>;
}

/// Two stage scan: split on a literal marker, then take the first quoted value after it.
#[derive(Debug, Clone)]
pub struct MarkerTokenExtractor {
    marker: String,
    delimiter: char,
}

impl MarkerTokenExtractor {
    pub fn new(marker: impl Into<String>, delimiter: char) -> Self {
        Self {
            marker: marker.into(),
            delimiter,
        }
    }
}

impl Default for MarkerTokenExtractor {
    fn default() -> Self {
        Self::new(AUTH_TOKEN_MARKER, '"')
    }
}

impl TokenExtractor for MarkerTokenExtractor {
    fn extract(&self, body: &str) -> Result<String, GifyuError> {
        let after_marker = body
            .split(self.marker.as_str())
            .nth(1)
            .ok_or_else(|| {
                GifyuError::Auth(format!("auth token marker `{}` not found", self.marker))
            })?;

        // `"abc123";` splits into ["", "abc123", ";"]
        let token = after_marker
            .split(self.delimiter)
            .nth(1)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GifyuError::Auth("auth token value not found".into()))?;

        Ok(token.to_string())
    }
}

// Takes the first Set-Cookie header and keeps only the name=value pair
pub(crate) fn session_cookie(headers: &HeaderMap) -> Result<String, GifyuError> {
    let raw = headers
        .get(SET_COOKIE)
        .ok_or_else(|| GifyuError::Auth("response carried no session cookie".into()))?
        .to_str()
        .map_err(|_| GifyuError::Auth("session cookie is not valid text".into()))?;

    let cookie = raw.split(';').next().unwrap_or_default().trim();
    if cookie.is_empty() {
        return Err(GifyuError::Auth("session cookie is empty".into()));
    }
    Ok(cookie.to_string())
}

/// Image identifier encoded in an upload response's viewer URL.
///
/// `https://gifyu.com/image/AbC1` splits on `/` into
/// `["https:", "", "gifyu.com", "image", "AbC1"]`; the identifier is index 4.
pub fn image_id_from_upload(body: &serde_json::Value) -> Result<String, GifyuError> {
    let viewer = body
        .pointer("/image/url_viewer")
        .and_then(serde_json::Value::as_str)
        .ok_or(GifyuError::MissingField("image.url_viewer"))?;

    viewer
        .split('/')
        .nth(4)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(GifyuError::MissingField("image.url_viewer identifier"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    #[test]
    fn extracts_token_after_marker() {
        let body = r#"<script>PF.obj.config.base_url = "https://gifyu.com";
            PF.obj.config.auth_token = "a1b2c3d4e5";
            PF.obj.config.json_api = "https://gifyu.com/json";</script>"#;
        let token = MarkerTokenExtractor::default().extract(body).unwrap();
        assert_eq!(token, "a1b2c3d4e5");
    }

    #[test]
    fn missing_marker_is_auth_error() {
        let err = MarkerTokenExtractor::default()
            .extract("<html>maintenance</html>")
            .unwrap_err();
        assert!(matches!(err, GifyuError::Auth(_)));
    }

    #[test]
    fn marker_without_quoted_value_is_auth_error() {
        let err = MarkerTokenExtractor::default()
            .extract("PF.obj.config.auth_token = null;")
            .unwrap_err();
        assert!(matches!(err, GifyuError::Auth(_)));
    }

    #[test]
    fn custom_marker_and_delimiter() {
        let extractor = MarkerTokenExtractor::new("token=", '\'');
        assert_eq!(extractor.extract("x token='zz9' y").unwrap(), "zz9");
    }

    #[test]
    fn cookie_is_truncated_at_first_attribute() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("PHPSESSID=abc123; path=/; HttpOnly"),
        );
        headers.append(SET_COOKIE, HeaderValue::from_static("other=1; path=/"));
        assert_eq!(session_cookie(&headers).unwrap(), "PHPSESSID=abc123");
    }

    #[test]
    fn missing_cookie_is_auth_error() {
        let err = session_cookie(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, GifyuError::Auth(_)));
    }

    #[test]
    fn viewer_identifier_is_fifth_segment() {
        let body = json!({"image": {"url_viewer": "https://gifyu.com/image/Xy12Z"}});
        assert_eq!(image_id_from_upload(&body).unwrap(), "Xy12Z");

        let body = json!({"image": {"url_viewer": "https://gifyu.com/image/Q9/extra"}});
        assert_eq!(image_id_from_upload(&body).unwrap(), "Q9");
    }

    #[test]
    fn viewer_identifier_missing() {
        let err = image_id_from_upload(&json!({"status_code": 200})).unwrap_err();
        assert!(matches!(err, GifyuError::MissingField(_)));

        let err =
            image_id_from_upload(&json!({"image": {"url_viewer": "https://gifyu.com"}}))
                .unwrap_err();
        assert!(matches!(err, GifyuError::MissingField(_)));
    }
}
