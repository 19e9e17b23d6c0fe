/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::ApiClient;
use crate::errors::GifyuError;
use crate::parsers::{TokenExtractor, session_cookie};

/// Session acquired from the landing page: anti-forgery token plus session cookie.
///
/// Lives for a single upload flow and is never written anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    auth_token: String,
    cookie: String,
}

impl Credential {
    pub fn new(auth_token: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            cookie: cookie.into(),
        }
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// `name=value` pair replayed in the `Cookie` header
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub(crate) fn with_cookie(&self, cookie: impl Into<String>) -> Self {
        Self {
            auth_token: self.auth_token.clone(),
            cookie: cookie.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("auth_token", &"xxx")
            .field("cookie", &"xxx")
            .finish()
    }
}

/// Fetches the landing page and pulls the token and session cookie out of it
pub(crate) async fn acquire_credential(
    api: &ApiClient,
    extractor: &dyn TokenExtractor,
) -> Result<Credential, GifyuError> {
    // Any failure to load the landing page is a session failure
    let (headers, body) = api.get_landing_page().await.map_err(|e| match e {
        GifyuError::ApiResponse { status, .. } => {
            GifyuError::Auth(format!("landing page returned status {status}"))
        }
        other => other,
    })?;

    let auth_token = extractor.extract(&body).inspect_err(|e| {
        log::debug!("Token extraction failed on {} byte landing page: {e}", body.len());
    })?;
    let cookie = session_cookie(&headers)?;

    Ok(Credential { auth_token, cookie })
}
