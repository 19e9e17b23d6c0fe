/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, IntoStaticStr};

/// How the service should fetch the image: by URL or from the attached file part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceType {
    Url,
    File,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlbumPrivacy {
    Public,
    Password,
    #[default]
    PrivateButLink,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl AlbumPrivacy {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn privacy_wire_names() {
        assert_eq!(AlbumPrivacy::Public.as_str(), "public");
        assert_eq!(AlbumPrivacy::Password.as_str(), "password");
        assert_eq!(AlbumPrivacy::PrivateButLink.as_str(), "private_but_link");
        assert_eq!(
            AlbumPrivacy::from_str("private_but_link").unwrap(),
            AlbumPrivacy::PrivateButLink
        );
        assert_eq!(AlbumPrivacy::default(), AlbumPrivacy::PrivateButLink);
    }

    #[test]
    fn source_type_wire_names() {
        assert_eq!(SourceType::Url.as_str(), "url");
        assert_eq!(SourceType::File.as_str(), "file");
    }
}
