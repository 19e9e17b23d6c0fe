/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # Gifyu
//!
//! Upload images and create albums on [Gifyu](https://gifyu.com).
//!
//! Gifyu has no public API. This library drives the same endpoints the site's upload page
//! uses: it loads the landing page to obtain an auth token and session cookie, then posts
//! multipart forms to `/json` with browser-like headers.
//!
//! ## Features
//!
//! - Upload an image from a URL or a local file
//!     - Optional title and description
//! - Batch uploads with a bounded number of simultaneous requests
//! - Album creation (public, password protected or private-but-link)
//! - Account login
//! - A single entry point, [`gifyu()`], that never returns an error and instead reports
//!   failures in the same JSON shape the site uses
//!
//! *The landing page scrape is fragile by nature. If the site changes its markup a custom
//! [`TokenExtractor`] can be plugged into the [`GifyuClientBuilder`].*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! gifyu = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gifyu::{AlbumPrivacy, AlbumSpec, GifyuClient, Outcome};
//!
//! async fn upload_and_group(paths: Vec<String>) -> anyhow::Result<()> {
//!     let client = GifyuClient::builder().max_concurrent_uploads(4).build()?;
//!
//!     let album = AlbumSpec::new("Holiday").with_privacy(AlbumPrivacy::Public);
//!     match client.gifyu(paths, Some(album)).await {
//!         Outcome::BatchWithAlbum { data, data_album } => {
//!             println!("{} uploaded, {} failed", data.success.len(), data.failed.len());
//!             println!("Album: {data_album}");
//!         }
//!         Outcome::Failed(err) => println!("Failed: {:?}", err.message()),
//!         other => println!("{}", serde_json::to_string_pretty(&other)?),
//!     }
//!     Ok(())
//! }
//! ```
//!
pub mod album;
pub mod api;
pub mod client;
pub mod credential;
pub mod errors;
pub mod forms;
pub mod image;
mod parsers;
pub mod properties;

pub use album::AlbumSpec;
pub use client::*;
pub use credential::Credential;
pub use errors::*;
pub use image::{BatchResult, ImageInput, UploadInput, classify_source};
pub use parsers::{AUTH_TOKEN_MARKER, MarkerTokenExtractor, TokenExtractor, image_id_from_upload};
pub use properties::*;
