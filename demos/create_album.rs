/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate gifyu;

use anyhow::Result;
use dotenvy::dotenv;
use gifyu::{AlbumPrivacy, AlbumSpec, GifyuClientBuilder, ImageInput, image_id_from_upload};
use std::str::FromStr;

// Uploads images and groups them into an album using the lower level calls, so one session
// is shared between the uploads and the album.
// usage: cargo run --example create_album -- <title> <public|password|private_but_link> <url-or-path>...
// GIFYU_ALBUM_PASSWORD is used when the privacy is `password`.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(title), Some(privacy)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: create_album <title> <privacy> <url-or-path>...");
    };
    let privacy = AlbumPrivacy::from_str(&privacy)?;
    let inputs: Vec<ImageInput> = args.map(ImageInput::new).collect();

    let client = GifyuClientBuilder::from_env()?.build()?;
    let credential = client.acquire_credential().await?;

    let batch = client.upload_many(&credential, &inputs).await;
    println!(
        "{} uploaded, {} failed",
        batch.success.len(),
        batch.failed.len()
    );

    let image_ids = batch
        .success
        .iter()
        .map(image_id_from_upload)
        .collect::<Result<Vec<_>, _>>()?;

    let mut spec = AlbumSpec::new(title).with_privacy(privacy);
    if let Ok(password) = std::env::var("GIFYU_ALBUM_PASSWORD") {
        spec = spec.with_password(password);
    }

    let album = client.create_album(&credential, &image_ids, &spec).await?;
    println!("{}", serde_json::to_string_pretty(&album)?);

    Ok(())
}
