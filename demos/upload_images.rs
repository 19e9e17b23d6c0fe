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
use gifyu::{GifyuClientBuilder, Outcome};

// Uploads every URL or path given on the command line.
// usage: cargo run --example upload_images -- <url-or-path>...
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let sources: Vec<String> = std::env::args().skip(1).collect();
    if sources.is_empty() {
        anyhow::bail!("usage: upload_images <url-or-path>...");
    }

    // GIFYU_BASE_URL / GIFYU_MAX_CONCURRENT_UPLOADS override the defaults
    let client = GifyuClientBuilder::from_env()?.build()?;

    let outcome = if sources.len() == 1 {
        client.gifyu(sources[0].as_str(), None).await
    } else {
        client.gifyu(sources, None).await
    };

    match &outcome {
        Outcome::Image(body) => {
            println!("Uploaded: {}", body["image"]["url_viewer"]);
        }
        Outcome::Batch(batch) => {
            for body in &batch.success {
                println!("Uploaded: {}", body["image"]["url_viewer"]);
            }
            println!("{} failed", batch.failed.len());
        }
        Outcome::Failed(err) => {
            println!("Upload failed: {}", err.message().unwrap_or("unknown error"));
        }
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }

    Ok(())
}
