//! Public events example.
//!
//! Fetches every page of the public events feed, then revalidates the first
//! page against the in-memory cache.
//!
//! Run with: GITHUB_TOKEN=... cargo run --example list_events
//!
//! Without `GITHUB_TOKEN` the client falls back to `GHCLIENT`/`GHSECRET`,
//! or to anonymous requests.

use std::sync::Arc;

use libhub::{ClientConfig, HubClient, InMemoryCache, Query};
use serde_json::Value;

#[tokio::main]
async fn main() -> libhub::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut config = ClientConfig::from_env()
        .with_cache(Arc::new(InMemoryCache::new()))
        .with_page_concurrency(4);
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        config = config.with_token(token);
    }

    let client = HubClient::new(config)?;
    println!("Authenticating as {:?}", client.credentials());

    let events: Vec<Value> = client
        .get("/events", Query::new().with_all_pages(true))
        .await?;
    println!("Fetched {} events across all pages", events.len());

    for event in events.iter().take(5) {
        println!(
            "  - {} by {}",
            event["type"].as_str().unwrap_or("?"),
            event["actor"]["login"].as_str().unwrap_or("?")
        );
    }

    // Second fetch of page one is served from the cache on 304
    let first_page = client.get_response("/events", Query::new()).await?;
    println!(
        "\nFirst page ETag: {}",
        first_page.etag().unwrap_or("(none)")
    );

    println!("\nDone!");
    Ok(())
}
