//! Resolve a few hosts over DoH and print the bypassed request for each.
//!
//! ```text
//! RUST_LOG=dohbypass=debug cargo run --example bypass_demo -- https://example.com/
//! ```

use dohbypass::dns::Provider;
use dohbypass::BypassClient;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        urls.push("https://example.com/path?x=1".to_string());
        urls.push("https://www.wikipedia.org/".to_string());
    }

    let client = BypassClient::builder()
        .primary(Provider::Cloudflare)
        .fallback(Provider::Google)
        .query_timeout(Duration::from_secs(3))
        .build();

    for url in &urls {
        let start = Instant::now();
        let req = client.build_bypassed_request(url).await?;
        println!("{} ({:?})", url, start.elapsed());
        if req.is_bypassed() {
            println!("  -> {}", req.url());
            for (name, value) in req.headers() {
                println!("     {}: {:?}", name, value);
            }
        } else {
            println!("  -> not bypassed, using {}", req.url());
        }
    }

    // Second pass is served from the cache.
    for url in &urls {
        let start = Instant::now();
        client.build_bypassed_request(url).await?;
        println!("{} cached ({:?})", url, start.elapsed());
    }

    println!("\n{:?}", client.stats());
    Ok(())
}
