// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;
use crate::models::ScraperConfig;

/// Create a configured blocking HTTP client.
///
/// Without a configured timeout the client fetches unbounded, overriding
/// reqwest's 30-second default; a bounded timeout is opt-in.
pub fn create_client(config: &ScraperConfig) -> Result<Client> {
    let timeout = config.timeout_secs.map(Duration::from_secs);
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Fetch a URL as text, failing on non-success status.
pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.text()?)
}
