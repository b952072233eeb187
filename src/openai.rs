//! OpenAI-compatible client configuration.
//!
//! Keyword generation talks to OpenRouter, which speaks the OpenAI chat API,
//! so the client is pointed at a configurable base URL.

use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for chat requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create a client for `api_base` with the default timeout.
pub fn create_client(api_base: &str, api_key: &str) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(api_base, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create a client for `api_base` with a custom timeout.
pub fn create_client_with_timeout(
    api_base: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let config = OpenAIConfig::new()
        .with_api_base(api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}
