//! Plumbing shared by the HTTP embedding clients.

use std::time::Duration;

use embedforge_core::config::non_empty;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{ApiEmbedderError, Result};

/// Request timeout applied to every API client.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Use the explicit key if there is one, otherwise the provider's
/// conventional environment variable.
///
/// An explicit empty key counts as no key and falls back to the environment
/// variable rather than being sent as-is.
pub(crate) fn resolve_api_key(explicit: Option<&str>, env_var: &'static str) -> Result<String> {
    if let Some(key) = non_empty(explicit) {
        return Ok(key.to_string());
    }

    match std::env::var(env_var) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(ApiEmbedderError::MissingApiKey { env_var }),
    }
}

pub(crate) fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiEmbedderError::network(format!("Failed to create HTTP client: {e}")))
}

/// Parse an endpoint that must be an absolute http(s) URL.
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| ApiEmbedderError::invalid_endpoint(endpoint, e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ApiEmbedderError::invalid_endpoint(
            endpoint,
            format!("unsupported scheme '{scheme}'"),
        )),
    }
}

/// Send a request and decode a JSON success body.
pub(crate) async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiEmbedderError::network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(ApiEmbedderError::from_status(status.as_u16(), body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiEmbedderError::invalid_response(e.to_string()))
}

/// Mask a credential for `Debug` output.
pub(crate) fn redact(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    match chars.len() {
        0 => String::new(),
        1..=8 => "***".to_string(),
        len => {
            let head: String = chars[..3].iter().collect();
            let tail: String = chars[len - 2..].iter().collect();
            format!("{head}***{tail}")
        }
    }
}
