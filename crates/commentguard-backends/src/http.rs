//! Shared request/response handling for HTTP backends

use commentguard_core::{Error, Result};
use reqwest::header::RETRY_AFTER;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const MAX_ERROR_BODY: usize = 512;

/// Send a request and decode a 2xx JSON body.
///
/// 429 maps to `RateLimited`, other non-2xx statuses to `Backend`, and
/// transport failures (including timeouts) to `Network`.
pub(crate) async fn send_json(request: RequestBuilder, backend: &str) -> Result<Value> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    debug!(backend, status = status.as_u16(), "Backend responded");

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        warn!(backend, ?retry_after, "Moderation backend rate limited the request");
        return Err(Error::RateLimited { retry_after });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::backend(status.as_u16(), excerpt(&body)));
    }

    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::parse(format!("{} response is not JSON: {}", backend, e)))
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::network(format!("request timed out: {}", e))
    } else {
        Error::network(e.to_string())
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
