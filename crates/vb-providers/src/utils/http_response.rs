//! HTTP response handling for hosted providers
//!
//! Maps provider HTTP status codes onto the engine's error taxonomy. The
//! mapping decides fallback behavior: 5xx and 429 are transient and burn
//! down the router's chain, any other 4xx means the payload itself was
//! refused and propagates immediately.

use reqwest::Response;

use vb_domain::error::{Error, Result};

/// Check a provider response's status and parse its JSON body
pub async fn check_and_parse(response: Response, provider: &str) -> Result<serde_json::Value> {
    let status = response.status();

    if !status.is_success() {
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "no error body".to_string());
        let code = status.as_u16();

        return Err(match code {
            500..=599 => Error::network(format!("{provider} server error ({code}): {detail}")),
            _ => Error::provider_rejected(provider, code, detail),
        });
    }

    response
        .json()
        .await
        .map_err(|e| Error::network_with_source(format!("{provider} response parse failed"), e))
}

/// Map a reqwest transport error onto the taxonomy
pub fn map_transport_error(e: reqwest::Error, provider: &str, timeout_ms: u64) -> Error {
    if e.is_timeout() {
        Error::provider_timeout(provider, timeout_ms)
    } else {
        Error::network_with_source(format!("{provider} request failed"), e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_keep_fallback_eligibility() {
        // Quota and server errors continue the chain; other rejections stop it
        assert!(Error::provider_rejected("openai", 429, "quota").is_fallback_eligible());
        assert!(Error::network("openai server error (503)").is_fallback_eligible());
        assert!(!Error::provider_rejected("openai", 401, "bad key").is_fallback_eligible());
        assert!(!Error::provider_rejected("openai", 400, "too long").is_fallback_eligible());
    }
}
