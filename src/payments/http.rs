use crate::payments::error::{GatewayError, GatewayResult};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

/// JSON client for the gateway REST API. One request per call: charges are not
/// idempotent, so failures are reported to the caller as they come.
#[derive(Clone)]
pub struct GatewayHttpClient {
    client: Client,
}

impl GatewayHttpClient {
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let client =
            Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| GatewayError::NetworkError {
                    message: format!("failed to initialize HTTP client: {}", e),
                })?;

        Ok(Self { client })
    }

    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: Url,
        bearer_token: &str,
        body: Option<&JsonValue>,
    ) -> GatewayResult<T> {
        debug!(method = %method, path = %url.path(), "gateway request");
        let mut request = self.client.request(method, url).bearer_auth(bearer_token);
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::NetworkError {
                message: format!("gateway request failed: {}", e),
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status.is_success() {
            return serde_json::from_str::<T>(&text).map_err(|e| GatewayError::ProviderError {
                message: format!("invalid gateway JSON response: {}", e),
                http_status: Some(status.as_u16()),
                retryable: false,
            });
        }

        if status.as_u16() == 429 {
            return Err(GatewayError::RateLimitError {
                message: error_message(&text)
                    .unwrap_or_else(|| "gateway rate limit exceeded".to_string()),
            });
        }

        Err(GatewayError::ProviderError {
            message: error_message(&text).unwrap_or_else(|| format!("HTTP {}", status)),
            http_status: Some(status.as_u16()),
            retryable: status.is_server_error(),
        })
    }
}

/// Paystack error bodies look like `{"status": false, "message": "..."}`
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<JsonValue>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_is_read_from_gateway_body() {
        assert_eq!(
            error_message(r#"{"status":false,"message":"Invalid key"}"#).as_deref(),
            Some("Invalid key")
        );
        assert_eq!(error_message("<html>bad gateway</html>"), None);
    }
}
