use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use wreq::{Client, header};

use crate::credential;
use crate::error::{ApiError, IntoApiError, Service, TransportError};
use crate::validation::ValidationError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends one JSON POST to the backend and decodes the JSON answer.
pub trait ApiTransport: Send + Sync {
    fn post_json<B, R>(
        &self,
        path: &str,
        headers: &[(&'static str, String)],
        body: &B,
    ) -> impl Future<Output = Result<R, TransportError>> + Send
    where
        B: Serialize + Sync,
        R: DeserializeOwned;
}

/// HTTP transport against the configured backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .gzip(true)
            .brotli(true)
            .zstd(true)
            .build()?;

        Ok(Self::with_client(http_client, base_url))
    }

    /// Use an already configured client.
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl ApiTransport for ApiClient {
    async fn post_json<B, R>(
        &self,
        path: &str,
        headers: &[(&'static str, String)],
        body: &B,
    ) -> Result<R, TransportError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let payload =
            serde_json::to_string(body).map_err(|e| TransportError::Encode(e.to_string()))?;

        tracing::debug!("POST {}", url);

        let mut request = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request
            .body(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("failed to read response: {e}")))?;

        tracing::debug!("Response Status: {} ({} bytes)", status, text.len());

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Run one façade operation: stop on a validation failure, otherwise issue a
/// single POST with the API key header. Every failure comes back tagged with
/// `service` and `code`.
pub(crate) async fn execute<T, B, R>(
    transport: &T,
    api_key: &str,
    service: Service,
    code: &'static str,
    path: &str,
    request: Result<B, ValidationError>,
) -> Result<R, ApiError>
where
    T: ApiTransport,
    B: Serialize + Sync,
    R: DeserializeOwned,
{
    let body = match request {
        Ok(body) => body,
        Err(err) => {
            let err = err.into_api_error(service, code);
            tracing::warn!(%service, code, "Rejected request parameters: {}", err);
            return Err(err);
        }
    };

    let headers = credential::auth_headers(api_key);
    transport
        .post_json(path, &headers, &body)
        .await
        .map_err(|err| {
            let err = err.into_api_error(service, code);
            tracing::error!(%service, code, status = ?err.status_code, "Request to {} failed: {}", path, err);
            err
        })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let http_client = Client::builder().build().unwrap();
        let client = ApiClient::with_client(http_client, "https://api.example.com/");
        assert_eq!(client.base_url(), "https://api.example.com");
        assert_eq!(
            client.endpoint("/promolinks/v2/link-generation-find-all"),
            "https://api.example.com/promolinks/v2/link-generation-find-all"
        );
    }
}
