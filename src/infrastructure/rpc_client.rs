// RPC transport client
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// What can go wrong with one RPC round trip. The original client
/// collapsed all of these into an undefined callback argument; callers
/// that want that behavior match on the error and substitute a default.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never completed (connect failure, reset, bad origin).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },
    /// The server answered with a non-2xx status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
    /// The body arrived but did not decode as the expected response.
    #[error("malformed response from {url}: {source}")]
    MalformedBody {
        url: String,
        source: reqwest::Error,
    },
}

/// HTTP client for `<origin>/unshadow/<service>/<method>` calls.
///
/// One POST per `send`, JSON in and out, no retry and no timeout override.
/// Cancellation is dropping the returned future.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    origin: String,
}

impl RpcClient {
    pub fn new(origin: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// `<origin>/unshadow/<service>/<method>`
    pub fn endpoint_url(&self, service: &str, method: &str) -> String {
        format!("{}/unshadow/{}/{}", self.origin, service, method)
    }

    /// Issue exactly one POST carrying the JSON serialization of `payload`
    /// and decode the JSON response. Resolves exactly once.
    pub async fn send<P, R>(
        &self,
        service: &str,
        method: &str,
        payload: &P,
    ) -> Result<R, TransportError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint_url(service, method);

        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|source| TransportError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { url, status });
        }

        response
            .json::<R>()
            .await
            .map_err(|source| TransportError::MalformedBody { url, source })
    }
}
