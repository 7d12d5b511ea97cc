//! The exchange boundary.
//!
//! The engine never performs I/O itself. An [`ExchangeProvider`] turns a
//! request into a completed [`Exchange`]: a real HTTP client, a mock
//! engine, or a canned test double.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::core::{Exchange, HttpRequest};
use crate::errors::TransportError;

/// Produces exchanges for requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeProvider: Send + Sync {
    /// Performs one request/response exchange.
    async fn exchange(&self, request: &HttpRequest) -> Result<Exchange, TransportError>;
}

#[async_trait]
impl<T: ExchangeProvider + ?Sized> ExchangeProvider for Arc<T> {
    async fn exchange(&self, request: &HttpRequest) -> Result<Exchange, TransportError> {
        (**self).exchange(request).await
    }
}

/// Calls the provider, converting an elapsed timeout into [`TransportError::Timeout`].
pub async fn exchange_with_timeout<P: ExchangeProvider + ?Sized>(
    provider: &P,
    request: &HttpRequest,
    timeout: Option<Duration>,
) -> Result<Exchange, TransportError> {
    let Some(limit) = timeout else {
        return provider.exchange(request).await;
    };
    match tokio::time::timeout(limit, provider.exchange(request)).await {
        Ok(result) => result,
        Err(_) => {
            let after_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            debug!(request = %request, after_ms, "Exchange timed out");
            Err(TransportError::Timeout { after_ms })
        }
    }
}

/// Adapts a synchronous closure into an [`ExchangeProvider`].
pub struct FnExchangeProvider<F> {
    func: F,
}

impl<F> FnExchangeProvider<F>
where
    F: Fn(&HttpRequest) -> Result<Exchange, TransportError> + Send + Sync,
{
    /// Wraps a closure.
    #[must_use]
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> std::fmt::Debug for FnExchangeProvider<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnExchangeProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> ExchangeProvider for FnExchangeProvider<F>
where
    F: Fn(&HttpRequest) -> Result<Exchange, TransportError> + Send + Sync,
{
    async fn exchange(&self, request: &HttpRequest) -> Result<Exchange, TransportError> {
        (self.func)(request)
    }
}

/// Provider that issues real HTTP requests against a base URL.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpExchangeProvider {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpExchangeProvider {
    /// Creates a provider for `base_url`, e.g. `http://localhost:8080`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a provider using a preconfigured client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn classify(err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout { after_ms: 0 }
        } else if err.is_connect() {
            TransportError::connection(err.to_string())
        } else {
            TransportError::protocol(err.to_string())
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl ExchangeProvider for HttpExchangeProvider {
    async fn exchange(&self, request: &HttpRequest) -> Result<Exchange, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| TransportError::protocol(e.to_string()))?;
        let url = format!("{}{}", self.base_url, request.target());

        let mut builder = self.client.request(method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| Self::classify(&e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.to_string(), v.to_string())))
            .collect();
        let text = response.text().await.map_err(|e| Self::classify(&e))?;
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        debug!(url = %url, status, "HTTP exchange completed");
        Ok(Exchange { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fn_provider() {
        let provider = FnExchangeProvider::new(|request: &HttpRequest| {
            Ok(Exchange::new(200, json!({"path": request.path})))
        });

        let exchange = provider.exchange(&HttpRequest::get("/api/users/1")).await.unwrap();
        assert_eq!(exchange.body["path"], "/api/users/1");
    }

    #[tokio::test]
    async fn test_mocked_provider_through_arc() {
        let mut mock = MockExchangeProvider::new();
        mock.expect_exchange()
            .times(1)
            .returning(|_| Err(TransportError::connection("refused")));

        let provider: Arc<dyn ExchangeProvider> = Arc::new(mock);
        let err = provider.exchange(&HttpRequest::get("/")).await.unwrap_err();
        assert_eq!(err.kind(), "connection");
    }

    #[tokio::test]
    async fn test_timeout_becomes_transport_error() {
        struct Hanging;

        #[async_trait]
        impl ExchangeProvider for Hanging {
            async fn exchange(&self, _request: &HttpRequest) -> Result<Exchange, TransportError> {
                futures::future::pending().await
            }
        }

        let err = exchange_with_timeout(&Hanging, &HttpRequest::get("/"), Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Timeout { after_ms: 50 });
    }
}
