//! Exchange providers for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::core::{normalize_method, Exchange, HttpRequest};
use crate::errors::TransportError;
use crate::validator::ExchangeProvider;

/// Answers from a fixed method+path table; unknown routes get a bare 404.
#[derive(Debug, Default)]
pub struct StaticExchangeProvider {
    routes: HashMap<(String, String), Exchange>,
    call_count: AtomicUsize,
}

impl StaticExchangeProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a canned exchange for a method and path.
    #[must_use]
    pub fn with_route(mut self, method: &str, path: &str, exchange: Exchange) -> Self {
        self.routes.insert((normalize_method(method), path.to_string()), exchange);
        self
    }

    /// Returns the call count.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeProvider for StaticExchangeProvider {
    async fn exchange(&self, request: &HttpRequest) -> Result<Exchange, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let key = (request.method.clone(), request.path.clone());
        Ok(self.routes.get(&key).cloned().unwrap_or_else(|| Exchange::empty(404)))
    }
}

/// Fails every exchange with the same error.
#[derive(Debug, Clone)]
pub struct FailingExchangeProvider {
    error: TransportError,
}

impl FailingExchangeProvider {
    /// Creates a provider failing with `error`.
    #[must_use]
    pub fn new(error: TransportError) -> Self {
        Self { error }
    }

    /// Creates a provider whose connections are refused.
    #[must_use]
    pub fn refused() -> Self {
        Self::new(TransportError::connection("connection refused"))
    }
}

#[async_trait]
impl ExchangeProvider for FailingExchangeProvider {
    async fn exchange(&self, _request: &HttpRequest) -> Result<Exchange, TransportError> {
        Err(self.error.clone())
    }
}

/// Delays another provider by a fixed latency.
#[derive(Debug)]
pub struct SlowExchangeProvider<P> {
    inner: P,
    latency: Duration,
}

impl<P> SlowExchangeProvider<P> {
    /// Wraps `inner` with `latency`.
    #[must_use]
    pub fn new(inner: P, latency: Duration) -> Self {
        Self { inner, latency }
    }
}

#[async_trait]
impl<P: ExchangeProvider> ExchangeProvider for SlowExchangeProvider<P> {
    async fn exchange(&self, request: &HttpRequest) -> Result<Exchange, TransportError> {
        tokio::time::sleep(self.latency).await;
        self.inner.exchange(request).await
    }
}

/// Records every request before delegating.
#[derive(Debug)]
pub struct RecordingExchangeProvider<P> {
    inner: P,
    requests: Mutex<Vec<HttpRequest>>,
}

impl<P> RecordingExchangeProvider<P> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    /// True when no request has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }
}

#[async_trait]
impl<P: ExchangeProvider> ExchangeProvider for RecordingExchangeProvider<P> {
    async fn exchange(&self, request: &HttpRequest) -> Result<Exchange, TransportError> {
        self.requests.lock().push(request.clone());
        self.inner.exchange(request).await
    }
}

/// Tracks how many exchanges are in flight at once.
#[derive(Debug)]
pub struct InFlightExchangeProvider<P> {
    inner: P,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl<P> InFlightExchangeProvider<P> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Highest number of simultaneous exchanges seen.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Exchanges currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<P: ExchangeProvider> ExchangeProvider for InFlightExchangeProvider<P> {
    async fn exchange(&self, request: &HttpRequest) -> Result<Exchange, TransportError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.current);
        self.inner.exchange(request).await
    }
}
