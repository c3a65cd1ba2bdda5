//! Prometheus-backed counters for the stub.
//!
//! # Design
//! - Collector registration stays private; callers only see increment helpers.
//! - Nothing is exported over HTTP; harnesses read [`Metrics::render`] or
//!   [`Metrics::snapshot`] in-process.

use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared by the request pipeline.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    rpc_calls_total: IntCounterVec,
    auth_failures_total: IntCounter,
    session_conflicts_total: IntCounter,
}

/// Point-in-time view of the scalar counters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Requests rejected with a Basic-auth challenge.
    pub auth_failures_total: u64,
    /// Requests answered with the session-token conflict.
    pub session_conflicts_total: u64,
}

impl Metrics {
    /// Construct a new registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any collector cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )
        .map_err(|source| collector("http_requests_total", source))?;
        let rpc_calls_total = IntCounterVec::new(
            Opts::new("rpc_calls_total", "RPC envelopes dispatched by method"),
            &["method"],
        )
        .map_err(|source| collector("rpc_calls_total", source))?;
        let auth_failures_total = IntCounter::with_opts(Opts::new(
            "auth_failures_total",
            "Requests rejected for missing or invalid Basic credentials",
        ))
        .map_err(|source| collector("auth_failures_total", source))?;
        let session_conflicts_total = IntCounter::with_opts(Opts::new(
            "session_conflicts_total",
            "Requests rejected for a missing or mismatched session token",
        ))
        .map_err(|source| collector("session_conflicts_total", source))?;

        registry
            .register(Box::new(http_requests_total.clone()))
            .map_err(|source| register("http_requests_total", source))?;
        registry
            .register(Box::new(rpc_calls_total.clone()))
            .map_err(|source| register("rpc_calls_total", source))?;
        registry
            .register(Box::new(auth_failures_total.clone()))
            .map_err(|source| register("auth_failures_total", source))?;
        registry
            .register(Box::new(session_conflicts_total.clone()))
            .map_err(|source| register("session_conflicts_total", source))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                rpc_calls_total,
                auth_failures_total,
                session_conflicts_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        let code = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[route, code.as_str()])
            .inc();
    }

    /// Increment the dispatch counter for an RPC method label.
    pub fn inc_rpc_call(&self, method: &str) {
        self.inner.rpc_calls_total.with_label_values(&[method]).inc();
    }

    /// Increment the Basic-auth rejection counter.
    pub fn inc_auth_failure(&self) {
        self.inner.auth_failures_total.inc();
    }

    /// Increment the session-token conflict counter.
    pub fn inc_session_conflict(&self) {
        self.inner.session_conflicts_total.inc();
    }

    /// Number of HTTP requests recorded for `route` and `status`.
    #[must_use]
    pub fn http_requests(&self, route: &str, status: u16) -> u64 {
        let code = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[route, code.as_str()])
            .get()
    }

    /// Number of dispatches recorded for `method`.
    #[must_use]
    pub fn rpc_calls(&self, method: &str) -> u64 {
        self.inner.rpc_calls_total.with_label_values(&[method]).get()
    }

    /// Render the registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsRender { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsText { source })
    }

    /// Take a point-in-time snapshot of the scalar counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            auth_failures_total: self.inner.auth_failures_total.get(),
            session_conflicts_total: self.inner.session_conflicts_total.get(),
        }
    }
}

fn collector(name: &'static str, source: prometheus::Error) -> TelemetryError {
    TelemetryError::CounterBuild { name, source }
}

fn register(name: &'static str, source: prometheus::Error) -> TelemetryError {
    TelemetryError::CounterRegister { name, source }
}
