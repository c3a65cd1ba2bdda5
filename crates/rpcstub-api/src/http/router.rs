//! Router construction and server host for the stub.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header::SERVER},
    middleware,
    response::Response,
    routing::{any, post},
};
use rpcstub_config::StubConfig;
use rpcstub_fixtures::FixtureStore;
use rpcstub_telemetry::{
    Metrics, propagate_request_id_layer, record_response, request_span, set_request_id_layer,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::auth::{BasicAuthGuard, require_basic_auth};
use crate::http::constants::{CONNECT_TEST_PATH, RPC_PATH};
use crate::http::rpc::{connection_test, method_not_allowed, rpc};
use crate::http::session::SessionGuard;
use crate::http::telemetry::HttpMetricsLayer;
use crate::readiness::ReadinessNotifier;
use crate::rpc::MethodDispatcher;
use crate::state::ApiState;

/// Axum router wrapper hosting the RPC stub.
#[derive(Clone)]
pub struct StubServer {
    router: Router,
}

impl StubServer {
    /// Stub serving the stock methods from `fixtures`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError::InvalidHeaderValue`] when the configured
    /// session token or server name cannot be sent as a header.
    pub fn new(
        config: &StubConfig,
        fixtures: Arc<FixtureStore>,
        telemetry: Metrics,
    ) -> ApiServerResult<Self> {
        Self::with_dispatcher(config, MethodDispatcher::with_fixtures(fixtures), telemetry)
    }

    /// Stub answering through a caller-supplied dispatcher.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn with_dispatcher(
        config: &StubConfig,
        dispatcher: MethodDispatcher,
        telemetry: Metrics,
    ) -> ApiServerResult<Self> {
        let server_name = HeaderValue::from_str(&config.server_name).map_err(|_| {
            ApiServerError::InvalidHeaderValue {
                field: "server_name",
                value: config.server_name.clone(),
            }
        })?;
        let state = Arc::new(ApiState {
            auth: BasicAuthGuard::new(&config.username, &config.password, &config.server_name)?,
            session: SessionGuard::new(config.session_id.clone())?,
            dispatcher,
            telemetry: telemetry.clone(),
        });

        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request| request_span(request))
            .on_request(|_request: &Request, _span: &Span| {})
            .on_response(|response: &Response, latency: Duration, span: &Span| {
                record_response(response, latency, span);
            });
        let layered = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(propagate_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let router = Self::build_router(&state)
            .layer(layered)
            .layer(SetResponseHeaderLayer::overriding(SERVER, server_name))
            .with_state(state);

        Ok(Self { router })
    }

    fn build_router(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        Router::new()
            .route(CONNECT_TEST_PATH, any(connection_test))
            .merge(Self::protected_routes(state))
    }

    fn protected_routes(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        Router::new()
            .route(RPC_PATH, post(rpc).fallback(method_not_allowed))
            .fallback(method_not_allowed)
            .layer(middleware::from_fn_with_state(
                Arc::clone(state),
                require_basic_auth,
            ))
    }

    /// Fully layered router, for in-process use.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind the listener without accepting connections yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or inspected.
    pub async fn bind(self, addr: SocketAddr) -> ApiServerResult<BoundServer> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ApiServerError::LocalAddr { source })?;
        Ok(BoundServer {
            router: self.router,
            listener,
            local_addr,
        })
    }
}

/// A stub whose listener is bound but not yet serving.
pub struct BoundServer {
    router: Router,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl BoundServer {
    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Notify readiness, then serve until the process ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the server terminates unexpectedly.
    pub async fn serve<N>(self, notifier: N) -> ApiServerResult<()>
    where
        N: ReadinessNotifier,
    {
        self.serve_with_shutdown(notifier, std::future::pending())
            .await
    }

    /// Notify readiness, then serve until `signal` resolves and in-flight
    /// requests finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the server terminates unexpectedly.
    pub async fn serve_with_shutdown<N, F>(self, notifier: N, signal: F) -> ApiServerResult<()>
    where
        N: ReadinessNotifier,
        F: Future<Output = ()> + Send + 'static,
    {
        notifier.server_ready(self.local_addr);
        drop(notifier);
        info!(addr = %self.local_addr, "stub ready");

        axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(signal)
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }
}
