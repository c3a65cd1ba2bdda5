//! Process and per-request context attached to log lines.
//!
//! # Design
//! - The process span is entered for as long as the stub runs; every event
//!   inherits its `server` and `build_sha` fields.
//! - Per-request data rides in a tokio task-local, so middleware deep in the
//!   stack can name the request it is handling without threading it through.

use std::future::Future;
use std::sync::Arc;

use tracing::span::EnteredSpan;

use crate::init::build_sha;

/// Keeps the `stub` span entered until dropped.
///
/// The guard is `!Send`; hold it on the thread that drives the server.
pub struct GlobalContextGuard {
    _span: EnteredSpan,
}

impl GlobalContextGuard {
    /// Enter a `stub` span labelled with `server_name`.
    #[must_use]
    pub fn new(server_name: &str) -> Self {
        let span = tracing::info_span!("stub", server = %server_name, build_sha = %build_sha());
        Self {
            _span: span.entered(),
        }
    }
}

/// Identity of the request the current task is serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Arc<str>,
    route: Arc<str>,
}

tokio::task_local! {
    static CURRENT: RequestContext;
}

impl RequestContext {
    /// Context for one request.
    #[must_use]
    pub fn new(request_id: impl Into<Arc<str>>, route: impl Into<Arc<str>>) -> Self {
        Self {
            request_id: request_id.into(),
            route: route.into(),
        }
    }

    /// Context of the request being served by this task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(Clone::clone).ok()
    }

    /// Value of the `x-request-id` header, or empty when none was assigned.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Matched route template, or `unmatched`.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Run `fut` with this context visible through [`Self::current`].
    pub async fn scope<Fut>(self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(self, fut).await
    }
}
