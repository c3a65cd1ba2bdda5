//! Method-name routing for parsed envelopes.
//!
//! # Design
//! - Handlers are plain closures keyed by method name; anything unregistered
//!   (including non-string method values) falls through to one default.
//! - Fixture-backed handlers read shared templates and return fresh values,
//!   so one request's tag never leaks into another's response.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rpcstub_fixtures::{FixtureKind, FixtureStore};
use serde_json::{Value, json};

use crate::rpc::envelope::RpcEnvelope;

/// `session-stats` method name.
pub const METHOD_SESSION_STATS: &str = "session-stats";
/// `torrent-get` method name.
pub const METHOD_TORRENT_GET: &str = "torrent-get";
/// Transport self-check method name.
pub const METHOD_TEST_SEND_REQUEST: &str = "test_send_request";
/// `ids` selector that switches `torrent-get` to the recently-active fixture.
pub const IDS_RECENTLY_ACTIVE: &str = "recently-active";
/// Label used for anything served by the default handler.
pub const UNIMPLEMENTED_LABEL: &str = "unimplemented";

/// Boxed method handler.
pub type MethodHandler = Arc<dyn Fn(&RpcEnvelope) -> Value + Send + Sync>;

/// Maps method names to handlers.
#[derive(Clone)]
pub struct MethodDispatcher {
    handlers: HashMap<String, MethodHandler>,
    fallback: MethodHandler,
}

impl fmt::Debug for MethodDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("MethodDispatcher")
            .field("methods", &methods)
            .finish_non_exhaustive()
    }
}

impl Default for MethodDispatcher {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Arc::new(|_envelope: &RpcEnvelope| unimplemented_response()),
        }
    }
}

impl MethodDispatcher {
    /// Dispatcher with no methods; every call hits the default handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher serving the stock methods from `fixtures`.
    #[must_use]
    pub fn with_fixtures(fixtures: Arc<FixtureStore>) -> Self {
        let mut dispatcher = Self::new();

        let store = Arc::clone(&fixtures);
        dispatcher.register(METHOD_SESSION_STATS, move |envelope: &RpcEnvelope| {
            store.render(FixtureKind::Stats, &envelope.tag)
        });

        let store = fixtures;
        dispatcher.register(METHOD_TORRENT_GET, move |envelope: &RpcEnvelope| {
            let kind = if wants_recently_active(&envelope.arguments) {
                FixtureKind::RecentlyActive
            } else {
                FixtureKind::Torrents
            };
            store.render(kind, &envelope.tag)
        });

        dispatcher.register(METHOD_TEST_SEND_REQUEST, |envelope: &RpcEnvelope| {
            json!({
                "arguments": {"args": 0},
                "result": "success",
                "tag": envelope.tag,
            })
        });

        dispatcher
    }

    /// Register `handler` under `name`, replacing any previous handler.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&RpcEnvelope) -> Value + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// Replace the default handler.
    pub fn set_fallback<F>(&mut self, handler: F)
    where
        F: Fn(&RpcEnvelope) -> Value + Send + Sync + 'static,
    {
        self.fallback = Arc::new(handler);
    }

    /// Whether `name` has a dedicated handler.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Metrics/log label for the handler that will serve `envelope`.
    #[must_use]
    pub fn label_for<'a>(&self, envelope: &'a RpcEnvelope) -> &'a str {
        envelope
            .method_name()
            .filter(|name| self.is_registered(name))
            .unwrap_or(UNIMPLEMENTED_LABEL)
    }

    /// Run the handler selected by the envelope's method.
    #[must_use]
    pub fn dispatch(&self, envelope: &RpcEnvelope) -> Value {
        let handler = envelope
            .method_name()
            .and_then(|name| self.handlers.get(name))
            .unwrap_or(&self.fallback);
        (**handler)(envelope)
    }
}

fn wants_recently_active(arguments: &Value) -> bool {
    arguments.get("ids").and_then(Value::as_str) == Some(IDS_RECENTLY_ACTIVE)
}

/// Reply for bodies that could not be read as an envelope.
#[must_use]
pub fn no_method_name_response() -> Value {
    json!({"arguments": {}, "result": "no method name"})
}

/// Reply from the default handler.
#[must_use]
pub fn unimplemented_response() -> Value {
    json!({"arguments": {}, "result": UNIMPLEMENTED_LABEL})
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpcstub_fixtures::FixtureResult;

    fn envelope(method: Value, arguments: Value, tag: Value) -> RpcEnvelope {
        RpcEnvelope {
            method,
            arguments,
            tag,
        }
    }

    fn stock() -> FixtureResult<(Arc<FixtureStore>, MethodDispatcher)> {
        let store = Arc::new(FixtureStore::embedded()?);
        let dispatcher = MethodDispatcher::with_fixtures(Arc::clone(&store));
        Ok((store, dispatcher))
    }

    #[test]
    fn session_stats_echoes_tag() -> FixtureResult<()> {
        let (store, dispatcher) = stock()?;
        let reply = dispatcher.dispatch(&envelope(json!("session-stats"), json!({}), json!(42)));
        assert_eq!(reply["tag"], json!(42));
        assert_eq!(reply["arguments"], store.template(FixtureKind::Stats)["arguments"]);
        Ok(())
    }

    #[test]
    fn torrent_get_selects_fixture_by_ids() -> FixtureResult<()> {
        let (store, dispatcher) = stock()?;
        let all = dispatcher.dispatch(&envelope(json!("torrent-get"), json!({"ids": [1, 2]}), json!(1)));
        assert_eq!(all["arguments"], store.template(FixtureKind::Torrents)["arguments"]);

        let recent = dispatcher.dispatch(&envelope(
            json!("torrent-get"),
            json!({"ids": "recently-active"}),
            json!(2),
        ));
        assert_eq!(
            recent["arguments"],
            store.template(FixtureKind::RecentlyActive)["arguments"]
        );
        assert_eq!(recent["tag"], json!(2));

        let no_ids = dispatcher.dispatch(&envelope(json!("torrent-get"), json!(null), json!(3)));
        assert_eq!(no_ids["arguments"], store.template(FixtureKind::Torrents)["arguments"]);
        Ok(())
    }

    #[test]
    fn tags_do_not_leak_between_calls() -> FixtureResult<()> {
        let (store, dispatcher) = stock()?;
        let first = dispatcher.dispatch(&envelope(json!("session-stats"), json!({}), json!("a")));
        let second = dispatcher.dispatch(&envelope(json!("session-stats"), json!({}), json!("b")));
        assert_eq!(first["tag"], json!("a"));
        assert_eq!(second["tag"], json!("b"));
        assert_eq!(store.template(FixtureKind::Stats)["tag"], json!(0));
        Ok(())
    }

    #[test]
    fn test_send_request_is_canned() -> FixtureResult<()> {
        let (_, dispatcher) = stock()?;
        let reply = dispatcher.dispatch(&envelope(
            json!("test_send_request"),
            json!({}),
            json!(9),
        ));
        assert_eq!(
            reply,
            json!({"arguments": {"args": 0}, "result": "success", "tag": 9})
        );
        Ok(())
    }

    #[test]
    fn out_of_range_numeric_tags_are_echoed_verbatim() -> Result<(), Box<dyn std::error::Error>> {
        let (_, dispatcher) = stock()?;
        for raw in ["18446744073709551616", "-9223372036854775809", "0.1000000000000000000001"] {
            let tag: Value = serde_json::from_str(raw)?;
            let reply = dispatcher.dispatch(&envelope(json!("test_send_request"), json!({}), tag));
            assert_eq!(
                crate::rpc::to_wire_body(&reply),
                format!("{{\"arguments\": {{\"args\": 0}}, \"result\": \"success\", \"tag\": {raw}}}\n")
            );
        }
        Ok(())
    }

    #[test]
    fn unknown_and_non_string_methods_fall_through() -> FixtureResult<()> {
        let (_, dispatcher) = stock()?;
        for method in [json!("torrent-add"), json!(5), json!(null), json!(["session-stats"])] {
            let probe = envelope(method, json!({}), json!(1));
            assert_eq!(dispatcher.dispatch(&probe), unimplemented_response());
            assert_eq!(dispatcher.label_for(&probe), UNIMPLEMENTED_LABEL);
        }
        Ok(())
    }

    #[test]
    fn custom_handlers_and_fallback() {
        let mut dispatcher = MethodDispatcher::new();
        assert!(!dispatcher.is_registered("ping"));
        dispatcher.register("ping", |_: &RpcEnvelope| json!("pong"));
        dispatcher.set_fallback(|env: &RpcEnvelope| json!({"echo": env.method}));

        let ping = envelope(json!("ping"), json!({}), json!(0));
        assert_eq!(dispatcher.dispatch(&ping), json!("pong"));
        assert_eq!(dispatcher.label_for(&ping), "ping");
        assert_eq!(
            dispatcher.dispatch(&envelope(json!("other"), json!({}), json!(0))),
            json!({"echo": "other"})
        );
        assert!(format!("{dispatcher:?}").contains("ping"));
    }
}
