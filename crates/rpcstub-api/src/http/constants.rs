//! Shared HTTP constants (paths, headers, canned bodies).

/// Path of the RPC endpoint.
pub const RPC_PATH: &str = "/transmission/rpc";
/// Unauthenticated reachability probe.
pub const CONNECT_TEST_PATH: &str = "/test_connection";

/// Session-token header, lower-cased as stored by `http::HeaderName`.
pub const HEADER_SESSION_ID: &str = "x-transmission-session-id";

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";
pub(crate) const CONTENT_TYPE_PLAIN: &str = "text/plain";
pub(crate) const CONTENT_TYPE_HTML: &str = "text/html; charset=ISO-8859-1";

pub(crate) const CONNECT_TEST_BODY: &str = "OK";
pub(crate) const BAD_AUTH_BODY: &str = "<h1>401: Unauthorized</h1>Unauthorized User";
pub(crate) const BAD_REQUEST_BODY: &str = "<h1>405: Method Not Allowed</h1>";
pub(crate) const BAD_SESSION_BODY: &str = "<h1>Bad X-Transmission-Session-Id</h1>";
