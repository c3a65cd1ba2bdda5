//! RPC envelope handling independent of the HTTP transport.

pub mod dispatch;
pub mod envelope;
pub mod wire;

pub use dispatch::{MethodDispatcher, MethodHandler};
pub use envelope::{EnvelopeOutcome, RpcEnvelope, parse_envelope};
pub use wire::to_wire_body;
