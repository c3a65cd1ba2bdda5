//! Request envelope parsing.

use serde_json::{Map, Value};

const FIELD_METHOD: &str = "method";
const FIELD_ARGUMENTS: &str = "arguments";
const FIELD_TAG: &str = "tag";

/// A request object carrying all three required members.
///
/// Members keep their raw JSON form; `method` is not required to be a string.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcEnvelope {
    /// Requested method.
    pub method: Value,
    /// Method arguments; only some handlers look at them.
    pub arguments: Value,
    /// Client correlation value, echoed back by fixture-backed methods.
    pub tag: Value,
}

impl RpcEnvelope {
    /// Method name when `method` is a JSON string.
    #[must_use]
    pub fn method_name(&self) -> Option<&str> {
        self.method.as_str()
    }
}

/// Classification of a request body.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeOutcome {
    /// Body was a usable envelope.
    Parsed(RpcEnvelope),
    /// Body was not JSON, or was a falsy JSON value.
    Unparsable,
    /// Body was JSON but lacked `method`, `arguments` or `tag`.
    MissingFields,
}

/// Classify a raw request body.
///
/// Falsy documents (`null`, `false`, `0`, `""`, `[]`, `{}`) count as
/// unparsable. Any other non-object document counts as missing fields.
#[must_use]
pub fn parse_envelope(body: &[u8]) -> EnvelopeOutcome {
    let Ok(document) = serde_json::from_slice::<Value>(body) else {
        return EnvelopeOutcome::Unparsable;
    };
    if !is_truthy(&document) {
        return EnvelopeOutcome::Unparsable;
    }
    let Value::Object(mut members) = document else {
        return EnvelopeOutcome::MissingFields;
    };
    match take_fields(&mut members) {
        Some(envelope) => EnvelopeOutcome::Parsed(envelope),
        None => EnvelopeOutcome::MissingFields,
    }
}

fn take_fields(members: &mut Map<String, Value>) -> Option<RpcEnvelope> {
    if !(members.contains_key(FIELD_METHOD)
        && members.contains_key(FIELD_ARGUMENTS)
        && members.contains_key(FIELD_TAG))
    {
        return None;
    }
    Some(RpcEnvelope {
        method: members.remove(FIELD_METHOD)?,
        arguments: members.remove(FIELD_ARGUMENTS)?,
        tag: members.remove(FIELD_TAG)?,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => !is_zero(number),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(members) => !members.is_empty(),
    }
}

fn is_zero(number: &serde_json::Number) -> bool {
    number.as_f64().is_some_and(|value| value == 0.0)
}
