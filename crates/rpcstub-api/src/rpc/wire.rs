//! JSON body encoding used on the wire.
//!
//! Bodies use `", "` between items and `": "` after keys, escape every
//! non-ASCII character as `\uXXXX` (surrogate pairs beyond the BMP) and end
//! with a single newline. Clients that compare bodies byte-for-byte depend on
//! this exact layout.

use std::io;

use serde::Serialize;
use serde_json::{Value, ser::Formatter};
use tracing::error;

#[derive(Debug, Clone, Copy, Default)]
struct WireFormatter;

impl Formatter for WireFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let bytes = fragment.as_bytes();
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&bytes[start..index])?;
            let mut units = [0_u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(&bytes[start..])
    }
}

/// Encode `value` as a response body, trailing newline included.
#[must_use]
pub fn to_wire_body(value: &Value) -> String {
    let mut buffer = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, WireFormatter);
    if let Err(err) = value.serialize(&mut serializer) {
        error!(error = %err, "failed to encode response body");
    }
    buffer.push(b'\n');
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn separators_use_single_spaces() {
        let body = to_wire_body(&json!({"arguments": {}, "result": "no method name"}));
        assert_eq!(body, "{\"arguments\": {}, \"result\": \"no method name\"}\n");
    }

    #[test]
    fn nested_arrays_and_objects() {
        let body = to_wire_body(&json!({"a": [1, 2, {"b": null}], "c": true}));
        assert_eq!(body, "{\"a\": [1, 2, {\"b\": null}], \"c\": true}\n");
    }

    #[test]
    fn empty_containers_stay_compact() {
        assert_eq!(to_wire_body(&json!([])), "[]\n");
        assert_eq!(to_wire_body(&json!({})), "{}\n");
    }

    #[test]
    fn non_ascii_is_escaped() {
        assert_eq!(to_wire_body(&json!("caf\u{e9}")), "\"caf\\u00e9\"\n");
        assert_eq!(
            to_wire_body(&json!("\u{1f600}!")),
            "\"\\ud83d\\ude00!\"\n"
        );
    }

    #[test]
    fn control_characters_keep_standard_escapes() {
        assert_eq!(to_wire_body(&json!("a\"b\n")), "\"a\\\"b\\n\"\n");
    }

    #[test]
    fn key_order_is_preserved() {
        let value: Value =
            serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).expect("valid json");
        assert_eq!(to_wire_body(&value), "{\"z\": 1, \"a\": 2, \"m\": 3}\n");
    }
}
