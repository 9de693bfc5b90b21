use bej_wire::RealValue;

use crate::decoder::{BejDecoder, Dictionaries, UnsupportedTypePolicy};
use crate::error::DecodeError;
use crate::sink::DecodeSink;

/// [`DecodeSink`] that accumulates a JSON text document.
///
/// Keeps one output buffer and one flag recording whether the previous
/// event was an annotation key: the annotation handler opens the
/// quoted key itself, and the annotated property's name is appended as
/// an `@`-suffix continuation without a fresh opening quote.
#[derive(Debug, Default)]
pub struct JsonSink {
    output: String,
    prev_annotated: bool,
}

impl JsonSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated JSON text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// Take the accumulated text, leaving the sink empty.
    #[must_use]
    pub fn into_string(self) -> String {
        self.output
    }

    /// Drop accumulated text and reset the annotation flag.
    pub fn clear(&mut self) {
        self.output.clear();
        self.prev_annotated = false;
    }

    /// Emit `"name":`, skipping the opening quote if the previous
    /// event already opened it (annotation continuation). Empty names
    /// emit nothing.
    fn push_name(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        if !self.prev_annotated {
            self.output.push('"');
        }
        push_escaped(&mut self.output, name);
        self.output.push_str("\":");
    }
}

/// Append `text` to `out` with JSON string escaping.
fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}

impl DecodeSink for JsonSink {
    fn set_start(&mut self, name: &str) {
        self.push_name(name);
        self.output.push('{');
        self.prev_annotated = false;
    }

    fn set_end(&mut self) {
        self.output.push('}');
    }

    fn array_start(&mut self, name: &str) {
        self.push_name(name);
        self.output.push('[');
        self.prev_annotated = false;
    }

    fn array_end(&mut self) {
        self.output.push(']');
    }

    fn property_separator(&mut self) {
        self.output.push(',');
    }

    fn annotation(&mut self, name: &str) {
        // Open the key but leave it unterminated; the annotated
        // value's name continues it.
        self.output.push('"');
        push_escaped(&mut self.output, name);
        self.prev_annotated = true;
    }

    fn null(&mut self, name: &str) {
        self.push_name(name);
        self.output.push_str("null");
        self.prev_annotated = false;
    }

    fn integer(&mut self, name: &str, value: i64) {
        self.push_name(name);
        self.output.push_str(&value.to_string());
        self.prev_annotated = false;
    }

    fn enum_value(&mut self, name: &str, literal: &str) {
        self.push_name(name);
        self.output.push('"');
        push_escaped(&mut self.output, literal);
        self.output.push('"');
        self.prev_annotated = false;
    }

    fn string(&mut self, name: &str, value: &str) {
        self.push_name(name);
        self.output.push('"');
        push_escaped(&mut self.output, value);
        self.output.push('"');
        self.prev_annotated = false;
    }

    fn real(&mut self, name: &str, value: &RealValue) {
        self.push_name(name);
        self.output.push_str(&value.whole.to_string());
        self.output.push('.');
        for _ in 0..value.leading_zeros {
            self.output.push('0');
        }
        self.output.push_str(&value.fract.to_string());
        if let Some(exp) = value.exp {
            self.output.push('e');
            self.output.push_str(&exp.to_string());
        }
        self.prev_annotated = false;
    }

    fn boolean(&mut self, name: &str, value: bool) {
        self.push_name(name);
        self.output.push_str(if value { "true" } else { "false" });
        self.prev_annotated = false;
    }
}

/// Convenience decoder producing JSON text directly.
///
/// Owns a [`JsonSink`]; each `decode` call clears the prior output
/// first, so reusing one instance across calls behaves like a fresh
/// one. On failure the output accessor still returns the
/// partially-decoded prefix, which is not guaranteed to be
/// well-formed JSON.
#[derive(Debug, Default)]
pub struct JsonDecoder {
    decoder: BejDecoder,
    sink: JsonSink,
}

impl JsonDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(policy: UnsupportedTypePolicy) -> Self {
        Self {
            decoder: BejDecoder::with_policy(policy),
            sink: JsonSink::new(),
        }
    }

    /// Decode a PLDM block to JSON text.
    ///
    /// # Errors
    ///
    /// Propagates every [`DecodeError`] from [`BejDecoder::decode`];
    /// the partial output remains retrievable via
    /// [`output`](Self::output).
    pub fn decode(
        &mut self,
        dictionaries: &Dictionaries<'_>,
        block: &[u8],
    ) -> Result<(), DecodeError> {
        self.sink.clear();
        self.decoder.decode(dictionaries, block, &mut self.sink)
    }

    /// The JSON text accumulated by the last `decode` call.
    #[must_use]
    pub fn output(&self) -> &str {
        self.sink.as_str()
    }
}
