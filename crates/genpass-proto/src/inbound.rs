//! Multiplexed inbound messages.
//!
//! The bookmarklet may pack several keys into one flat object. Each key is
//! decoded into its own [`InboundField`] so the receiver can dispatch them
//! independently. Keys the page does not know are kept as
//! [`InboundField::Unknown`] and must be ignored by the receiver, which keeps
//! newer bookmarklets compatible with older pages.

use serde_json::Value;

use crate::errors::ProtoError;

/// Most recent bookmarklet build stamp this page knows about.
///
/// A bookmarklet announcing an older `version` is offered an update.
pub const LATEST_VERSION: u64 = 20_140_531;

/// One key of an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundField {
    /// Bookmarklet build stamp.
    ///
    /// Coerced the way a browser coerces the operand of `<`: `null` is 0,
    /// booleans are 0 or 1, strings and arrays go through their string
    /// form. Anything unparseable becomes `NaN`, which never compares as
    /// stale.
    Version(f64),

    /// Key this page does not understand.
    Unknown(String),
}

impl InboundField {
    fn from_entry(key: String, value: &Value) -> Self {
        match key.as_str() {
            "version" => Self::Version(numeric(value)),
            _ => Self::Unknown(key),
        }
    }

    /// Returns true if this is a version older than [`LATEST_VERSION`].
    pub fn is_stale_version(&self) -> bool {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Version(version) => *version < LATEST_VERSION as f64,
            Self::Unknown(_) => false,
        }
    }
}

/// Decoded inbound message: every key of the flat object, sorted by key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InboundMessage {
    /// Decoded fields.
    pub fields: Vec<InboundField>,
}

impl InboundMessage {
    /// Decode a wire string.
    ///
    /// # Errors
    ///
    /// - [`ProtoError::Malformed`] if the payload is not JSON
    /// - [`ProtoError::NotAnObject`] if it is JSON but not an object
    pub fn decode(data: &str) -> Result<Self, ProtoError> {
        let value: Value = serde_json::from_str(data)
            .map_err(|e| ProtoError::Malformed { reason: e.to_string() })?;

        let Value::Object(map) = value else {
            return Err(ProtoError::NotAnObject { found: kind(&value) });
        };

        let fields =
            map.into_iter().map(|(key, value)| InboundField::from_entry(key, &value)).collect();

        Ok(Self { fields })
    }

    /// Iterate over the recognized fields only.
    pub fn known(&self) -> impl Iterator<Item = &InboundField> {
        self.fields.iter().filter(|field| !matches!(field, InboundField::Unknown(_)))
    }
}

fn numeric(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(items) => string_to_number(&join(items)),
        Value::Object(_) => f64::NAN,
    }
}

/// String form of an array, as `Array.prototype.join` builds it.
fn join(items: &[Value]) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(inner) => join(inner),
            Value::Object(_) => "[object Object]".to_string(),
        })
        .collect();
    parts.join(",")
}

/// Numeric value of a string: blank is 0, then decimal, signed `Infinity`
/// or an unsigned `0x`/`0o`/`0b` integer.
fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {},
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return radix_integer(digits, radix);
        }
    }

    // Rust also accepts `inf` and `nan` spellings; the browser doesn't.
    if !trimmed.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn radix_integer(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc.mul_add(f64::from(radix), f64::from(d)))
        })
        .unwrap_or(f64::NAN)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
