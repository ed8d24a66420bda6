//! Values stored in the script heap.

use indexmap::IndexMap;

use crate::handle::{Local, ValueHandle};

/// A value living in a heap slot.
///
/// Numbers keep the representation they were created with (`Int32`,
/// `Uint32` or `Number`) but are all the same script type; use
/// [`ScriptValue::as_number`] to read any of them.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptValue {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// Boolean value
    Bool(bool),
    /// Number created from a signed 32-bit integer
    Int32(i32),
    /// Number created from an unsigned 32-bit integer
    Uint32(u32),
    /// Double-precision number (including NaN and ±Infinity)
    Number(f64),
    /// Immutable string
    String(String),
    /// Dense array; empty locals are holes reading as `undefined`
    Array(Vec<Local>),
    /// Object with insertion-ordered properties
    Object(IndexMap<String, Local>),
}

impl ScriptValue {
    /// Get a human-readable name for this value's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Undefined => "undefined",
            ScriptValue::Null => "null",
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Int32(_) => "int32",
            ScriptValue::Uint32(_) => "uint32",
            ScriptValue::Number(_) => "number",
            ScriptValue::String(_) => "string",
            ScriptValue::Array(_) => "array",
            ScriptValue::Object(_) => "object",
        }
    }

    /// Check if this value is `undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, ScriptValue::Undefined)
    }

    /// Check if this value is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ScriptValue::Null)
    }

    /// Read any numeric representation as a double.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScriptValue::Int32(v) => Some(f64::from(*v)),
            ScriptValue::Uint32(v) => Some(f64::from(*v)),
            ScriptValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow the contents of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Slots referenced by an array or object.
    pub(crate) fn child_handles(&self) -> Vec<ValueHandle> {
        match self {
            ScriptValue::Array(items) => items.iter().filter_map(|l| l.handle()).collect(),
            ScriptValue::Object(props) => props.values().filter_map(|l| l.handle()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Render a number the way script code prints it.
///
/// Uses the shortest digit string that reads back to the same double. The
/// digits are laid out in plain decimal when the decimal exponent is in
/// `-7..21`, otherwise in exponent form (`1e+21`, `1.5e-10`). `-0` prints as
/// `0`; non-finite values print as `NaN`, `Infinity` and `-Infinity`.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    if value.is_infinite() {
        return format!("{sign}Infinity");
    }

    // `{:e}` yields the shortest round-trip digits as `d.ddde<exp>`.
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let exp_sign = if n - 1 < 0 { '-' } else { '+' };
        let exp = (n - 1).abs();
        match digits.split_at(1) {
            (first, "") => format!("{first}e{exp_sign}{exp}"),
            (first, rest) => format!("{first}.{rest}e{exp_sign}{exp}"),
        }
    };
    format!("{sign}{body}")
}
