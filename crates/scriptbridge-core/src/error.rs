//! Error types for reading script values back into native values.

use thiserror::Error;

/// Errors that occur while extracting a native value from a script value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The value has a different kind than the target type accepts.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The number is integral but out of range for the target type.
    #[error("integer overflow: {value} does not fit in {target_type}")]
    IntegerOverflow {
        value: f64,
        target_type: &'static str,
    },

    /// The number has a fractional part or is not finite.
    #[error("{value} is not an integer and cannot become {target_type}")]
    NotAnInteger {
        value: f64,
        target_type: &'static str,
    },

    /// The local was empty.
    #[error("empty handle")]
    EmptyHandle,

    /// The local refers to a value that has been freed.
    #[error("stale handle: value has been freed")]
    StaleHandle,

    /// An array element failed to convert.
    #[error("element {index}: {source}")]
    Element {
        index: u32,
        #[source]
        source: Box<ConversionError>,
    },
}
