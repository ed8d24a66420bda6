//! Extraction of native values from script values.
//!
//! [`FromScript`] is the read direction of the bridge. It is used by argument
//! marshalling and to check that converted values round-trip.
//!
//! ## Supported Types
//!
//! - Integers: `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`, with
//!   range checking; any integral number is accepted
//! - Floats: `f32`, `f64`
//! - Boolean: `bool`
//! - `String`
//! - `Vec<T>` from arrays, holes read as errors

use crate::error::ConversionError;
use crate::handle::Local;
use crate::heap::ScriptHeap;
use crate::value::ScriptValue;

/// Extract a native value from a script value.
pub trait FromScript: Sized {
    /// Extract a value from the given local.
    ///
    /// Returns a `ConversionError` if the value is missing or has an
    /// incompatible kind or range.
    fn from_script(heap: &ScriptHeap, value: Local) -> Result<Self, ConversionError>;
}

fn resolve(heap: &ScriptHeap, value: Local) -> Result<&ScriptValue, ConversionError> {
    if value.is_empty() {
        return Err(ConversionError::EmptyHandle);
    }
    heap.get(value).ok_or(ConversionError::StaleHandle)
}

fn number(heap: &ScriptHeap, value: Local) -> Result<f64, ConversionError> {
    let resolved = resolve(heap, value)?;
    resolved.as_number().ok_or(ConversionError::TypeMismatch {
        expected: "number",
        actual: resolved.type_name(),
    })
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_from_script_int {
    ($($ty:ty),*) => {
        $(
            impl FromScript for $ty {
                fn from_script(heap: &ScriptHeap, value: Local) -> Result<Self, ConversionError> {
                    let v = number(heap, value)?;
                    if !v.is_finite() || v.fract() != 0.0 {
                        return Err(ConversionError::NotAnInteger {
                            value: v,
                            target_type: stringify!($ty),
                        });
                    }
                    // 64-bit bounds round up to 2^63 / 2^64 as doubles; `as`
                    // saturates for the single value that slips through
                    if v >= Self::MIN as f64 && v <= Self::MAX as f64 {
                        Ok(v as Self)
                    } else {
                        Err(ConversionError::IntegerOverflow {
                            value: v,
                            target_type: stringify!($ty),
                        })
                    }
                }
            }
        )*
    };
}

impl_from_script_int!(i8, i16, i32, i64, u8, u16, u32, u64);

// ============================================================================
// Float implementations
// ============================================================================

impl FromScript for f64 {
    fn from_script(heap: &ScriptHeap, value: Local) -> Result<Self, ConversionError> {
        number(heap, value)
    }
}

impl FromScript for f32 {
    fn from_script(heap: &ScriptHeap, value: Local) -> Result<Self, ConversionError> {
        number(heap, value).map(|v| v as f32)
    }
}

// ============================================================================
// Other scalars
// ============================================================================

impl FromScript for bool {
    fn from_script(heap: &ScriptHeap, value: Local) -> Result<Self, ConversionError> {
        match resolve(heap, value)? {
            ScriptValue::Bool(v) => Ok(*v),
            other => Err(ConversionError::TypeMismatch {
                expected: "boolean",
                actual: other.type_name(),
            }),
        }
    }
}

impl FromScript for String {
    fn from_script(heap: &ScriptHeap, value: Local) -> Result<Self, ConversionError> {
        match resolve(heap, value)? {
            ScriptValue::String(s) => Ok(s.clone()),
            other => Err(ConversionError::TypeMismatch {
                expected: "string",
                actual: other.type_name(),
            }),
        }
    }
}

impl<T: FromScript> FromScript for Vec<T> {
    fn from_script(heap: &ScriptHeap, value: Local) -> Result<Self, ConversionError> {
        let items = match resolve(heap, value)? {
            ScriptValue::Array(items) => items,
            other => {
                return Err(ConversionError::TypeMismatch {
                    expected: "array",
                    actual: other.type_name(),
                });
            }
        };
        items
            .iter()
            .enumerate()
            .map(|(index, &item)| {
                T::from_script(heap, item).map_err(|source| ConversionError::Element {
                    index: index as u32,
                    source: Box::new(source),
                })
            })
            .collect()
    }
}
