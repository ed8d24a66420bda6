//! Script-side primitives for the scriptbridge conversion layer.
//!
//! This crate models the part of an embedded scripting runtime the bridge is
//! built on: an arena of script values addressed through generational handles,
//! local scopes that release intermediate values, persistent handles with
//! explicit disposal, and array/object construction.
//!
//! ## Key Types
//!
//! - [`ScriptHeap`]: value storage, scopes and reference counting
//! - [`Local`]: scope-bound handle, possibly empty
//! - [`Persistent`]: handle that must be disposed explicitly
//! - [`ScriptValue`]: the values a slot can hold
//! - [`FromScript`]: extraction of native values
//!
//! ## Example
//!
//! ```
//! use scriptbridge_core::{FromScript, ScriptHeap};
//!
//! let mut heap = ScriptHeap::new();
//! let array = heap.scoped(|heap| {
//!     let array = heap.new_array(0);
//!     let item = heap.int32(42);
//!     heap.push(array, item);
//!     array
//! });
//! assert_eq!(Vec::<i32>::from_script(&heap, array).unwrap(), vec![42]);
//! ```

mod error;
mod from_script;
mod handle;
mod heap;
mod value;

pub use error::ConversionError;
pub use from_script::FromScript;
pub use handle::{Local, Persistent, ValueHandle};
pub use heap::ScriptHeap;
pub use value::{ScriptValue, number_to_string};
