//! Conversion of native Rust values into script values, and the registry
//! that gives native objects a stable script identity.
//!
//! ## Overview
//!
//! - [`ToScript`] and [`Converter`]: statically dispatched conversion of
//!   primitives, strings, enums, class instances, sequences and ordered maps
//! - [`ObjectRegistry`]: native object identity to persistent script handle
//! - [`ScriptHeap`]: the script-side value space conversions allocate in
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use scriptbridge::{Converter, FromScript, ObjectRegistry, ScriptHeap};
//!
//! let mut heap = ScriptHeap::new();
//! let registry: ObjectRegistry = ObjectRegistry::new();
//! let mut cx = Converter::new(&mut heap, &registry);
//!
//! let mut scores = BTreeMap::new();
//! scores.insert("alice", 3);
//! scores.insert("bob", 5);
//! let object = cx.convert(&scores);
//!
//! let heap = cx.heap();
//! assert_eq!(heap.property_names(object), vec!["alice", "bob"]);
//! let bob = heap.get_property(object, "bob");
//! assert_eq!(i32::from_script(heap, bob).unwrap(), 5);
//! ```
//!
//! ## Features
//!
//! - `global-registry`: one address table shared by all native types instead
//!   of a table per type
//! - `profiling`: instrument collection conversions with `profiling`

pub mod convert;
mod macros;
pub mod sequence;

pub use convert::{Converter, NativeClass, ToScript, WideStr};

pub use scriptbridge_core::{
    ConversionError, FromScript, Local, Persistent, ScriptHeap, ScriptValue, ValueHandle,
};
pub use scriptbridge_registry::{
    DefaultStorage, GlobalTable, NativeId, ObjectRegistry, PerTypeTables, RegistryStorage,
};
