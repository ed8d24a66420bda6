//! Native object registry for scriptbridge.
//!
//! Maps the identity of a native instance to the persistent script handle
//! created for it, so every conversion of that instance yields the same
//! script object.

mod identity;
mod registry;
mod storage;

pub use identity::{NativeId, class_name};
pub use registry::ObjectRegistry;
pub use storage::{DefaultStorage, GlobalTable, PerTypeTables, RegistryStorage};
