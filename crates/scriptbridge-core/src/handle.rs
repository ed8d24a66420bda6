//! Handles into the script heap.
//!
//! - [`ValueHandle`]: generational index of a heap slot
//! - [`Local`]: scope-bound, copyable, possibly empty reference
//! - [`Persistent`]: owning reference that outlives scopes and must be disposed

use std::fmt;

/// Generational index of a value slot in a [`ScriptHeap`](crate::ScriptHeap).
///
/// The generation prevents a handle from resolving to a different value after
/// its slot has been freed and reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueHandle {
    /// Index into the heap's slot vector
    pub index: u32,
    /// Generation the slot had when this handle was issued
    pub generation: u32,
}

impl ValueHandle {
    /// Create a new value handle.
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// A handle valid inside the local scope that produced it.
///
/// A `Local` can be empty. The empty local is the absent sentinel returned
/// when there is nothing to refer to, such as a lookup of an unregistered
/// native object. Inside arrays and objects an empty local reads as
/// `undefined`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Local(Option<ValueHandle>);

impl Local {
    /// The empty local.
    pub const EMPTY: Local = Local(None);

    pub(crate) fn from_handle(handle: ValueHandle) -> Self {
        Local(Some(handle))
    }

    /// The underlying slot handle, if any.
    pub fn handle(self) -> Option<ValueHandle> {
        self.0
    }

    /// Check if this local refers to nothing.
    pub fn is_empty(self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for Local {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(h) => write!(f, "Local({}v{})", h.index, h.generation),
            None => write!(f, "Local(<empty>)"),
        }
    }
}

/// A handle that keeps its value alive across local scopes.
///
/// Persistent handles hold a reference on their slot until they are passed to
/// [`ScriptHeap::dispose`](crate::ScriptHeap::dispose). Dropping one without
/// disposing it leaks the value for the lifetime of the heap.
#[must_use = "persistent handles must be released with ScriptHeap::dispose"]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Persistent(ValueHandle);

impl Persistent {
    pub(crate) fn new(handle: ValueHandle) -> Self {
        Persistent(handle)
    }

    pub(crate) fn into_handle(self) -> ValueHandle {
        self.0
    }

    /// The slot this handle keeps alive.
    pub fn handle(&self) -> ValueHandle {
        self.0
    }

    /// A local aliasing the same value.
    ///
    /// Creating the local does not add a reference; it stays valid while this
    /// handle is alive.
    pub fn local(&self) -> Local {
        Local::from_handle(self.0)
    }
}
