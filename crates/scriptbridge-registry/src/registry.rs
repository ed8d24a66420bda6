//! ObjectRegistry - native object to persistent handle table.
//!
//! This module provides [`ObjectRegistry`], which remembers the script-side
//! value created for each native instance exposed to script, so converting the
//! same instance again yields the same script object instead of a copy.
//!
//! # Lifecycle
//!
//! - **Exposure**: the class wrapper creates the script object, persists it
//!   and calls [`add`](ObjectRegistry::add).
//! - **Lookup**: conversions call [`find`](ObjectRegistry::find); misses yield
//!   the empty local.
//! - **End of exposure**: [`remove_with`](ObjectRegistry::remove_with)
//!   disposes the handle, then runs the destroy callback.
//! - **Teardown**: [`remove_all_with`](ObjectRegistry::remove_all_with)
//!   drains one type before shutdown.
//!
//! # Thread Safety
//!
//! The registry is plain owned data mutated through `&mut`. It belongs to the
//! thread that owns the script heap; the embedder must not share it.
//!
//! # Example
//!
//! ```
//! use scriptbridge_core::ScriptHeap;
//! use scriptbridge_registry::{NativeId, ObjectRegistry};
//!
//! struct Point { x: f64, y: f64 }
//!
//! let mut heap = ScriptHeap::new();
//! let mut registry: ObjectRegistry = ObjectRegistry::new();
//!
//! let point = Point { x: 1.0, y: 2.0 };
//! let object = heap.new_object();
//! let handle = heap.persist(object).unwrap();
//! let _ = registry.add(NativeId::of(&point), handle);
//!
//! assert_eq!(registry.find(NativeId::of(&point)), object);
//! assert!(registry.remove(&mut heap, NativeId::of(&point)));
//! assert!(registry.find(NativeId::of(&point)).is_empty());
//! ```

use std::any::TypeId;

use scriptbridge_core::{Local, Persistent, ScriptHeap};

use crate::identity::{NativeId, class_name};
use crate::storage::{DefaultStorage, RegistryStorage};

/// Identity table from native objects to persistent script handles.
///
/// The registry never owns native objects: it stores their addresses, and the
/// destroy callbacks passed to the removal methods are how the owner learns
/// that an instance's exposure has ended.
pub struct ObjectRegistry<S: RegistryStorage = DefaultStorage> {
    storage: S,
}

impl<S: RegistryStorage> ObjectRegistry<S> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            storage: S::default(),
        }
    }

    /// Register the script handle of a native object.
    ///
    /// Registering an object that is already registered replaces its handle.
    /// The replaced handle is returned undisposed; the caller decides whether
    /// it is still referenced elsewhere.
    pub fn add<T: 'static>(
        &mut self,
        object: NativeId<T>,
        handle: Persistent,
    ) -> Option<Persistent> {
        let previous = self
            .storage
            .insert(TypeId::of::<T>(), object.addr(), handle);
        if previous.is_some() {
            tracing::warn!(
                class = class_name::<T>(),
                addr = object.addr(),
                "native object registered twice, previous handle returned to caller"
            );
        } else {
            tracing::trace!(class = class_name::<T>(), addr = object.addr(), "registered");
        }
        previous
    }

    /// Unregister a native object and dispose its handle.
    ///
    /// Returns false, doing nothing, if the object was not registered.
    pub fn remove<T: 'static>(&mut self, heap: &mut ScriptHeap, object: NativeId<T>) -> bool {
        self.remove_with(heap, object, |_, _| {})
    }

    /// Unregister a native object, dispose its handle, then call `destroy`.
    ///
    /// The handle is released before `destroy` runs; the callback receives the
    /// heap so it can release other script values tied to the object. Returns
    /// false, without calling `destroy`, if the object was not registered.
    pub fn remove_with<T, D>(
        &mut self,
        heap: &mut ScriptHeap,
        object: NativeId<T>,
        destroy: D,
    ) -> bool
    where
        T: 'static,
        D: FnOnce(NativeId<T>, &mut ScriptHeap),
    {
        let Some(handle) = self.storage.remove(TypeId::of::<T>(), object.addr()) else {
            return false;
        };
        heap.dispose(handle);
        tracing::trace!(class = class_name::<T>(), addr = object.addr(), "unregistered");
        destroy(object, heap);
        true
    }

    /// Unregister every object of type `T`. Returns how many were removed.
    pub fn remove_all<T: 'static>(&mut self, heap: &mut ScriptHeap) -> usize {
        self.remove_all_with::<T, _>(heap, |_, _| {})
    }

    /// Unregister every object of type `T`, calling `destroy` for each after
    /// its handle is disposed.
    ///
    /// Entries are taken one at a time in unspecified order and the table is
    /// consulted afresh after every callback.
    pub fn remove_all_with<T, D>(&mut self, heap: &mut ScriptHeap, mut destroy: D) -> usize
    where
        T: 'static,
        D: FnMut(NativeId<T>, &mut ScriptHeap),
    {
        let ty = TypeId::of::<T>();
        let mut removed = 0;
        while let Some(addr) = self.storage.any_of(ty) {
            if self.remove_with(heap, NativeId::<T>::from_addr(addr), &mut destroy) {
                removed += 1;
            }
        }
        tracing::debug!(class = class_name::<T>(), removed, "removed all instances");
        removed
    }

    /// The script handle registered for `object`, or the empty local.
    pub fn find<T: 'static>(&self, object: NativeId<T>) -> Local {
        self.storage
            .get(TypeId::of::<T>(), object.addr())
            .map_or(Local::EMPTY, Persistent::local)
    }

    /// Check if `object` is registered.
    pub fn contains<T: 'static>(&self, object: NativeId<T>) -> bool {
        self.storage
            .get(TypeId::of::<T>(), object.addr())
            .is_some()
    }

    /// Number of registered objects of type `T`.
    pub fn len_of<T: 'static>(&self) -> usize {
        self.storage.count_of(TypeId::of::<T>())
    }

    /// Number of registered objects across all types.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl<S: RegistryStorage> Default for ObjectRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RegistryStorage> Drop for ObjectRegistry<S> {
    fn drop(&mut self) {
        if !self.storage.is_empty() {
            tracing::warn!(
                entries = self.storage.len(),
                "object registry dropped with registered objects, their handles leak"
            );
        }
    }
}

impl<S: RegistryStorage> std::fmt::Debug for ObjectRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRegistry")
            .field("len", &self.storage.len())
            .finish()
    }
}
