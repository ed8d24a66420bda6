//! Table layouts for the object registry.
//!
//! Two layouts with identical lookup behaviour:
//!
//! - [`PerTypeTables`]: one address-keyed table per native type
//! - [`GlobalTable`]: a single address-keyed table shared by all types, plus a
//!   set of addresses per type so draining one type does not scan the others
//!
//! [`DefaultStorage`] selects one for the whole process through the
//! `global-registry` feature.

use std::any::TypeId;

use rustc_hash::{FxHashMap, FxHashSet};
use scriptbridge_core::Persistent;

/// Storage backing an [`ObjectRegistry`](crate::ObjectRegistry).
///
/// Keys are a type id plus an object address.
pub trait RegistryStorage: Default {
    /// Insert a mapping, returning the handle it replaced.
    fn insert(&mut self, ty: TypeId, addr: usize, handle: Persistent) -> Option<Persistent>;

    /// Remove a mapping, returning its handle.
    fn remove(&mut self, ty: TypeId, addr: usize) -> Option<Persistent>;

    /// Look up a mapping.
    fn get(&self, ty: TypeId, addr: usize) -> Option<&Persistent>;

    /// Any address currently registered for `ty`.
    fn any_of(&self, ty: TypeId) -> Option<usize>;

    /// Number of entries registered for `ty`.
    fn count_of(&self, ty: TypeId) -> usize;

    /// Number of entries across all types.
    fn len(&self) -> usize;

    /// Check if no entries are registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(not(feature = "global-registry"))]
pub type DefaultStorage = PerTypeTables;

#[cfg(feature = "global-registry")]
pub type DefaultStorage = GlobalTable;

// ============================================================================
// Per-type tables
// ============================================================================

/// One table per native type.
///
/// Tables are created on first registration of their type and kept when they
/// become empty.
#[derive(Default)]
pub struct PerTypeTables {
    tables: FxHashMap<TypeId, FxHashMap<usize, Persistent>>,
}

impl RegistryStorage for PerTypeTables {
    fn insert(&mut self, ty: TypeId, addr: usize, handle: Persistent) -> Option<Persistent> {
        self.tables.entry(ty).or_default().insert(addr, handle)
    }

    fn remove(&mut self, ty: TypeId, addr: usize) -> Option<Persistent> {
        self.tables.get_mut(&ty)?.remove(&addr)
    }

    fn get(&self, ty: TypeId, addr: usize) -> Option<&Persistent> {
        self.tables.get(&ty)?.get(&addr)
    }

    fn any_of(&self, ty: TypeId) -> Option<usize> {
        self.tables.get(&ty)?.keys().next().copied()
    }

    fn count_of(&self, ty: TypeId) -> usize {
        self.tables.get(&ty).map_or(0, FxHashMap::len)
    }

    fn len(&self) -> usize {
        self.tables.values().map(FxHashMap::len).sum()
    }
}

// ============================================================================
// Global table
// ============================================================================

/// A single address-keyed table for every type.
///
/// The main table knows addresses only, so two live objects of different
/// types at the same address (a struct and its first field, say) share one
/// entry: registering the second replaces the first. The per-type address
/// sets keep lookups and removals scoped to the requested type.
#[derive(Default)]
pub struct GlobalTable {
    items: FxHashMap<usize, Persistent>,
    instances: FxHashMap<TypeId, FxHashSet<usize>>,
}

impl GlobalTable {
    fn is_instance(&self, ty: TypeId, addr: usize) -> bool {
        self.instances
            .get(&ty)
            .is_some_and(|set| set.contains(&addr))
    }
}

impl RegistryStorage for GlobalTable {
    fn insert(&mut self, ty: TypeId, addr: usize, handle: Persistent) -> Option<Persistent> {
        self.instances.entry(ty).or_default().insert(addr);
        self.items.insert(addr, handle)
    }

    fn remove(&mut self, ty: TypeId, addr: usize) -> Option<Persistent> {
        // the address leaves the type's set even when the shared entry is
        // gone, so draining a type always terminates
        let was_instance = self
            .instances
            .get_mut(&ty)
            .is_some_and(|set| set.remove(&addr));
        if was_instance {
            self.items.remove(&addr)
        } else {
            None
        }
    }

    fn get(&self, ty: TypeId, addr: usize) -> Option<&Persistent> {
        if self.is_instance(ty, addr) {
            self.items.get(&addr)
        } else {
            None
        }
    }

    fn any_of(&self, ty: TypeId) -> Option<usize> {
        self.instances.get(&ty)?.iter().next().copied()
    }

    fn count_of(&self, ty: TypeId) -> usize {
        self.instances.get(&ty).map_or(0, FxHashSet::len)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
