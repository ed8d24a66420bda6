//! Native object identity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Name of a native type as it appears in diagnostics, without its module
/// path.
pub fn class_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// The identity of one live native instance: its address and static type.
///
/// A `NativeId` is never dereferenced. It stays meaningful only while the
/// instance it was taken from is alive and not moved; the owner of the
/// instance is responsible for removing it from the registry before either
/// happens. Instances of zero-sized types may share an address and are
/// indistinguishable.
pub struct NativeId<T: ?Sized> {
    addr: usize,
    _marker: PhantomData<fn() -> *const T>,
}

impl<T> NativeId<T> {
    /// Identity of `object`.
    pub fn of(object: &T) -> Self {
        Self::from_addr(object as *const T as usize)
    }

    /// Rebuild an identity from a previously observed address.
    pub fn from_addr(addr: usize) -> Self {
        Self {
            addr,
            _marker: PhantomData,
        }
    }

    /// The address this identity was taken from.
    pub fn addr(self) -> usize {
        self.addr
    }
}

impl<T: ?Sized> Clone for NativeId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for NativeId<T> {}

impl<T: ?Sized> PartialEq for NativeId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr
    }
}

impl<T: ?Sized> Eq for NativeId<T> {}

impl<T: ?Sized> Hash for NativeId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for NativeId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeId<{}>({:#x})", class_name::<T>(), self.addr)
    }
}
