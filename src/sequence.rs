//! Conversion of collections into arrays and objects.
//!
//! - Countable sequences (length known before traversal) become a pre-sized
//!   array with element `i` stored at index `i`
//! - Other sequences become an array grown by one append per element
//! - Ordered maps become an object with one property per entry, named after
//!   the converted key; when two keys name the same property the later entry
//!   wins
//!
//! Every collection conversion runs in its own local scope, so element values
//! that are not stored anywhere are released when it returns.
//!
//! Unordered maps have no rule, since their property order would depend on
//! hashing:
//!
//! ```compile_fail
//! use std::collections::HashMap;
//! use scriptbridge::{Converter, ObjectRegistry, ScriptHeap};
//!
//! let mut heap = ScriptHeap::new();
//! let registry: ObjectRegistry = ObjectRegistry::new();
//! let mut cx = Converter::new(&mut heap, &registry);
//! let map: HashMap<String, i32> = HashMap::new();
//! cx.convert(&map);
//! ```

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use scriptbridge_core::Local;
use scriptbridge_registry::RegistryStorage;

use crate::convert::{Converter, ToScript};

impl<S: RegistryStorage> Converter<'_, S> {
    /// Convert a sequence whose length is known up front into a pre-sized
    /// array.
    ///
    /// Arrays hold at most `u32::MAX` elements; further items are not
    /// visited and a warning is logged.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn convert_exact_iter<I>(&mut self, items: I) -> Local
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: ToScript,
    {
        let items = items.into_iter();
        self.scoped(|cx| {
            let len = array_capacity(items.len());
            let array = cx.heap().new_array(len);
            for (index, item) in (0..len).zip(items) {
                let value = item.to_script(cx);
                let stored = cx.heap().set_index(array, index, value);
                debug_assert!(stored, "fresh array rejected element {index}");
            }
            array
        })
    }

    /// Convert a sequence of unknown length into an array, appending one
    /// element per step.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn convert_iter<I>(&mut self, items: I) -> Local
    where
        I: IntoIterator,
        I::Item: ToScript,
    {
        self.scoped(|cx| {
            let array = cx.heap().new_array(0);
            for item in items {
                let value = item.to_script(cx);
                let stored = cx.heap().push(array, value);
                debug_assert!(stored, "fresh array rejected an element");
            }
            array
        })
    }

    /// Convert key/value pairs, visited in the order given, into an object.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn convert_entries<'v, K, V, I>(&mut self, entries: I) -> Local
    where
        K: ToScript + ?Sized + 'v,
        V: ToScript + ?Sized + 'v,
        I: IntoIterator<Item = (&'v K, &'v V)>,
    {
        self.scoped(|cx| {
            let object = cx.heap().new_object();
            for (key, value) in entries {
                let key = key.to_script(cx);
                let name = cx.heap().property_key(key);
                let value = value.to_script(cx);
                let stored = cx.heap().set_property(object, &name, value);
                debug_assert!(stored, "fresh object rejected property {name}");
            }
            object
        })
    }
}

/// Clamp a sequence length to the largest array the heap can hold.
fn array_capacity(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| {
        tracing::warn!(
            len,
            max = u32::MAX,
            "sequence longer than the array limit, trailing elements dropped"
        );
        u32::MAX
    })
}

impl<T: ToScript> ToScript for [T] {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.convert_exact_iter(self)
    }
}

impl<T: ToScript, const N: usize> ToScript for [T; N] {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.convert_exact_iter(self)
    }
}

impl<T: ToScript> ToScript for Vec<T> {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.convert_exact_iter(self)
    }
}

impl<T: ToScript> ToScript for VecDeque<T> {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.convert_exact_iter(self)
    }
}

impl<T: ToScript> ToScript for BTreeSet<T> {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.convert_exact_iter(self)
    }
}

impl<K: ToScript, V: ToScript> ToScript for BTreeMap<K, V> {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.convert_entries(self)
    }
}
