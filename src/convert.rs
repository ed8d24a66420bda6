//! Conversion of native values into script values.
//!
//! [`ToScript`] selects a conversion rule from the static type of the value.
//! There is no runtime fallback: a type without a rule does not compile.
//!
//! ## Rules
//!
//! - Script handles (`Local`, `Persistent`): returned unchanged
//! - Strings (`str`, `String`, `CStr`, [`WideStr`]): new script string; a
//!   null C or wide string (`None`) becomes the empty string
//! - `i8`, `i16`, `i32`, `u8`, `u16`, `u32`: exact 32-bit number
//! - `i64`, `u64`, `isize`, `usize`: double, precision lost above 2^53
//! - `f32`, `f64`: double, NaN and ±Infinity preserved
//! - `bool`: boolean
//! - Enums declared with [`script_enum!`](crate::script_enum): their ordinal
//! - Classes declared with [`native_class!`](crate::native_class): the
//!   registered script object, or the empty local if unregistered
//! - References: the pointee's rule
//! - Sequences and ordered maps: see [`sequence`](crate::sequence)
//!
//! A value with no rule is rejected at build time:
//!
//! ```compile_fail
//! use scriptbridge::{Converter, ObjectRegistry, ScriptHeap};
//!
//! struct NotExposed;
//!
//! let mut heap = ScriptHeap::new();
//! let registry: ObjectRegistry = ObjectRegistry::new();
//! let mut cx = Converter::new(&mut heap, &registry);
//! cx.convert(&NotExposed);
//! ```

use std::ffi::CStr;

use scriptbridge_core::{Local, Persistent, ScriptHeap};
use scriptbridge_registry::{DefaultStorage, NativeId, ObjectRegistry, RegistryStorage};

/// Convert a native value into a script value.
pub trait ToScript {
    /// Produce the script value for `self`, allocated in the converter's heap.
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local;
}

/// Native types whose instances are exposed to script by reference.
///
/// Implemented through [`native_class!`](crate::native_class). Converting an
/// instance, or a `Some` reference to one, yields the script object the
/// registry holds for it; `None` and unregistered instances yield the empty
/// local.
pub trait NativeClass: 'static {}

/// Conversion context: the heap values are allocated in and the registry
/// class instances are looked up in.
pub struct Converter<'a, S: RegistryStorage = DefaultStorage> {
    heap: &'a mut ScriptHeap,
    registry: &'a ObjectRegistry<S>,
}

impl<'a, S: RegistryStorage> Converter<'a, S> {
    /// Create a converter over a heap and a registry.
    pub fn new(heap: &'a mut ScriptHeap, registry: &'a ObjectRegistry<S>) -> Self {
        Self { heap, registry }
    }

    /// Convert `value` with the rule selected by its type.
    pub fn convert<T: ToScript + ?Sized>(&mut self, value: &T) -> Local {
        value.to_script(self)
    }

    /// The heap values are allocated in.
    pub fn heap(&mut self) -> &mut ScriptHeap {
        &mut *self.heap
    }

    /// The registry class instances are looked up in.
    pub fn registry(&self) -> &ObjectRegistry<S> {
        self.registry
    }

    /// The registered script object of a class instance, or the empty local.
    pub fn find<T: NativeClass>(&self, object: &T) -> Local {
        self.registry.find(NativeId::of(object))
    }

    /// The script number for an enum's ordinal.
    pub fn enum_value<E: Copy + Into<i32>>(&mut self, value: E) -> Local {
        self.heap.int32(value.into())
    }

    /// Run `f` in a new local scope; only its result escapes.
    ///
    /// Values converted at the top level belong to the heap's root scope and
    /// live as long as the heap. Converting inside `scoped` releases every
    /// intermediate that is not returned or persisted.
    ///
    /// ```
    /// use scriptbridge::{Converter, Local, ObjectRegistry, ScriptHeap};
    ///
    /// let mut heap = ScriptHeap::new();
    /// let registry: ObjectRegistry = ObjectRegistry::new();
    /// let mut cx = Converter::new(&mut heap, &registry);
    ///
    /// cx.scoped(|cx| {
    ///     cx.convert(&vec!["scratch", "values"]);
    ///     Local::EMPTY
    /// });
    /// assert_eq!(cx.heap().live_count(), 0);
    /// ```
    pub fn scoped<F>(&mut self, f: F) -> Local
    where
        F: FnOnce(&mut Converter<'_, S>) -> Local,
    {
        let registry = self.registry;
        self.heap.scoped(|heap| f(&mut Converter { heap, registry }))
    }
}

// ============================================================================
// References and handles
// ============================================================================

impl<T: ToScript + ?Sized> ToScript for &T {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        (**self).to_script(cx)
    }
}

impl ToScript for Local {
    fn to_script<S: RegistryStorage>(&self, _cx: &mut Converter<'_, S>) -> Local {
        *self
    }
}

impl ToScript for Persistent {
    fn to_script<S: RegistryStorage>(&self, _cx: &mut Converter<'_, S>) -> Local {
        self.local()
    }
}

// ============================================================================
// Native classes
// ============================================================================

impl<T: NativeClass> ToScript for Option<&T> {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        match self {
            Some(object) => cx.find(*object),
            None => Local::EMPTY,
        }
    }
}

// ============================================================================
// Strings
// ============================================================================

/// A UTF-16 string, such as one received from a wide-character API.
///
/// Unpaired surrogates are replaced with U+FFFD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WideStr<'a>(pub &'a [u16]);

impl ToScript for str {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.heap.string(self)
    }
}

impl ToScript for String {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.heap.string(self)
    }
}

impl ToScript for CStr {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.heap.string(&self.to_string_lossy())
    }
}

impl ToScript for Option<&CStr> {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        match self {
            Some(s) => s.to_script(cx),
            None => cx.heap.string(""),
        }
    }
}

impl ToScript for WideStr<'_> {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.heap.string(&String::from_utf16_lossy(self.0))
    }
}

impl ToScript for Option<WideStr<'_>> {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        match self {
            Some(s) => s.to_script(cx),
            None => cx.heap.string(""),
        }
    }
}

// ============================================================================
// Numbers and booleans
// ============================================================================

macro_rules! impl_to_script_exact {
    ($ctor:ident as $target:ty: $($ty:ty),*) => {
        $(
            impl ToScript for $ty {
                fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
                    cx.heap.$ctor(<$target>::from(*self))
                }
            }
        )*
    };
}

impl_to_script_exact!(int32 as i32: i8, i16, i32);
impl_to_script_exact!(uint32 as u32: u8, u16, u32);
impl_to_script_exact!(number as f64: f32, f64);

// No lossless double exists for these; values above 2^53 round to the nearest
// representable number.
macro_rules! impl_to_script_wide_int {
    ($($ty:ty),*) => {
        $(
            impl ToScript for $ty {
                fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
                    cx.heap.number(*self as f64)
                }
            }
        )*
    };
}

impl_to_script_wide_int!(i64, u64, isize, usize);

impl ToScript for bool {
    fn to_script<S: RegistryStorage>(&self, cx: &mut Converter<'_, S>) -> Local {
        cx.heap.boolean(*self)
    }
}
