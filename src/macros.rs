//! Declaration macros for native classes and enums.

/// Declare native types whose instances are exposed to script by reference.
///
/// For each type this implements [`NativeClass`](crate::NativeClass), which
/// also covers `Option<&T>` (a nullable pointer), and the conversion for the
/// type itself (used through references). Both look the instance up in the
/// registry; an unregistered instance or `None` yields the empty local.
///
/// ```
/// use scriptbridge::{native_class, Converter, NativeId, ObjectRegistry, ScriptHeap};
///
/// struct Window { title: String }
/// native_class!(Window);
///
/// let mut heap = ScriptHeap::new();
/// let mut registry: ObjectRegistry = ObjectRegistry::new();
/// let window = Window { title: "main".into() };
///
/// let object = heap.new_object();
/// let handle = heap.persist(object).unwrap();
/// let _ = registry.add(NativeId::of(&window), handle);
///
/// let mut cx = Converter::new(&mut heap, &registry);
/// assert_eq!(cx.convert(&window), object);
/// assert_eq!(cx.convert(&Some(&window)), object);
/// assert!(cx.convert(&None::<&Window>).is_empty());
/// ```
#[macro_export]
macro_rules! native_class {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::NativeClass for $ty {}

            impl $crate::ToScript for $ty {
                fn to_script<S: $crate::RegistryStorage>(
                    &self,
                    cx: &mut $crate::Converter<'_, S>,
                ) -> $crate::Local {
                    cx.find(self)
                }
            }
        )+
    };
}

/// Declare fieldless enums converted to script as their 32-bit ordinal.
///
/// The enum must be `Copy` and convertible into `i32`, for instance through
/// `#[repr(i32)]` and `num_enum::IntoPrimitive`.
///
/// ```
/// use scriptbridge::{script_enum, Converter, FromScript, ObjectRegistry, ScriptHeap};
///
/// #[derive(Clone, Copy)]
/// enum Level { Low = 1, High = 10 }
///
/// impl From<Level> for i32 {
///     fn from(level: Level) -> i32 { level as i32 }
/// }
///
/// script_enum!(Level);
///
/// let mut heap = ScriptHeap::new();
/// let registry: ObjectRegistry = ObjectRegistry::new();
/// let mut cx = Converter::new(&mut heap, &registry);
/// let value = cx.convert(&Level::High);
/// assert_eq!(i32::from_script(cx.heap(), value).unwrap(), 10);
/// ```
///
/// Enums without an integer conversion are rejected:
///
/// ```compile_fail
/// use scriptbridge::script_enum;
///
/// #[derive(Clone, Copy)]
/// enum Opaque { A, B }
///
/// script_enum!(Opaque);
/// ```
#[macro_export]
macro_rules! script_enum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ToScript for $ty {
                fn to_script<S: $crate::RegistryStorage>(
                    &self,
                    cx: &mut $crate::Converter<'_, S>,
                ) -> $crate::Local {
                    cx.enum_value(*self)
                }
            }
        )+
    };
}
