//! Shared test harness: a minimal class wrapper that owns native objects and
//! keeps their registry entries in step.

#![allow(dead_code)]

use scriptbridge::{
    Local, NativeClass, NativeId, ObjectRegistry, Persistent, RegistryStorage, ScriptHeap,
};

/// Route registry logs to the test output. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}

/// A fresh script object, held only by the returned persistent handle.
pub fn persisted_object(heap: &mut ScriptHeap) -> Persistent {
    let mut handle = None;
    heap.scoped(|heap| {
        let object = heap.new_object();
        handle = heap.persist(object);
        Local::EMPTY
    });
    handle.expect("fresh object persists")
}

/// Owns boxed native objects of one class, registering each on exposure and
/// dropping it from the destroy callback.
pub struct ClassWrapper<T> {
    objects: Vec<Box<T>>,
}

impl<T: NativeClass> ClassWrapper<T> {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Take ownership of `value` and give it a script object.
    pub fn expose<S: RegistryStorage>(
        &mut self,
        heap: &mut ScriptHeap,
        registry: &mut ObjectRegistry<S>,
        value: T,
    ) -> NativeId<T> {
        let object = Box::new(value);
        let id = NativeId::of(&*object);
        let previous = registry.add(id, persisted_object(heap));
        assert!(previous.is_none(), "fresh allocation already registered");
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: NativeId<T>) -> Option<&T> {
        self.objects
            .iter()
            .map(|object| &**object)
            .find(|object| NativeId::of(*object) == id)
    }

    pub fn destroy<S: RegistryStorage>(
        &mut self,
        heap: &mut ScriptHeap,
        registry: &mut ObjectRegistry<S>,
        id: NativeId<T>,
    ) -> bool {
        let objects = &mut self.objects;
        registry.remove_with(heap, id, |id, _| {
            objects.retain(|object| NativeId::of(&**object) != id);
        })
    }

    pub fn destroy_all<S: RegistryStorage>(
        &mut self,
        heap: &mut ScriptHeap,
        registry: &mut ObjectRegistry<S>,
    ) -> usize {
        let objects = &mut self.objects;
        registry.remove_all_with::<T, _>(heap, |id, _| {
            objects.retain(|object| NativeId::of(&**object) != id);
        })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}
