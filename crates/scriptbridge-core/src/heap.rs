//! Generational value heap with local scopes and persistent handles.

use std::fmt;

use indexmap::IndexMap;

use crate::handle::{Local, Persistent, ValueHandle};
use crate::value::{ScriptValue, number_to_string};

/// Storage for script values.
///
/// Values are stored in a Vec with generation tracking. When a value is
/// freed, its slot is reused but the generation is incremented, so stale
/// handles resolve to nothing instead of to an unrelated value.
///
/// Every slot is reference counted. References are held by:
/// - the local scope that allocated the value,
/// - arrays and objects storing the value,
/// - [`Persistent`] handles.
///
/// Allocations outside any [`scoped`](Self::scoped) call land in the root
/// scope, which lives as long as the heap.
pub struct ScriptHeap {
    slots: Vec<HeapSlot>,
    free_list: Vec<u32>,
    /// Handles owned by open scopes, innermost last
    locals: Vec<ValueHandle>,
    scope_depth: usize,
}

struct HeapSlot {
    generation: u32,
    value: Option<ScriptValue>,
    ref_count: u32,
}

impl ScriptHeap {
    /// Create a new empty heap.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            locals: Vec::new(),
            scope_depth: 0,
        }
    }

    fn allocate(&mut self, value: ScriptValue) -> Local {
        let handle = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            slot.ref_count = 1;
            ValueHandle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(HeapSlot {
                generation: 0,
                value: Some(value),
                ref_count: 1,
            });
            ValueHandle::new(index, 0)
        };
        self.locals.push(handle);
        Local::from_handle(handle)
    }

    // ==========================================================================
    // Value construction
    // ==========================================================================

    /// Allocate `undefined`.
    pub fn undefined(&mut self) -> Local {
        self.allocate(ScriptValue::Undefined)
    }

    /// Allocate `null`.
    pub fn null(&mut self) -> Local {
        self.allocate(ScriptValue::Null)
    }

    /// Allocate a boolean.
    pub fn boolean(&mut self, value: bool) -> Local {
        self.allocate(ScriptValue::Bool(value))
    }

    /// Allocate a number holding a signed 32-bit integer exactly.
    pub fn int32(&mut self, value: i32) -> Local {
        self.allocate(ScriptValue::Int32(value))
    }

    /// Allocate a number holding an unsigned 32-bit integer exactly.
    pub fn uint32(&mut self, value: u32) -> Local {
        self.allocate(ScriptValue::Uint32(value))
    }

    /// Allocate a double-precision number.
    pub fn number(&mut self, value: f64) -> Local {
        self.allocate(ScriptValue::Number(value))
    }

    /// Allocate a string holding a copy of `value`.
    pub fn string(&mut self, value: &str) -> Local {
        self.allocate(ScriptValue::String(value.to_owned()))
    }

    /// Allocate an array of `len` holes.
    pub fn new_array(&mut self, len: u32) -> Local {
        self.allocate(ScriptValue::Array(vec![Local::EMPTY; len as usize]))
    }

    /// Allocate an object without properties.
    pub fn new_object(&mut self) -> Local {
        self.allocate(ScriptValue::Object(IndexMap::new()))
    }

    // ==========================================================================
    // Container mutation
    // ==========================================================================

    /// Store `value` at `index`, growing the array with holes if needed.
    ///
    /// Returns false if `array` is not a live array or `value` is stale.
    pub fn set_index(&mut self, array: Local, index: u32, value: Local) -> bool {
        self.store_element(array, Some(index as usize), value)
    }

    /// Append `value` to the end of the array.
    ///
    /// Returns false if `array` is not a live array or `value` is stale.
    pub fn push(&mut self, array: Local, value: Local) -> bool {
        self.store_element(array, None, value)
    }

    fn store_element(&mut self, array: Local, index: Option<usize>, value: Local) -> bool {
        let Some(target) = array.handle() else {
            return false;
        };
        if !matches!(self.value(target), Some(ScriptValue::Array(_))) {
            return false;
        }
        if let Some(h) = value.handle()
            && !self.add_ref(h)
        {
            return false;
        }

        let previous = match self.value_mut(target) {
            Some(ScriptValue::Array(items)) => {
                let index = index.unwrap_or(items.len());
                if index >= items.len() {
                    items.resize(index + 1, Local::EMPTY);
                }
                std::mem::replace(&mut items[index], value)
            }
            _ => Local::EMPTY,
        };
        if let Some(h) = previous.handle() {
            self.release(h);
        }
        true
    }

    /// Set the property `name` of an object, replacing any previous value.
    ///
    /// Replacing keeps the property's original position. Returns false if
    /// `object` is not a live object or `value` is stale.
    pub fn set_property(&mut self, object: Local, name: &str, value: Local) -> bool {
        let Some(target) = object.handle() else {
            return false;
        };
        if !matches!(self.value(target), Some(ScriptValue::Object(_))) {
            return false;
        }
        if let Some(h) = value.handle()
            && !self.add_ref(h)
        {
            return false;
        }

        let previous = match self.value_mut(target) {
            Some(ScriptValue::Object(props)) => props.insert(name.to_owned(), value),
            _ => None,
        };
        if let Some(h) = previous.and_then(Local::handle) {
            self.release(h);
        }
        true
    }

    // ==========================================================================
    // Reading
    // ==========================================================================

    /// Get the value a local refers to.
    ///
    /// Returns None if the local is empty or stale.
    pub fn get(&self, local: Local) -> Option<&ScriptValue> {
        self.value(local.handle()?)
    }

    /// Length of an array, None if `array` is not a live array.
    pub fn array_len(&self, array: Local) -> Option<u32> {
        match self.get(array)? {
            ScriptValue::Array(items) => Some(items.len() as u32),
            _ => None,
        }
    }

    /// Element at `index`, empty for holes, out-of-range indices and non-arrays.
    pub fn get_index(&self, array: Local, index: u32) -> Local {
        match self.get(array) {
            Some(ScriptValue::Array(items)) => {
                items.get(index as usize).copied().unwrap_or(Local::EMPTY)
            }
            _ => Local::EMPTY,
        }
    }

    /// Property `name` of an object, empty if absent or not an object.
    pub fn get_property(&self, object: Local, name: &str) -> Local {
        match self.get(object) {
            Some(ScriptValue::Object(props)) => props.get(name).copied().unwrap_or(Local::EMPTY),
            _ => Local::EMPTY,
        }
    }

    /// Property names of an object in insertion order.
    pub fn property_names(&self, object: Local) -> Vec<&str> {
        match self.get(object) {
            Some(ScriptValue::Object(props)) => props.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Render a value as the property name it designates when used as a key.
    pub fn property_key(&self, key: Local) -> String {
        let Some(value) = self.get(key) else {
            return "undefined".to_string();
        };
        match value {
            ScriptValue::Undefined => "undefined".to_string(),
            ScriptValue::Null => "null".to_string(),
            ScriptValue::Bool(b) => b.to_string(),
            ScriptValue::Int32(v) => v.to_string(),
            ScriptValue::Uint32(v) => v.to_string(),
            ScriptValue::Number(v) => number_to_string(*v),
            ScriptValue::String(s) => s.clone(),
            ScriptValue::Array(items) => items
                .iter()
                .map(|&item| match self.get(item) {
                    None | Some(ScriptValue::Undefined | ScriptValue::Null) => String::new(),
                    Some(_) => self.property_key(item),
                })
                .collect::<Vec<_>>()
                .join(","),
            ScriptValue::Object(_) => "[object Object]".to_string(),
        }
    }

    // ==========================================================================
    // Scopes and persistent handles
    // ==========================================================================

    /// Run `f` inside a new local scope.
    ///
    /// Every local allocated while `f` runs is released when it returns,
    /// except the returned local, which escapes into the enclosing scope.
    pub fn scoped<F>(&mut self, f: F) -> Local
    where
        F: FnOnce(&mut ScriptHeap) -> Local,
    {
        let mark = self.locals.len();
        self.scope_depth += 1;
        let result = f(self);
        self.scope_depth -= 1;

        let escaped = result.handle().filter(|&h| self.add_ref(h));
        let released: Vec<ValueHandle> = self.locals.drain(mark..).collect();
        for handle in released {
            self.release(handle);
        }
        match escaped {
            Some(handle) => {
                self.locals.push(handle);
                Local::from_handle(handle)
            }
            None => Local::EMPTY,
        }
    }

    /// Number of scopes currently open, not counting the root scope.
    pub fn scope_depth(&self) -> usize {
        self.scope_depth
    }

    /// Keep the value alive beyond local scopes.
    ///
    /// Returns None if the local is empty or stale.
    pub fn persist(&mut self, local: Local) -> Option<Persistent> {
        let handle = local.handle()?;
        self.add_ref(handle).then(|| Persistent::new(handle))
    }

    /// Release a persistent handle immediately.
    ///
    /// Returns true if this freed the value.
    pub fn dispose(&mut self, handle: Persistent) -> bool {
        self.release(handle.into_handle())
    }

    // ==========================================================================
    // Reference counting
    // ==========================================================================

    fn add_ref(&mut self, handle: ValueHandle) -> bool {
        match self.live_slot_mut(handle) {
            Some(slot) => {
                slot.ref_count = slot.ref_count.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Drop one reference, freeing the value and everything it alone kept
    /// alive once counts reach zero. Returns true if `handle` was freed.
    fn release(&mut self, handle: ValueHandle) -> bool {
        let Some(mut pending) = self.decrement(handle) else {
            return false;
        };
        while let Some(child) = pending.pop() {
            if let Some(children) = self.decrement(child) {
                pending.extend(children);
            }
        }
        true
    }

    /// Returns the freed value's children if this released the last reference.
    fn decrement(&mut self, handle: ValueHandle) -> Option<Vec<ValueHandle>> {
        let slot = self.live_slot_mut(handle)?;
        slot.ref_count = slot.ref_count.saturating_sub(1);
        if slot.ref_count > 0 {
            return None;
        }
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        Some(value.map(|v| v.child_handles()).unwrap_or_default())
    }

    // ==========================================================================
    // Introspection
    // ==========================================================================

    /// Check if a local refers to a live value.
    pub fn is_alive(&self, local: Local) -> bool {
        self.get(local).is_some()
    }

    /// Number of references keeping a value alive.
    pub fn ref_count(&self, local: Local) -> Option<u32> {
        let handle = local.handle()?;
        self.live_slot(handle).map(|slot| slot.ref_count)
    }

    /// Number of live values.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }

    fn live_slot(&self, handle: ValueHandle) -> Option<&HeapSlot> {
        let slot = self.slots.get(handle.index as usize)?;
        (slot.generation == handle.generation && slot.value.is_some()).then_some(slot)
    }

    fn live_slot_mut(&mut self, handle: ValueHandle) -> Option<&mut HeapSlot> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        (slot.generation == handle.generation && slot.value.is_some()).then_some(slot)
    }

    fn value(&self, handle: ValueHandle) -> Option<&ScriptValue> {
        self.live_slot(handle)?.value.as_ref()
    }

    fn value_mut(&mut self, handle: ValueHandle) -> Option<&mut ScriptValue> {
        self.live_slot_mut(handle)?.value.as_mut()
    }
}

impl Default for ScriptHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScriptHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptHeap")
            .field("slot_count", &self.slots.len())
            .field("free_count", &self.free_list.len())
            .field("local_count", &self.locals.len())
            .field("scope_depth", &self.scope_depth)
            .finish()
    }
}
