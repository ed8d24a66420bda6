use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ffi::CStr;

use num_enum::IntoPrimitive;
use scriptbridge::{
    Converter, FromScript, Local, ObjectRegistry, ScriptHeap, ScriptValue, native_class,
    script_enum,
};

mod common;

#[derive(Clone, Copy, Debug, IntoPrimitive)]
#[repr(i32)]
enum Color {
    Red = 0,
    Green = 1,
    Blue = 7,
    Infrared = -1,
}

script_enum!(Color);

struct Player {
    health: u32,
}

native_class!(Player);

// Non-zero sized so distinct instances have distinct addresses.
struct Shield {
    _armor: u8,
}

native_class!(Shield);

#[test]
fn integers_round_trip() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let negative = cx.convert(&-7i32);
    let max = cx.convert(&2147483647i32);
    let unsigned = cx.convert(&u32::MAX);

    let heap = cx.heap();
    assert_eq!(i32::from_script(heap, negative), Ok(-7));
    assert_eq!(i32::from_script(heap, max), Ok(i32::MAX));
    assert_eq!(u32::from_script(heap, unsigned), Ok(u32::MAX));
    assert_eq!(heap.get(unsigned), Some(&ScriptValue::Uint32(u32::MAX)));
}

#[test]
fn vector_becomes_array_in_order() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let array = cx.convert(&vec![1, 2, 3]);
    let heap = cx.heap();
    assert_eq!(heap.array_len(array), Some(3));
    assert_eq!(Vec::<i32>::from_script(heap, array), Ok(vec![1, 2, 3]));
}

#[test]
fn ordered_map_becomes_object() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let map = BTreeMap::from([("b", 2), ("a", 1)]);
    let object = cx.convert(&map);

    let heap = cx.heap();
    assert_eq!(heap.property_names(object), vec!["a", "b"]);
    assert_eq!(i32::from_script(heap, heap.get_property(object, "a")), Ok(1));
    assert_eq!(i32::from_script(heap, heap.get_property(object, "b")), Ok(2));
}

#[test]
fn non_string_keys_name_properties() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let small = cx.convert(&BTreeMap::from([(10u8, "ten"), (2u8, "two")]));
    let flags = cx.convert(&BTreeMap::from([(true, 1), (false, 0)]));

    let heap = cx.heap();
    assert_eq!(heap.property_names(small), vec!["2", "10"]);
    assert_eq!(heap.property_names(flags), vec!["false", "true"]);
}

#[test]
fn colliding_property_names_keep_later_entry() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    // a number and a string that render the same property name
    let number_key = cx.heap().int32(1);
    let string_key = cx.heap().string("1");
    let entries = [(number_key, 10), (string_key, 20)];
    let object = cx.convert_entries(entries.iter().map(|(k, v)| (k, v)));

    let heap = cx.heap();
    assert_eq!(heap.property_names(object), vec!["1"]);
    assert_eq!(i32::from_script(heap, heap.get_property(object, "1")), Ok(20));
}

#[test]
fn number_keys_render_like_script() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let keys = [1e21, 1e-7, 1.5e-10, 0.5, 1e20];
    let keys: Vec<Local> = keys.iter().map(|&k| cx.heap().number(k)).collect();
    let entries: Vec<(Local, i32)> = keys.into_iter().zip(0..).collect();
    let object = cx.convert_entries(entries.iter().map(|(k, v)| (k, v)));

    let heap = cx.heap();
    assert_eq!(
        heap.property_names(object),
        vec!["1e+21", "1e-7", "1.5e-10", "0.5", "100000000000000000000"]
    );
}

#[test]
fn exponent_keys_collide_with_their_string_form() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let number_key = cx.heap().number(1e21);
    let string_key = cx.heap().string("1e+21");
    let entries = [(number_key, 1), (string_key, 2)];
    let object = cx.convert_entries(entries.iter().map(|(k, v)| (k, v)));

    let heap = cx.heap();
    assert_eq!(heap.property_names(object), vec!["1e+21"]);
    assert_eq!(i32::from_script(heap, heap.get_property(object, "1e+21")), Ok(2));
}

#[test]
fn scoped_conversions_release_temporaries() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let kept = cx.scoped(|cx| {
        let _ = cx.convert(&vec!["discarded"; 4]);
        cx.convert(&BTreeMap::from([("kept", 1)]))
    });

    let heap = cx.heap();
    assert_eq!(heap.scope_depth(), 0);
    // the returned object and its one property value
    assert_eq!(heap.live_count(), 2);
    assert_eq!(i32::from_script(heap, heap.get_property(kept, "kept")), Ok(1));
}

#[test]
fn null_c_string_becomes_empty_string() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let null = cx.convert(&None::<&CStr>);
    let some = cx.convert(&Some(c"text"));
    let heap = cx.heap();
    assert_eq!(String::from_script(heap, null).as_deref(), Ok(""));
    assert_eq!(String::from_script(heap, some).as_deref(), Ok("text"));
}

#[test]
fn enums_convert_to_ordinal() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let colors = [Color::Red, Color::Green, Color::Blue, Color::Infrared];
    let array = cx.convert(&colors);
    assert_eq!(
        Vec::<i32>::from_script(cx.heap(), array),
        Ok(vec![0, 1, 7, -1])
    );
}

#[test]
fn unregistered_instance_yields_empty_local() {
    common::init_tracing();
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let player = Player { health: 100 };
    assert!(cx.convert(&player).is_empty());
    assert!(cx.convert(&Some(&player)).is_empty());
    assert!(cx.convert(&None::<&Player>).is_empty());
    assert_eq!(player.health, 100);
}

#[test]
fn registered_instance_aliases_its_object() {
    common::init_tracing();
    let mut heap = ScriptHeap::new();
    let mut registry: ObjectRegistry = ObjectRegistry::new();
    let mut players = common::ClassWrapper::<Player>::new();

    let id = players.expose(&mut heap, &mut registry, Player { health: 80 });
    let object = registry.find(id);

    {
        let mut cx = Converter::new(&mut heap, &registry);
        let player = players.get(id).expect("exposed player");
        assert_eq!(cx.convert(player), object);
        assert_eq!(cx.convert(&player), object);
        assert_eq!(cx.convert(&Some(player)), object);

        // the same object appears in every collection that holds the instance
        let array = cx.convert(&vec![player, player]);
        let heap = cx.heap();
        assert_eq!(heap.get_index(array, 0), object);
        assert_eq!(heap.get_index(array, 1), object);
    }

    assert_eq!(players.destroy_all(&mut heap, &mut registry), 1);
    assert!(registry.find(id).is_empty());
    // the array converted above still holds the object
    assert!(heap.is_alive(object));
}

#[test]
fn instances_of_different_classes_stay_apart() {
    let mut heap = ScriptHeap::new();
    let mut registry: ObjectRegistry = ObjectRegistry::new();
    let mut players = common::ClassWrapper::<Player>::new();
    let mut shields = common::ClassWrapper::<Shield>::new();

    let player = players.expose(&mut heap, &mut registry, Player { health: 1 });
    let first = shields.expose(&mut heap, &mut registry, Shield { _armor: 1 });
    let second = shields.expose(&mut heap, &mut registry, Shield { _armor: 2 });

    assert_ne!(registry.find(first), registry.find(second));
    assert_ne!(registry.find(player), registry.find(first));
    assert_eq!(registry.len_of::<Shield>(), 2);
    assert_eq!(registry.len_of::<Player>(), 1);

    players.destroy_all(&mut heap, &mut registry);
    shields.destroy_all(&mut heap, &mut registry);
    assert_eq!(heap.live_count(), 0);
}

#[test]
fn empty_elements_read_as_undefined_holes() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let player = Player { health: 5 };
    let array = cx.convert(&[Some(&player), None]);
    let heap = cx.heap();
    assert_eq!(heap.array_len(array), Some(2));
    assert!(heap.get_index(array, 0).is_empty());
    assert!(heap.get_index(array, 1).is_empty());
}

#[test]
fn nested_collections() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let mut inventory = BTreeMap::new();
    inventory.insert("potions".to_string(), vec![vec![1u8, 2], vec![3]]);
    inventory.insert("keys".to_string(), vec![]);
    let object = cx.convert(&inventory);

    let heap = cx.heap();
    assert_eq!(heap.property_names(object), vec!["keys", "potions"]);
    let potions = heap.get_property(object, "potions");
    assert_eq!(
        Vec::<Vec<u8>>::from_script(heap, potions),
        Ok(vec![vec![1, 2], vec![3]])
    );
    let keys = heap.get_property(object, "keys");
    assert_eq!(heap.array_len(keys), Some(0));
}

#[test]
fn other_sequences() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let deque = VecDeque::from([3i16, 1, 2]);
    let set = BTreeSet::from(["b", "a"]);
    let slice: &[f32] = &[0.5, -0.25];
    let from_deque = cx.convert(&deque);
    let from_set = cx.convert(&set);
    let from_slice = cx.convert(slice);

    let heap = cx.heap();
    assert_eq!(Vec::<i16>::from_script(heap, from_deque), Ok(vec![3, 1, 2]));
    assert_eq!(
        Vec::<String>::from_script(heap, from_set),
        Ok(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(Vec::<f64>::from_script(heap, from_slice), Ok(vec![0.5, -0.25]));
}

#[test]
fn conversions_leave_no_open_scopes() {
    let mut heap = ScriptHeap::new();
    let registry: ObjectRegistry = ObjectRegistry::new();
    let mut cx = Converter::new(&mut heap, &registry);

    let _ = cx.convert(&BTreeMap::from([("a", vec![true, false])]));
    let _ = cx.convert(&VecDeque::from([Some(c"a"), None]));
    assert_eq!(cx.heap().scope_depth(), 0);
}
