// ByteMap integration test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round-trip: a stored value is returned by `get` until it is replaced
//   or removed.
// - Collision policy: insert overwrites, replace only overwrites, emplace
//   only writes new keys.
// - Length: len == inserted keys - removed keys, across growth.
// - Deletion: removing from a probe run never strands the rest of it.
// - Ownership: release hooks see each stored key/value exactly once.
use bytemap::{key_size, ByteMap, Error, KeyHasher, SlotState};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use test_log::test;

#[derive(Clone, Copy, Default)]
struct ConstHasher;
impl KeyHasher for ConstHasher {
    fn hash_key(&self, _key: &[u8]) -> u64 {
        42
    }
}

// Test: the three-key walk-through.
// Verifies: len, get and remove agree on "a", "b", "c" with the default hasher.
#[test]
fn abc_walkthrough() {
    let mut m = ByteMap::new(key_size::whole);
    m.insert("a", 1).unwrap();
    m.insert("b", 2).unwrap();
    m.insert("c", 3).unwrap();
    assert_eq!(m.len(), 3);
    assert_eq!(m.get("b").unwrap(), Some(&2));
    assert!(m.remove("a").unwrap());
    assert_eq!(m.get("a").unwrap(), None);
    assert_eq!(m.len(), 2);
}

// Test: string keys measured up to their NUL terminator.
// Verifies: insert overwrites and returns the old value; emplace never overwrites.
#[test]
fn string_map_overwrite_and_emplace() {
    let mut m = ByteMap::new(key_size::nul_terminated);
    m.insert("Luke Skywalker\0", "I'm a Jedi, like my father before me")
        .unwrap();
    m.insert("Darth Vader\0", "I am your father").unwrap();
    m.insert("Han Solo\0", "I love Leia").unwrap();
    m.insert("Leia Organa\0", "I thought about it").unwrap();
    assert_eq!(m.len(), 4);
    assert_eq!(
        m.get("Luke Skywalker\0").unwrap(),
        Some(&"I'm a Jedi, like my father before me")
    );

    let old = m.insert("Luke Skywalker\0", "I hate my father!").unwrap();
    assert_eq!(old, Some("I'm a Jedi, like my father before me"));
    assert_eq!(m.get("Luke Skywalker").unwrap(), Some(&"I hate my father!"));

    let current = m
        .emplace("Luke Skywalker\0", "I'm a Jedi, like my father before me")
        .unwrap()
        .copied();
    assert_eq!(current, Some("I hate my father!"));
    assert_eq!(m.get("Luke Skywalker").unwrap(), Some(&"I hate my father!"));
    assert_eq!(m.len(), 4);
}

// Test: fixed-width integer keys.
// Verifies: four-byte keys round-trip and are all contained.
#[test]
fn int_map_round_trip() {
    let mut m = ByteMap::new(key_size::fixed::<4>);
    let names = ["one", "two", "three", "four"];
    for (n, name) in (1i32..).zip(names) {
        m.insert(&n.to_ne_bytes(), name).unwrap();
    }
    assert_eq!(m.len(), 4);
    for (n, name) in (1i32..).zip(names) {
        assert_eq!(m.get(&n.to_ne_bytes()).unwrap(), Some(&name));
        assert!(m.contains(&n.to_ne_bytes()).unwrap());
    }
    assert!(!m.contains(&5i32.to_ne_bytes()).unwrap());
}

// Test: replace policy.
// Verifies: replace on a present key behaves like insert; on an absent key it
// writes nothing and leaves len unchanged.
#[test]
fn replace_only_touches_present_keys() {
    let mut m = ByteMap::new(key_size::whole);
    assert_eq!(m.replace("k", 1).unwrap(), None);
    assert_eq!(m.len(), 0);
    assert_eq!(m.get("k").unwrap(), None);

    m.insert("k", 1).unwrap();
    assert_eq!(m.replace("k", 2).unwrap(), Some(1));
    assert_eq!(m.get("k").unwrap(), Some(&2));
    assert_eq!(m.replace("other", 3).unwrap(), None);
    assert_eq!(m.len(), 1);
}

// Test: emplace policy.
// Verifies: emplace on an absent key inserts and returns None.
#[test]
fn emplace_inserts_absent_keys() {
    let mut m = ByteMap::new(key_size::whole);
    assert_eq!(m.emplace("k", 1).unwrap(), None);
    assert_eq!(m.emplace("k", 2).unwrap(), Some(&1));
    assert_eq!(m.get("k").unwrap(), Some(&1));
    assert_eq!(m.len(), 1);
}

// Test: idempotent removal.
// Verifies: removing or taking an absent key returns false/None and keeps len.
#[test]
fn removing_absent_keys_is_a_no_op() {
    let mut m = ByteMap::new(key_size::whole);
    assert!(!m.remove("ghost").unwrap());
    assert_eq!(m.take("ghost").unwrap(), None);
    m.insert("k", 1).unwrap();
    assert!(!m.remove("ghost").unwrap());
    assert_eq!(m.len(), 1);
    assert!(m.remove("k").unwrap());
    assert!(!m.remove("k").unwrap());
    assert_eq!(m.len(), 0);
    assert!(m.is_empty());
}

// Test: deletion under total collision.
// Assumes: a constant hasher puts every key into one probe run.
// Verifies: removing any single key keeps the other N-1 retrievable and
// len drops by exactly one.
#[test]
fn constant_hash_interior_removal() {
    const N: usize = 32;
    for victim in [0, 1, N / 2, N - 2, N - 1] {
        let mut m: ByteMap<usize, ConstHasher> =
            ByteMap::with_hasher(key_size::whole, ConstHasher);
        let keys: Vec<Vec<u8>> = (0..N).map(|i| format!("k{i}").into_bytes()).collect();
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(m.insert(k, i).unwrap(), None);
        }
        assert_eq!(m.len(), N);

        assert!(m.remove(&keys[victim]).unwrap());
        assert_eq!(m.len(), N - 1);
        for (i, k) in keys.iter().enumerate() {
            let expected = (i != victim).then_some(&i);
            assert_eq!(m.get(k).unwrap(), expected, "victim {victim}, key {i}");
        }
    }
}

// Test: growth is transparent.
// Verifies: values written before and after each resize are all retrievable
// with their latest value; capacity stays a power of two within load.
#[test]
fn resize_keeps_latest_values() {
    let mut m = ByteMap::new(key_size::whole);
    assert_eq!(m.capacity(), 0);
    let mut last_capacity = 0;
    for i in 0u32..2_000 {
        m.insert(&i.to_le_bytes(), i).unwrap();
        if i % 3 == 0 {
            // Overwrite an older key after it may have moved in a resize.
            m.insert(&(i / 2).to_le_bytes(), i + 1_000_000).unwrap();
        }
        let cap = m.capacity();
        assert!(cap.is_power_of_two());
        assert!(m.len() * 4 <= cap * 3);
        assert!(cap >= last_capacity);
        last_capacity = cap;
    }
    assert_eq!(m.len(), 2_000);
    assert_eq!(m.capacity(), 4096);

    let mut expected: Vec<u32> = (0..2_000).collect();
    for i in (0u32..2_000).filter(|i| i % 3 == 0) {
        expected[(i / 2) as usize] = i + 1_000_000;
    }
    for (i, want) in expected.iter().enumerate() {
        assert_eq!(m.get(&(i as u32).to_le_bytes()).unwrap(), Some(want));
    }
}

// Test: len bookkeeping across growth and churn.
// Verifies: len == inserted - removed at every step.
#[test]
fn len_tracks_inserts_minus_removes() {
    let mut m = ByteMap::new(key_size::whole);
    let mut expected = 0usize;
    for round in 0..5u8 {
        for i in 0..100u8 {
            if m.insert(&[round, i], ()).unwrap().is_none() {
                expected += 1;
            }
            assert_eq!(m.len(), expected);
        }
        for i in (0..100u8).step_by(3) {
            if m.remove(&[round, i]).unwrap() {
                expected -= 1;
            }
            assert_eq!(m.len(), expected);
        }
    }
    assert_eq!(m.iter().count(), expected);
}

// Test: lazy allocation.
// Verifies: lookups and removals on a never-written map allocate nothing;
// pre-sizing through the builder allocates up front.
#[test]
fn allocation_is_lazy_unless_presized() {
    let mut m: ByteMap<u8> = ByteMap::new(key_size::whole);
    assert_eq!(m.get("x").unwrap(), None);
    assert!(!m.remove("x").unwrap());
    assert_eq!(m.capacity(), 0);
    assert_eq!(m.slot_states().count(), 0);
    m.insert("x", 1).unwrap();
    assert_eq!(m.capacity(), 2);

    let m: ByteMap<u8> = ByteMap::builder()
        .key_size(key_size::whole)
        .capacity(100)
        .build()
        .unwrap();
    assert_eq!(m.capacity(), 256);
    assert!(m.slot_states().all(|s| s == SlotState::Vacant));
}

// Test: configuration and precondition errors.
// Verifies: missing key size fails the build; an oversize key fails without
// touching the map.
#[test]
fn errors_are_returned_not_fatal() {
    let built = ByteMap::<u8>::builder().build();
    assert!(matches!(built, Err(Error::MissingKeySize)));

    let mut m = ByteMap::new(key_size::fixed::<8>);
    m.insert(&1u64.to_le_bytes(), 'a').unwrap();
    let err = m.insert(b"short", 'b').unwrap_err();
    assert_eq!(err, Error::KeyOutOfBounds { size: 8, len: 5 });
    assert!(err.to_string().contains("exceeds"));
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&1u64.to_le_bytes()).unwrap(), Some(&'a'));
}

// Test: release hooks.
// Verifies: remove releases key and value; take releases only the key; values
// returned by insert/replace are the caller's; drop releases what is left.
#[test]
fn release_hooks_balance() {
    let keys = Rc::new(Cell::new(0));
    let values = Rc::new(RefCell::new(Vec::new()));
    let (k, v) = (keys.clone(), values.clone());
    let mut m: ByteMap<String> = ByteMap::builder()
        .key_size(key_size::whole)
        .free_key(move |_| k.set(k.get() + 1))
        .free_value(move |s| v.borrow_mut().push(s))
        .build()
        .unwrap();

    for name in ["a", "b", "c", "d"] {
        m.insert(name, name.to_uppercase()).unwrap();
    }
    assert_eq!(m.replace("a", "A2".to_string()).unwrap().as_deref(), Some("A"));
    assert_eq!(m.take("b").unwrap().as_deref(), Some("B"));
    assert_eq!(keys.get(), 1);
    assert!(values.borrow().is_empty());

    assert!(m.remove("c").unwrap());
    assert_eq!(keys.get(), 2);
    assert_eq!(*values.borrow(), vec!["C".to_string()]);

    drop(m);
    assert_eq!(keys.get(), 4);
    let mut released = values.borrow().clone();
    released.sort();
    assert_eq!(released, vec!["A2", "C", "D"]);
}

// Test: custom hasher as a plain function pointer.
#[test]
fn fn_pointer_hasher() {
    fn first_byte(key: &[u8]) -> u64 {
        key.first().copied().map_or(0, u64::from)
    }
    let mut m = ByteMap::with_hasher(key_size::whole, first_byte as fn(&[u8]) -> u64);
    m.insert("apple", 1).unwrap();
    m.insert("avocado", 2).unwrap();
    m.insert("banana", 3).unwrap();
    assert!(m.remove("apple").unwrap());
    assert_eq!(m.get("avocado").unwrap(), Some(&2));
    assert_eq!(m.get("banana").unwrap(), Some(&3));
}

// Test: slot dump.
// Verifies: one line per slot, occupied lines match len.
#[test]
fn dump_slots_matches_states() {
    let mut m = ByteMap::new(key_size::whole);
    for i in 0..5u8 {
        m.insert(&[i], i).unwrap();
    }
    let dump = m.dump_slots().to_string();
    assert_eq!(dump.lines().count(), m.capacity());
    assert_eq!(dump.lines().filter(|l| l.contains("occupied")).count(), 5);
    let occupied = m.slot_states().filter(|s| *s == SlotState::Occupied).count();
    assert_eq!(occupied, m.len());
}
