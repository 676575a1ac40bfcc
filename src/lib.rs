//! bytemap: a single-threaded, open-addressing hash map keyed by byte
//! spans.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a predictable, allocation-lean associative container whose keys
//!   are plain byte ranges, built in layers that can each be reasoned about
//!   on their own.
//! - Layers:
//!   - `hash` / `key_size`: pure functions. A key-size function picks the
//!     significant prefix of a caller's span; a `KeyHasher` maps those bytes
//!     to a `u64`.
//!   - `probe`: the linear probe sequence over a power-of-two array and the
//!     growth policy (load factor 3/4, capacities 2, 4, 8, ...).
//!   - `RawTable<V>`: the flat slot array. Lookup, placement, growth and
//!     backward-shift deletion. Never calls user code.
//!   - `ByteMap<V, S>`: public API. Measures and hashes keys, drives the raw
//!     table, and hands discarded keys/values to the release hooks.
//!
//! Constraints
//! - Single-threaded: `ByteMap` is `!Send` and `!Sync`.
//! - One slot array, no chaining, no side free-list. Capacity is 0 until the
//!   first insert (unless pre-sized) and always a power of two afterwards.
//! - `len * 4 <= capacity * 3` after every operation.
//! - No tombstones. Removal slides later members of the probe run back
//!   into the hole, so a vacant slot always ends a probe.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` hash. Growth and backward shifts use the
//!   stored hash; the hasher runs once per key per operation, before the
//!   table is touched.
//!
//! Reentrancy policy
//! - Every public method enters a debug-only guard before it runs the
//!   key-size function or the hasher. Nested entry into the same map (for
//!   example from a hasher holding a pointer back to it) panics in debug
//!   builds.
//! - Release hooks run after the guard is released and the table is
//!   consistent again.
//!
//! Errors
//! - Configuration and key-measurement failures, capacity overflow and
//!   allocation failure come back as [`Error`]. A missing key is `None` or
//!   `false`, never an error.
//!
//! Notes and non-goals
//! - Iteration order is slot order, which is unspecified.
//! - No concurrent access; wrap the map in a lock or shard it.

mod builder;
mod byte_map;
mod byte_map_proptest;
mod error;
mod hash;
pub mod key_size;
mod probe;
mod raw;
mod reentrancy;
mod release;
mod slot;

// Public surface
pub use builder::Builder;
pub use byte_map::{ByteMap, Iter, IterMut};
pub use error::{Error, Result};
pub use hash::{hash_bytes, DefaultKeyHasher, KeyHasher};
pub use key_size::KeySize;
pub use slot::{SlotDump, SlotState};
