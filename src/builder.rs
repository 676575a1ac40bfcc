//! Builder: configuration for a `ByteMap`.

use crate::byte_map::ByteMap;
use crate::hash::{DefaultKeyHasher, KeyHasher};
use crate::key_size::KeySize;
use crate::raw::RawTable;
use crate::release::Release;
use crate::{Error, Result};

/// Configures and builds a [`ByteMap`].
///
/// Only the key-size function is required. The hasher defaults to
/// [`DefaultKeyHasher`], release hooks default to none (discarded items
/// are dropped), and the table stays unallocated until the first insert
/// unless a capacity is requested.
///
/// ```
/// use bytemap::{key_size, ByteMap};
///
/// let mut m: ByteMap<u32> = ByteMap::builder()
///     .key_size(key_size::nul_terminated)
///     .capacity(16)
///     .build()?;
/// m.insert("answer\0", 42)?;
/// assert_eq!(m.get("answer")?, Some(&42));
/// # Ok::<(), bytemap::Error>(())
/// ```
pub struct Builder<V, S = DefaultKeyHasher> {
    key_size: Option<KeySize>,
    hasher: S,
    capacity: usize,
    release: Release<V>,
}

impl<V> Builder<V> {
    pub fn new() -> Self {
        Self {
            key_size: None,
            hasher: DefaultKeyHasher,
            capacity: 0,
            release: Release::none(),
        }
    }
}

impl<V> Default for Builder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S: KeyHasher> Builder<V, S> {
    /// How many leading bytes of a key span are significant. Required.
    #[must_use]
    pub fn key_size(mut self, key_size: KeySize) -> Self {
        self.key_size = Some(key_size);
        self
    }

    /// Replace the hasher.
    #[must_use]
    pub fn hasher<H: KeyHasher>(self, hasher: H) -> Builder<V, H> {
        Builder {
            key_size: self.key_size,
            hasher,
            capacity: self.capacity,
            release: self.release,
        }
    }

    /// Called with each stored key when the map discards it.
    #[must_use]
    pub fn free_key<F>(mut self, hook: F) -> Self
    where
        F: FnMut(Box<[u8]>) + 'static,
    {
        self.release.key = Some(Box::new(hook));
        self
    }

    /// Called with each stored value when the map discards it.
    #[must_use]
    pub fn free_value<F>(mut self, hook: F) -> Self
    where
        F: FnMut(V) + 'static,
    {
        self.release.value = Some(Box::new(hook));
        self
    }

    /// Allocate up front for `entries` entries. 0 keeps allocation lazy.
    #[must_use]
    pub fn capacity(mut self, entries: usize) -> Self {
        self.capacity = entries;
        self
    }

    pub fn build(self) -> Result<ByteMap<V, S>> {
        let key_size = self.key_size.ok_or(Error::MissingKeySize)?;
        let raw = RawTable::with_entries(self.capacity)?;
        Ok(ByteMap::from_parts(raw, key_size, self.hasher, self.release))
    }
}
