//! ByteMap: the public open-addressing map over byte-span keys.

use crate::builder::Builder;
use crate::hash::{DefaultKeyHasher, KeyHasher};
use crate::key_size::{self, KeySize};
use crate::raw::{Probed, RawTable};
use crate::reentrancy::DebugReentrancy;
use crate::release::Release;
use crate::slot::{Entry, Slot, SlotDump, SlotState};
use crate::Result;
use core::fmt;

/// Open-addressing hash map from byte-span keys to owned values.
///
/// Keys are passed as anything that is `AsRef<[u8]>`. The map's
/// [`KeySize`] function decides how many leading bytes are significant;
/// only those are copied in, hashed and compared.
///
/// ```
/// use bytemap::{key_size, ByteMap};
///
/// let mut m = ByteMap::new(key_size::whole);
/// m.insert("a", 1)?;
/// m.insert("b", 2)?;
/// assert_eq!(m.get("b")?, Some(&2));
/// assert!(m.remove("a")?);
/// assert_eq!(m.get("a")?, None);
/// assert_eq!(m.len(), 1);
/// # Ok::<(), bytemap::Error>(())
/// ```
pub struct ByteMap<V, S = DefaultKeyHasher> {
    raw: RawTable<V>,
    key_size: KeySize,
    hasher: S,
    release: Release<V>,
    reentrancy: DebugReentrancy,
}

impl<V> ByteMap<V> {
    /// An empty, unallocated map using the default hasher.
    pub fn new(key_size: KeySize) -> Self {
        Self::with_hasher(key_size, DefaultKeyHasher)
    }

    pub fn builder() -> Builder<V> {
        Builder::new()
    }
}

/// Iterator over the entries of a `ByteMap`, in slot order.
pub struct Iter<'a, V> {
    it: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .by_ref()
            .flatten()
            .next()
            .map(|e| (&*e.key, &e.value))
    }
}

/// Iterator over the entries of a `ByteMap` with mutable values.
pub struct IterMut<'a, V> {
    it: core::slice::IterMut<'a, Slot<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a [u8], &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .by_ref()
            .flatten()
            .next()
            .map(|e| (&*e.key, &mut e.value))
    }
}

impl<V, S: KeyHasher> ByteMap<V, S> {
    /// An empty, unallocated map using `hasher`.
    pub fn with_hasher(key_size: KeySize, hasher: S) -> Self {
        Self::from_parts(RawTable::new(), key_size, hasher, Release::none())
    }

    pub(crate) fn from_parts(
        raw: RawTable<V>,
        key_size: KeySize,
        hasher: S,
        release: Release<V>,
    ) -> Self {
        Self {
            raw,
            key_size,
            hasher,
            release,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Number of slots; 0 until the first insert unless pre-sized.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Significant bytes of `key` and their hash.
    #[inline]
    fn locate<'k>(&self, key: &'k [u8]) -> Result<(&'k [u8], u64)> {
        let key = key_size::significant(self.key_size, key)?;
        Ok((key, self.hasher.hash_key(key)))
    }

    /// Look up the value stored under `key`.
    pub fn get<K>(&self, key: &K) -> Result<Option<&V>>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let _g = self.reentrancy.enter("get");
        let (key, hash) = self.locate(key.as_ref())?;
        Ok(self.raw.find(hash, key).map(|i| &self.raw.entry(i).value))
    }

    pub fn get_mut<K>(&mut self, key: &K) -> Result<Option<&mut V>>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let _g = self.reentrancy.enter("get_mut");
        let (key, hash) = self.locate(key.as_ref())?;
        match self.raw.find(hash, key) {
            Some(i) => Ok(Some(&mut self.raw.entry_mut(i).value)),
            None => Ok(None),
        }
    }

    pub fn contains<K>(&self, key: &K) -> Result<bool>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let _g = self.reentrancy.enter("contains");
        let (key, hash) = self.locate(key.as_ref())?;
        Ok(self.raw.find(hash, key).is_some())
    }

    /// Store `value` under `key`.
    ///
    /// Returns the previous value if the key was present; it is handed back
    /// to the caller rather than to the value-release hook.
    pub fn insert<K>(&mut self, key: &K, value: V) -> Result<Option<V>>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let _g = self.reentrancy.enter("insert");
        let (key, hash) = self.locate(key.as_ref())?;
        self.raw.reserve_one()?;
        match self.raw.probe(hash, key) {
            Probed::Found(i) => Ok(Some(core::mem::replace(
                &mut self.raw.entry_mut(i).value,
                value,
            ))),
            Probed::Vacant(i) => {
                self.raw.occupy(i, Entry::new(key, value, hash));
                Ok(None)
            }
        }
    }

    /// Overwrite the value under `key` only if the key is present.
    ///
    /// Returns the previous value. On a missing key nothing is written,
    /// `value` is dropped and `None` is returned.
    pub fn replace<K>(&mut self, key: &K, value: V) -> Result<Option<V>>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let _g = self.reentrancy.enter("replace");
        let (key, hash) = self.locate(key.as_ref())?;
        self.raw.reserve_one()?;
        match self.raw.probe(hash, key) {
            Probed::Found(i) => Ok(Some(core::mem::replace(
                &mut self.raw.entry_mut(i).value,
                value,
            ))),
            Probed::Vacant(_) => Ok(None),
        }
    }

    /// Store `value` under `key` only if the key is absent.
    ///
    /// Returns the current value if the key was already present, in which
    /// case `value` is dropped; `None` if `value` was stored.
    pub fn emplace<K>(&mut self, key: &K, value: V) -> Result<Option<&V>>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let _g = self.reentrancy.enter("emplace");
        let (key, hash) = self.locate(key.as_ref())?;
        self.raw.reserve_one()?;
        match self.raw.probe(hash, key) {
            Probed::Found(i) => Ok(Some(&self.raw.entry(i).value)),
            Probed::Vacant(i) => {
                self.raw.occupy(i, Entry::new(key, value, hash));
                Ok(None)
            }
        }
    }

    /// Unlink the entry for `key`, compacting its probe run.
    fn unlink(&mut self, key: &[u8], op: &'static str) -> Result<Option<Entry<V>>> {
        let _g = self.reentrancy.enter(op);
        let (key, hash) = self.locate(key)?;
        Ok(self.raw.find(hash, key).map(|i| self.raw.remove_at(i)))
    }

    /// Remove `key`, passing its stored key and value to the release hooks.
    ///
    /// Returns `false` if the key was absent.
    pub fn remove<K>(&mut self, key: &K) -> Result<bool>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        // Hooks run after the guard is released and the table is consistent.
        match self.unlink(key.as_ref(), "remove")? {
            Some(entry) => {
                self.release.entry(entry);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove `key` and move its value out to the caller.
    ///
    /// The stored key still goes to the key-release hook; the value does
    /// not reach the value-release hook.
    pub fn take<K>(&mut self, key: &K) -> Result<Option<V>>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        match self.unlink(key.as_ref(), "take")? {
            Some(Entry { key, value, .. }) => {
                self.release.key(key);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Release every entry and return to the unallocated state.
    pub fn clear(&mut self) {
        let slots = {
            let _g = self.reentrancy.enter("clear");
            self.raw.take_all()
        };
        for entry in slots.into_iter().flatten() {
            self.release.entry(entry);
        }
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.raw.slots().iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.raw.slots_mut().iter_mut(),
        }
    }

    /// State of every slot, in index order. Diagnostic only.
    pub fn slot_states(&self) -> impl Iterator<Item = SlotState> + '_ {
        self.raw.slots().iter().map(SlotState::of)
    }

    /// Printable listing of every slot. Diagnostic only.
    pub fn dump_slots(&self) -> SlotDump<'_, V> {
        SlotDump {
            slots: self.raw.slots(),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.raw.assert_invariants();
    }
}

impl<V, S> Drop for ByteMap<V, S> {
    fn drop(&mut self) {
        for entry in self.raw.take_all().into_iter().flatten() {
            self.release.entry(entry);
        }
    }
}

impl<V: fmt::Debug, S: KeyHasher> fmt::Debug for ByteMap<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V, S: KeyHasher> IntoIterator for &'a ByteMap<V, S> {
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
