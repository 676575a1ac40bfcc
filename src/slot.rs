//! Slot representation and the diagnostic slot dump.

use core::fmt;

/// An occupied slot's contents.
///
/// `hash` is computed once when the key is inserted; probing, backward
/// shifts and growth all reuse it, so the hasher never runs again for a
/// stored key.
#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

impl<V> Entry<V> {
    pub(crate) fn new(key: &[u8], value: V, hash: u64) -> Self {
        Self {
            key: key.into(),
            value,
            hash,
        }
    }

    /// Stored hash first, then length and bytes.
    #[inline]
    pub(crate) fn matches(&self, hash: u64, key: &[u8]) -> bool {
        self.hash == hash && *self.key == *key
    }
}

/// One cell of the slot array; `None` is vacant.
pub(crate) type Slot<V> = Option<Entry<V>>;

/// Observable state of a slot.
///
/// Deletion compacts probe runs in place, so there is no tombstone state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    Vacant,
    Occupied,
}

impl SlotState {
    pub(crate) fn of<V>(slot: &Slot<V>) -> Self {
        match slot {
            Some(_) => SlotState::Occupied,
            None => SlotState::Vacant,
        }
    }
}

/// Human-readable listing of every slot, one per line.
///
/// Intended for debugging; the format is not stable.
pub struct SlotDump<'a, V> {
    pub(crate) slots: &'a [Slot<V>],
}

impl<V> fmt::Display for SlotDump<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.slots.len().saturating_sub(1).to_string().len();
        for (i, slot) in self.slots.iter().enumerate() {
            match slot {
                Some(e) => writeln!(
                    f,
                    "[{i:>width$}] occupied hash={:#018x} key_len={}",
                    e.hash,
                    e.key.len()
                )?,
                None => writeln!(f, "[{i:>width$}] vacant")?,
            }
        }
        Ok(())
    }
}
