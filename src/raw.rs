//! RawTable: the slot array, probing, growth and backward-shift deletion.
//!
//! This layer never calls user code. Callers hash and measure keys first
//! and pass `(hash, key)` pairs in; everything here works on stored hashes.

use crate::probe::{self, Probe};
use crate::slot::{Entry, Slot};
use crate::Result;

/// Result of walking a probe sequence for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Probed {
    /// The key is stored at this index.
    Found(usize),
    /// The key is absent; this is the first vacant slot on its sequence.
    Vacant(usize),
}

pub(crate) struct RawTable<V> {
    slots: Vec<Slot<V>>,
    len: usize,
}

impl<V> RawTable<V> {
    /// An unallocated table.
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    /// A table pre-sized to hold `entries` without growing.
    pub(crate) fn with_entries(entries: usize) -> Result<Self> {
        let mut table = Self::new();
        let capacity = probe::capacity_for(entries)?;
        if capacity > 0 {
            table.slots = vacant_slots(capacity)?;
            log::trace!("Pre-sized byte map to {capacity} slots for {entries} entries");
        }
        Ok(table)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn mask(&self) -> usize {
        debug_assert!(self.capacity().is_power_of_two());
        self.capacity() - 1
    }

    pub(crate) fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Slot<V>] {
        &mut self.slots
    }

    /// Index of `key`, if stored.
    pub(crate) fn find(&self, hash: u64, key: &[u8]) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        match self.probe(hash, key) {
            Probed::Found(i) => Some(i),
            Probed::Vacant(_) => None,
        }
    }

    /// Walk the probe sequence for `key` until it is found or a vacant slot
    /// ends the run. The table must be allocated and not full.
    pub(crate) fn probe(&self, hash: u64, key: &[u8]) -> Probed {
        let mut p = Probe::start(hash, self.capacity());
        for _ in 0..self.capacity() {
            match &self.slots[p.index()] {
                None => return Probed::Vacant(p.index()),
                Some(e) if e.matches(hash, key) => return Probed::Found(p.index()),
                Some(_) => p.next(),
            }
        }
        unreachable!("probe ran through a full table of {} slots", self.capacity())
    }

    pub(crate) fn entry(&self, index: usize) -> &Entry<V> {
        match &self.slots[index] {
            Some(e) => e,
            None => unreachable!("slot {index} is vacant"),
        }
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> &mut Entry<V> {
        match &mut self.slots[index] {
            Some(e) => e,
            None => unreachable!("slot {index} is vacant"),
        }
    }

    /// Write a new entry into a slot returned as `Probed::Vacant`.
    pub(crate) fn occupy(&mut self, index: usize, entry: Entry<V>) -> &mut Entry<V> {
        debug_assert!(self.slots[index].is_none());
        self.len += 1;
        self.slots[index].insert(entry)
    }

    /// Make room for one more entry, growing if the load factor requires.
    pub(crate) fn reserve_one(&mut self) -> Result<()> {
        if probe::needs_growth(self.len, self.capacity()) {
            self.grow()?;
        }
        Ok(())
    }

    /// Rehash into a fresh array of twice the capacity.
    ///
    /// The new array is fully allocated before the old one is touched, so a
    /// failed allocation leaves the table as it was.
    fn grow(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let capacity = probe::grown(old_capacity)?;
        let fresh = vacant_slots(capacity)?;
        let old = std::mem::replace(&mut self.slots, fresh);

        for entry in old.into_iter().flatten() {
            let mut p = Probe::start(entry.hash, capacity);
            while self.slots[p.index()].is_some() {
                p.next();
            }
            self.slots[p.index()] = Some(entry);
        }

        log::trace!(
            "Grew byte map from {old_capacity} to {capacity} slots ({} entries)",
            self.len
        );
        Ok(())
    }

    /// Remove the entry at `index`, compacting its probe run.
    ///
    /// Walks forward from the hole through the occupied run. An entry may
    /// move back into the hole iff the hole lies on its probe path, i.e.
    /// cyclically within `[home, current)`. The walk ends at the first
    /// vacant slot and the last hole is left vacant.
    pub(crate) fn remove_at(&mut self, index: usize) -> Entry<V> {
        let removed = match self.slots[index].take() {
            Some(e) => e,
            None => unreachable!("removing vacant slot {index}"),
        };
        self.len -= 1;

        let mask = self.mask();
        let mut hole = index;
        let mut next = (index + 1) & mask;
        loop {
            let home = match &self.slots[next] {
                Some(e) => probe::home(e.hash, mask),
                None => break,
            };
            if probe::distance(home, next, mask) >= probe::distance(hole, next, mask) {
                self.slots[hole] = self.slots[next].take();
                hole = next;
            }
            next = (next + 1) & mask;
        }

        removed
    }

    /// Empty the table back to its unallocated state, handing out the old
    /// slots.
    pub(crate) fn take_all(&mut self) -> Vec<Slot<V>> {
        self.len = 0;
        std::mem::take(&mut self.slots)
    }

    /// Panics unless every occupied slot is reachable from its home without
    /// crossing a vacant slot and the counters agree.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let cap = self.capacity();
        assert!(cap == 0 || cap.is_power_of_two(), "capacity {cap}");
        assert!(self.len * 4 <= cap * 3, "len {} over load at {cap}", self.len);
        let occupied = self.slots.iter().filter(|s| s.is_some()).count();
        assert_eq!(occupied, self.len);
        if cap == 0 {
            return;
        }
        let mask = self.mask();
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(e) = slot {
                let mut j = probe::home(e.hash, mask);
                while j != i {
                    assert!(
                        self.slots[j].is_some(),
                        "slot {i} unreachable: vacant {j} on its probe path"
                    );
                    j = (j + 1) & mask;
                }
            }
        }
    }
}

/// A fully vacant slot array, allocated fallibly.
fn vacant_slots<V>(capacity: usize) -> Result<Vec<Slot<V>>> {
    debug_assert!(capacity.is_power_of_two());
    let mut slots = Vec::new();
    if let Err(e) = slots.try_reserve_exact(capacity) {
        log::warn!("Failed to allocate {capacity} byte map slots: {e}");
        return Err(e.into());
    }
    slots.resize_with(capacity, || None);
    Ok(slots)
}
