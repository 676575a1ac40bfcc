//! Linear probe sequence and growth policy.
//!
//! Capacities are always 0 (unallocated) or a power of two, so wrapping is
//! a mask instead of a modulo: probe `i` for hash `h` lands on
//! `(h + i) & (capacity - 1)`.

use crate::{Error, Result};

/// Smallest allocated capacity.
pub(crate) const MIN_CAPACITY: usize = 2;

// Load factor 3/4.
const LOAD_NUM: usize = 3;
const LOAD_DEN: usize = 4;

/// Linear probe over a power-of-two slot array.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Probe {
    i: usize,
    mask: usize,
}

impl Probe {
    #[inline]
    pub(crate) fn start(hash: u64, capacity: usize) -> Probe {
        debug_assert!(capacity.is_power_of_two());
        let mask = capacity - 1;
        Probe {
            i: home(hash, mask),
            mask,
        }
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.i
    }

    #[inline]
    pub(crate) fn next(&mut self) {
        self.i = (self.i + 1) & self.mask;
    }
}

/// Probe index 0 for `hash`.
#[inline]
pub(crate) fn home(hash: u64, mask: usize) -> usize {
    (hash as usize) & mask
}

/// Forward steps from `from` to `to`, wrapping at the end of the array.
#[inline]
pub(crate) fn distance(from: usize, to: usize, mask: usize) -> usize {
    to.wrapping_sub(from) & mask
}

/// Whether adding one entry to `len` would break the load factor.
#[inline]
pub(crate) fn needs_growth(len: usize, capacity: usize) -> bool {
    len.saturating_add(1).saturating_mul(LOAD_DEN) > capacity.saturating_mul(LOAD_NUM)
}

/// The capacity that follows `capacity`.
pub(crate) fn grown(capacity: usize) -> Result<usize> {
    if capacity == 0 {
        return Ok(MIN_CAPACITY);
    }
    capacity.checked_mul(2).ok_or(Error::CapacityOverflow)
}

/// Smallest capacity holding `entries` within the load factor.
pub(crate) fn capacity_for(entries: usize) -> Result<usize> {
    if entries == 0 {
        return Ok(0);
    }
    let slots = entries
        .checked_mul(LOAD_DEN)
        .ok_or(Error::CapacityOverflow)?
        .div_ceil(LOAD_NUM);
    slots
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .ok_or(Error::CapacityOverflow)
}
