//! Default key hash and the hasher override seam.
//!
//! The built-in hash is an FNV-1a style XOR-multiply fold. Keys longer than
//! eight bytes are consumed two words per step: one word from the front and
//! one from a tail-aligned offset, so every byte is read at least once
//! without a separate remainder loop. Not collision resistant; plug in a
//! different `KeyHasher` when keys may be adversarial.

const OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
const PRIME: u64 = 591_798_841;

/// Maps a key's significant bytes to a 64-bit hash.
///
/// Implementations must be deterministic: equal byte spans hash equally
/// for the lifetime of the map.
pub trait KeyHasher {
    fn hash_key(&self, key: &[u8]) -> u64;
}

/// The built-in hasher, see [`hash_bytes`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultKeyHasher;

impl KeyHasher for DefaultKeyHasher {
    #[inline]
    fn hash_key(&self, key: &[u8]) -> u64 {
        hash_bytes(key)
    }
}

impl KeyHasher for fn(&[u8]) -> u64 {
    #[inline]
    fn hash_key(&self, key: &[u8]) -> u64 {
        self(key)
    }
}

#[inline]
fn word_at(bytes: &[u8], at: usize) -> u64 {
    let mut w = [0u8; 8];
    w.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(w)
}

#[inline]
fn fold(hash: u64) -> u64 {
    hash ^ (hash >> 32)
}

/// Hash `key` with the built-in double-stride fold.
///
/// Words are read little-endian, so the result does not depend on the
/// host's byte order.
pub fn hash_bytes(key: &[u8]) -> u64 {
    let len = key.len();
    let mut hash = OFFSET_BASIS;

    if len > 8 {
        let cycles = ((len - 1) >> 4) + 1;
        // Second stride is aligned so its last word ends exactly at `len`.
        let ndhead = len - (cycles << 3);
        for c in 0..cycles {
            let at = c << 3;
            hash = (hash ^ word_at(key, at)).wrapping_mul(PRIME);
            hash = (hash ^ word_at(key, at + ndhead)).wrapping_mul(PRIME);
        }
        return fold(hash);
    }

    let mut w = [0u8; 8];
    w[..len].copy_from_slice(key);
    hash = (hash ^ u64::from_le_bytes(w)).wrapping_mul(PRIME);
    fold(hash)
}
