//! Key measurement.
//!
//! A map is built with a [`KeySize`] function that tells it how many
//! leading bytes of a caller's key span are significant. Only those bytes
//! are hashed, compared and stored.

/// Returns the number of significant bytes at the start of a key span.
///
/// Reporting more bytes than the span holds is rejected with
/// [`Error::KeyOutOfBounds`](crate::Error::KeyOutOfBounds).
pub type KeySize = fn(&[u8]) -> usize;

/// The whole span is the key.
pub fn whole(key: &[u8]) -> usize {
    key.len()
}

/// Bytes before the first NUL, or the whole span if it has none.
pub fn nul_terminated(key: &[u8]) -> usize {
    key.iter().position(|&b| b == 0).unwrap_or(key.len())
}

/// Fixed-width keys, e.g. `fixed::<4>` for `u32::to_le_bytes`.
pub fn fixed<const N: usize>(_key: &[u8]) -> usize {
    N
}

/// Measure `key` and cut it down to its significant bytes.
pub(crate) fn significant(key_size: KeySize, key: &[u8]) -> crate::Result<&[u8]> {
    let size = key_size(key);
    key.get(..size).ok_or(crate::Error::KeyOutOfBounds {
        size,
        len: key.len(),
    })
}
