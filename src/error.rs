//! Error type shared by every fallible `ByteMap` operation.

use std::collections::TryReserveError;

/// Represents errors that can occur while building or mutating a `ByteMap`.
///
/// A missing key is never an error; lookups report it as `None`/`false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `Builder::build` was called without a key-size function
    MissingKeySize,

    /// The key-size function reported more significant bytes than the
    /// key span holds
    KeyOutOfBounds {
        /// Size reported by the key-size function
        size: usize,
        /// Length of the span that was passed in
        len: usize,
    },

    /// Doubling the slot array would overflow `usize`
    CapacityOverflow,

    /// The slot array could not be allocated
    Alloc(TryReserveError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingKeySize => write!(f, "ByteMapError: a key-size function is required"),
            Self::KeyOutOfBounds { size, len } => write!(
                f,
                "ByteMapError: key size {size} exceeds the {len}-byte key span"
            ),
            Self::CapacityOverflow => write!(f, "ByteMapError: capacity overflow"),
            Self::Alloc(e) => write!(f, "ByteMapError: slot allocation failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Alloc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(value: TryReserveError) -> Self {
        Self::Alloc(value)
    }
}

/// Map result
pub type Result<T> = std::result::Result<T, Error>;
