//! Error types for bit storage construction and bit reading.

use std::fmt;

/// Errors produced when constructing a [crate::bit_storage::BitStorage] from a signed size hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The requested number of bits is negative.
    NegativeCapacity(i64),
    /// The requested number of bits does not fit in `usize`. Only reachable on targets
    /// where `usize` is narrower than 64 bits.
    CapacityOverflow,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NegativeCapacity(nbits) => write!(f, "nbits < 0: {}", nbits),
            StorageError::CapacityOverflow => write!(f, "nbits does not fit in usize"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Errors produced when reading bits from a byte slice (see [crate::bit_reader::BitReader]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Requested bit range is beyond the end of the data.
    OutOfBounds,
    /// More than 64 bits were requested in a single read.
    TooManyBitsRead,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "bit range out of bounds"),
            ReadError::TooManyBitsRead => write!(f, "cannot read more than 64 bits at once"),
        }
    }
}

impl std::error::Error for ReadError {}
