//! Growable, word-packed bit array with an unchecked hot path.
//!
//! Bit `i` lives in word `i / 64` at position `i % 64` (LSB first). Capacity is always
//! `words.len() * 64`; it is never tracked separately.
//!
//! Construction and [BitStorage::ensure_capacity] form the checked boundary. Every other
//! mutation is an `unsafe fn` that assumes the caller already made the touched indices
//! addressable. Out-of-range indices trip a `debug_assert!` in debug builds and are
//! undefined behaviour in release builds.

use log::debug;

use crate::errors::StorageError;

const WORD_BITS: usize = 64;
const WORD_MASK: u64 = u64::MAX;

#[inline]
fn word_index(bit: usize) -> usize {
    bit >> 6
}

#[inline]
fn bit_index(bit: usize) -> usize {
    bit & 0x3f
}

#[inline]
fn words_for(nbits: usize) -> usize {
    nbits.div_ceil(WORD_BITS)
}

/// A lean bit set backed by `u64` words.
///
/// Unlike a general-purpose bit set this does no invariant checking on reads and writes.
/// Call [BitStorage::ensure_capacity] for the highest bit you intend to touch first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStorage {
    words: Vec<u64>,
}

impl BitStorage {
    /// Allocates enough zeroed words to hold `nbits` bits. `0` allocates nothing.
    pub fn new(nbits: usize) -> Self {
        Self {
            words: vec![0; words_for(nbits)],
        }
    }

    /// Like [BitStorage::new] for a signed size hint. Fails if `nbits` is negative.
    pub fn try_new(nbits: i64) -> Result<Self, StorageError> {
        if nbits < 0 {
            return Err(StorageError::NegativeCapacity(nbits));
        }

        let nbits = usize::try_from(nbits).map_err(|_| StorageError::CapacityOverflow)?;

        Ok(Self::new(nbits))
    }

    /// Number of addressable bits.
    pub fn capacity(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Grows the backing words so bits `0..nbits` are addressable.
    ///
    /// The new word count is the larger of twice the current count and the count required.
    /// Existing bits keep their positions and new words are zeroed. Never shrinks.
    pub fn ensure_capacity(&mut self, nbits: usize) {
        let required = words_for(nbits);
        let current = self.words.len();

        if current < required {
            let grown = current.saturating_mul(2).max(required);
            debug!("growing bit storage from {} to {} words", current, grown);
            self.words.resize(grown, 0);
        }
    }

    /// Raw backing words, including trailing zero words.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Backing words with trailing all-zero words removed.
    pub fn to_trimmed_words(&self) -> Vec<u64> {
        let len = self
            .words
            .iter()
            .rposition(|&word| word != 0)
            .map_or(0, |last| last + 1);

        self.words[..len].to_vec()
    }

    /// Returns true if no bit is set.
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Returns whether `bit` is set.
    ///
    /// # Safety
    ///
    /// `bit` must be less than [BitStorage::capacity].
    #[inline]
    pub unsafe fn get_unchecked(&self, bit: usize) -> bool {
        debug_assert!(bit < self.capacity(), "bit {} out of capacity {}", bit, self.capacity());

        // SAFETY: the caller guarantees the word exists.
        let word = unsafe { *self.words.get_unchecked(word_index(bit)) };
        (word >> bit_index(bit)) & 1 == 1
    }

    /// Sets or clears a single bit.
    ///
    /// # Safety
    ///
    /// `bit` must be less than [BitStorage::capacity].
    #[inline]
    pub unsafe fn set_unchecked(&mut self, bit: usize, value: bool) {
        debug_assert!(bit < self.capacity(), "bit {} out of capacity {}", bit, self.capacity());

        // SAFETY: the caller guarantees the word exists.
        unsafe { self.apply_mask(word_index(bit), 1u64 << bit_index(bit), value) }
    }

    /// Sets or clears every bit in `start..end`. A no-op when `end <= start`.
    ///
    /// Interior words are assigned whole; only the first and last words are masked.
    ///
    /// # Safety
    ///
    /// When the range is non-empty, `end` must not exceed [BitStorage::capacity].
    pub unsafe fn set_range_unchecked(&mut self, start: usize, end: usize, value: bool) {
        if end <= start {
            return;
        }

        debug_assert!(end <= self.capacity(), "bit {} out of capacity {}", end - 1, self.capacity());

        let start_word = word_index(start);
        let end_word = word_index(end - 1);
        let first_word_mask = WORD_MASK << bit_index(start);
        let last_word_mask = WORD_MASK >> (63 - bit_index(end - 1));

        // SAFETY: start_word <= end_word < words.len() since end <= capacity.
        unsafe {
            if start_word == end_word {
                self.apply_mask(start_word, first_word_mask & last_word_mask, value);
            } else {
                self.apply_mask(start_word, first_word_mask, value);
                self.words
                    .get_unchecked_mut(start_word + 1..end_word)
                    .fill(if value { WORD_MASK } else { 0 });
                self.apply_mask(end_word, last_word_mask, value);
            }
        }
    }

    /// ORs `mask` into the word when `value` is true, otherwise clears the masked bits.
    ///
    /// # Safety
    ///
    /// `word` must be less than `words.len()`.
    #[inline]
    unsafe fn apply_mask(&mut self, word: usize, mask: u64, value: bool) {
        // SAFETY: forwarded from the caller.
        let slot = unsafe { self.words.get_unchecked_mut(word) };
        if value {
            *slot |= mask;
        } else {
            *slot &= !mask;
        }
    }
}

impl TryFrom<i64> for BitStorage {
    type Error = StorageError;

    fn try_from(nbits: i64) -> Result<Self, Self::Error> {
        Self::try_new(nbits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sizes_to_whole_words() {
        assert_eq!(BitStorage::new(0).words().len(), 0);
        assert_eq!(BitStorage::new(1).words().len(), 1);
        assert_eq!(BitStorage::new(64).words().len(), 1);
        assert_eq!(BitStorage::new(65).words().len(), 2);
        assert_eq!(BitStorage::new(65).capacity(), 128);
    }

    #[test]
    fn test_try_new_negative() {
        assert_eq!(
            BitStorage::try_new(-1).unwrap_err(),
            StorageError::NegativeCapacity(-1)
        );
        assert_eq!(
            BitStorage::try_from(-64).unwrap_err(),
            StorageError::NegativeCapacity(-64)
        );
    }

    #[cfg(not(target_pointer_width = "64"))]
    #[test]
    fn test_try_new_overflow() {
        assert_eq!(
            BitStorage::try_new(i64::MAX).unwrap_err(),
            StorageError::CapacityOverflow
        );
    }

    #[test]
    fn test_try_new_valid() {
        assert_eq!(BitStorage::try_new(0).unwrap(), BitStorage::default());
        assert_eq!(BitStorage::try_new(100).unwrap().capacity(), 128);
    }

    #[test]
    fn test_ensure_capacity_growth_policy() {
        let mut bs = BitStorage::new(0);
        bs.ensure_capacity(0);
        assert_eq!(bs.words().len(), 0);

        // Nothing to double yet: grows to exactly what is required.
        bs.ensure_capacity(1);
        assert_eq!(bs.words().len(), 1);

        bs.ensure_capacity(64);
        assert_eq!(bs.words().len(), 1);

        // Doubling wins over the single word required.
        bs.ensure_capacity(65);
        assert_eq!(bs.words().len(), 2);

        // Required size wins over doubling.
        bs.ensure_capacity(1000);
        assert_eq!(bs.words().len(), 16);

        bs.ensure_capacity(1025);
        assert_eq!(bs.words().len(), 32);
    }

    #[test]
    fn test_single_operations() {
        let mut bs = BitStorage::new(0);
        assert!(bs.to_trimmed_words().is_empty());

        bs.ensure_capacity(1000);
        assert_eq!(bs.to_trimmed_words().len(), 0);
        unsafe { bs.set_unchecked(999, true) };
        assert_eq!(bs.to_trimmed_words().len(), 16);
        for i in 0..999 {
            assert!(!unsafe { bs.get_unchecked(i) });
        }
        assert!(unsafe { bs.get_unchecked(999) });

        let mut bs = BitStorage::new(0);
        bs.ensure_capacity(1);
        unsafe {
            bs.set_unchecked(0, true);
            assert!(bs.get_unchecked(0));
        }
        assert_eq!(bs.to_trimmed_words().len(), 1);

        bs.ensure_capacity(64);
        unsafe {
            bs.set_unchecked(63, true);
            assert!(bs.get_unchecked(63));
            assert!(!bs.get_unchecked(62));
            bs.set_unchecked(63, true);
            assert!(bs.get_unchecked(63));
            assert!(!bs.get_unchecked(62));
        }
        assert_eq!(bs.to_trimmed_words().len(), 1);

        bs.ensure_capacity(65);
        unsafe {
            bs.set_unchecked(64, true);
            assert!(bs.get_unchecked(64));
            assert!(bs.get_unchecked(63));
            assert!(!bs.get_unchecked(62));
        }
        assert_eq!(bs.to_trimmed_words().len(), 2);

        unsafe {
            bs.set_unchecked(0, false);
            assert!(!bs.get_unchecked(0));
            assert!(!bs.get_unchecked(1));

            bs.set_unchecked(50, false);
            assert!(!bs.get_unchecked(49));
            assert!(!bs.get_unchecked(50));
            assert!(!bs.get_unchecked(51));

            bs.set_unchecked(63, false);
            assert!(!bs.get_unchecked(62));
            assert!(!bs.get_unchecked(63));
            assert!(bs.get_unchecked(64));

            bs.set_unchecked(64, false);
            for i in 0..65 {
                assert!(!bs.get_unchecked(i));
            }
        }
        assert!(bs.is_clear());
    }

    #[test]
    fn test_bulk_operations() {
        let mut bs = BitStorage::new(0);
        bs.ensure_capacity(1000);

        unsafe { bs.set_range_unchecked(2, 100, true) };
        assert_eq!(bs.to_trimmed_words().len(), 2);
        for i in 0..1000 {
            assert_eq!(unsafe { bs.get_unchecked(i) }, (2..100).contains(&i), "bit {}", i);
        }

        unsafe {
            bs.set_range_unchecked(60, 70, false);
            bs.set_range_unchecked(63, 65, true);
            bs.set_unchecked(40, false);
            bs.set_unchecked(61, true);
        }
        for i in 0..1000 {
            let expected = (2..100).contains(&i)
                && i != 40
                && i != 60
                && i != 62
                && !(65..70).contains(&i);
            assert_eq!(unsafe { bs.get_unchecked(i) }, expected, "bit {}", i);
        }
    }

    #[test]
    fn test_set_range_word_boundaries() {
        let mut bs = BitStorage::new(256);

        unsafe { bs.set_range_unchecked(0, 64, true) };
        assert_eq!(bs.words(), &[WORD_MASK, 0, 0, 0]);

        unsafe { bs.set_range_unchecked(64, 256, true) };
        assert_eq!(bs.words(), &[WORD_MASK; 4]);

        unsafe { bs.set_range_unchecked(1, 255, false) };
        assert_eq!(bs.words(), &[1, 0, 0, 1 << 63]);
    }

    #[test]
    fn test_set_range_empty_is_noop() {
        let mut bs = BitStorage::new(0);
        unsafe {
            bs.set_range_unchecked(10, 10, true);
            bs.set_range_unchecked(10, 5, true);
        }
        assert_eq!(bs.capacity(), 0);

        let mut bs = BitStorage::new(64);
        unsafe { bs.set_range_unchecked(40, 3, true) };
        assert!(bs.is_clear());
    }

    #[test]
    fn test_growth_preserves_bits() {
        let mut bs = BitStorage::new(10);
        unsafe {
            bs.set_unchecked(3, true);
            bs.set_unchecked(63, true);
        }
        bs.ensure_capacity(300);
        unsafe {
            assert!(bs.get_unchecked(3));
            assert!(bs.get_unchecked(63));
            for i in 64..300 {
                assert!(!bs.get_unchecked(i));
            }
        }
    }
}
