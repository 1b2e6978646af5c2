//! Random-access reader over a bit-packed payload.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte.

use crate::{bit_storage::BitStorage, errors::ReadError};

#[derive(Debug, Clone, Copy)]
pub struct BitReader<'a> {
    data: &'a [u8],
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len_bits(&self) -> usize {
        self.data.len() * 8
    }

    fn check_range(&self, bit_pos: usize, n: usize) -> Result<(), ReadError> {
        if bit_pos
            .checked_add(n)
            .is_none_or(|end| end > self.len_bits())
        {
            return Err(ReadError::OutOfBounds);
        }

        Ok(())
    }

    /// Reads `n` bits starting at `bit_pos` as an unsigned value (max 64 bits).
    pub fn read_bits_at(&self, bit_pos: usize, n: usize) -> Result<u64, ReadError> {
        if n > 64 {
            return Err(ReadError::TooManyBitsRead);
        }
        self.check_range(bit_pos, n)?;

        let mut value = 0u64;
        let mut pos = bit_pos;
        let mut remaining = n;

        // Consume whole byte remainders at a time rather than single bits.
        while remaining > 0 {
            let byte = self.data[pos / 8];
            let skip = pos % 8;
            let take = (8 - skip).min(remaining);
            let chunk = (byte >> (8 - skip - take)) & (((1u16 << take) - 1) as u8);

            value = (value << take) | chunk as u64;
            pos += take;
            remaining -= take;
        }

        Ok(value)
    }

    pub fn read_bool_at(&self, bit_pos: usize) -> Result<bool, ReadError> {
        Ok(self.read_bits_at(bit_pos, 1)? == 1)
    }

    /// Copies the `n` bits at `bit_pos` into `storage` at indices `1..=n`, the 1-based layout
    /// of vendor and purpose bitfields. Grows `storage` as needed.
    pub fn read_bits_into(
        &self,
        bit_pos: usize,
        n: usize,
        storage: &mut BitStorage,
    ) -> Result<(), ReadError> {
        self.check_range(bit_pos, n)?;
        if n == 0 {
            return Ok(());
        }
        storage.ensure_capacity(n + 1);

        for chunk_start in (0..n).step_by(64) {
            let len = (n - chunk_start).min(64);
            let bits = self.read_bits_at(bit_pos + chunk_start, len)?;
            let first = chunk_start + 1;

            // SAFETY: every index written is <= n and storage holds n + 1 bits.
            unsafe {
                if bits == 0 || bits.count_ones() as usize == len {
                    storage.set_range_unchecked(first, first + len, bits != 0);
                } else {
                    for i in 0..len {
                        storage.set_unchecked(first + i, (bits >> (len - 1 - i)) & 1 == 1);
                    }
                }
            }
        }

        Ok(())
    }
}
