//! Existence-gated dense map from a [FieldId] to a `usize`.

use std::marker::PhantomData;

use crate::{bit_storage::BitStorage, field::FieldId};

/// A lean field-to-integer map: one slot per field plus a presence bit per slot.
///
/// A slot's value is only meaningful while its presence bit is set. [FieldMap::remove]
/// clears the bit and leaves the old value in place.
#[derive(Debug, Clone)]
pub struct FieldMap<F: FieldId> {
    existence: BitStorage,
    values: Box<[usize]>,
    _fields: PhantomData<F>,
}

impl<F: FieldId> FieldMap<F> {
    /// Creates an empty map sized to `F::COUNT`.
    pub fn new() -> Self {
        Self {
            existence: BitStorage::new(F::COUNT),
            values: vec![0; F::COUNT].into_boxed_slice(),
            _fields: PhantomData,
        }
    }

    pub fn contains(&self, field: F) -> bool {
        // SAFETY: FieldId guarantees ordinal < COUNT, and existence holds COUNT bits.
        unsafe { self.existence.get_unchecked(field.ordinal()) }
    }

    /// Returns the stored value, or `None` if the field has no value.
    pub fn get(&self, field: F) -> Option<usize> {
        self.contains(field).then(|| self.get_unchecked(field))
    }

    /// Reads the slot without checking presence. Garbage unless [FieldMap::contains] is true.
    pub(crate) fn get_unchecked(&self, field: F) -> usize {
        // SAFETY: FieldId guarantees ordinal < COUNT == values.len().
        unsafe { *self.values.get_unchecked(field.ordinal()) }
    }

    pub fn insert(&mut self, field: F, value: usize) {
        let ordinal = field.ordinal();
        // SAFETY: FieldId guarantees ordinal < COUNT for both the slots and the presence bits.
        unsafe {
            *self.values.get_unchecked_mut(ordinal) = value;
            self.existence.set_unchecked(ordinal, true);
        }
    }

    /// Marks the field absent. The stale value stays in its slot.
    pub fn remove(&mut self, field: F) {
        // SAFETY: FieldId guarantees ordinal < COUNT.
        unsafe { self.existence.set_unchecked(field.ordinal(), false) }
    }

    /// Number of fields with a value.
    pub fn len(&self) -> usize {
        self.existence
            .words()
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.existence.is_clear()
    }
}

impl<F: FieldId> Default for FieldMap<F> {
    fn default() -> Self {
        Self::new()
    }
}
