//! Memoization of field bit-lengths and bit-offsets for one decode session.
//!
//! A decoder often needs "how long is field X" or "where does field X start" from several
//! code paths. For dynamic fields the answer comes from walking the bitstream, so the first
//! answer is kept. Static fields are cheap to recompute and never take a cache slot.
//!
//! Compute functions receive the cache itself, which gives them the session context and
//! lets them query other fields reentrantly. Querying a field whose own first computation is
//! still running is not detected: a layout must not have circular length/offset dependencies.

use log::trace;

use crate::{field::FieldId, field_map::FieldMap};

/// Per-session cache of field lengths and offsets, owning the session context `C`
/// (typically a bit reader over the payload).
#[derive(Debug, Clone)]
pub struct LengthOffsetCache<F: FieldId, C> {
    context: C,
    lengths: FieldMap<F>,
    offsets: FieldMap<F>,
}

impl<F: FieldId, C> LengthOffsetCache<F, C> {
    /// Creates an empty cache with one length slot and one offset slot per field of `F`.
    pub fn new(context: C) -> Self {
        Self {
            context,
            lengths: FieldMap::new(),
            offsets: FieldMap::new(),
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Bit length of `field`, computed by `f` unless already cached.
    ///
    /// `f` runs on every call for static fields and at most once for dynamic ones.
    pub fn length<Func>(&mut self, field: F, f: Func) -> usize
    where
        Func: FnOnce(&mut Self) -> usize,
    {
        self.memoize(field, Facet::Length, f)
    }

    /// Bit offset of `field`, computed by `f` unless already cached.
    ///
    /// `f` runs on every call for static fields and at most once for dynamic ones.
    pub fn offset<Func>(&mut self, field: F, f: Func) -> usize
    where
        Func: FnOnce(&mut Self) -> usize,
    {
        self.memoize(field, Facet::Offset, f)
    }

    /// Cached length of `field`, without computing it.
    pub fn cached_length(&self, field: F) -> Option<usize> {
        self.lengths.get(field)
    }

    /// Cached offset of `field`, without computing it.
    pub fn cached_offset(&self, field: F) -> Option<usize> {
        self.offsets.get(field)
    }

    /// Forgets the cached length of `field`; the next [LengthOffsetCache::length] recomputes it.
    pub fn remove_length(&mut self, field: F) {
        self.lengths.remove(field);
    }

    /// Forgets the cached offset of `field`; the next [LengthOffsetCache::offset] recomputes it.
    pub fn remove_offset(&mut self, field: F) {
        self.offsets.remove(field);
    }

    /// Forgets both the cached length and offset of `field`.
    pub fn remove(&mut self, field: F) {
        self.remove_length(field);
        self.remove_offset(field);
    }

    fn facet(&mut self, facet: Facet) -> &mut FieldMap<F> {
        match facet {
            Facet::Length => &mut self.lengths,
            Facet::Offset => &mut self.offsets,
        }
    }

    fn memoize<Func>(&mut self, field: F, facet: Facet, f: Func) -> usize
    where
        Func: FnOnce(&mut Self) -> usize,
    {
        if !field.is_dynamic() {
            return f(self);
        }

        let map = self.facet(facet);
        if map.contains(field) {
            let value = map.get_unchecked(field);
            trace!("{:?} hit for field #{}: {}", facet, field.ordinal(), value);
            return value;
        }

        let value = f(self);
        trace!("{:?} computed for field #{}: {}", facet, field.ordinal(), value);
        self.facet(facet).insert(field, value);

        value
    }
}

#[derive(Debug, Clone, Copy)]
enum Facet {
    Length,
    Offset,
}
