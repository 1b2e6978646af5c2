//! # bitmemo
//!
//! Bit storage and field memoization primitives for decoders of densely bit-packed formats,
//! where fields sit at arbitrary bit offsets and some widths are only known after reading
//! earlier fields.
//!
//! - [bit_storage::BitStorage]: growable `u64`-word bit array with unchecked single-bit and
//!   range operations.
//! - [cache::LengthOffsetCache]: computes each dynamic field's bit length and offset at most
//!   once per session; static fields are always recomputed.
//! - [field::FieldId] and [field_ids!]: the closed field enumeration the cache is indexed by.
//!
//! ## Example
//!
//! ```
//! use bitmemo::bit_reader::BitReader;
//! use bitmemo::cache::LengthOffsetCache;
//!
//! bitmemo::field_ids! {
//!     enum Field {
//!         MaxVendorId: static,
//!         VendorBits: dynamic,
//!     }
//! }
//!
//! let payload = [0b0000_0101, 0b1011_0000];
//! let mut cache = LengthOffsetCache::<Field, _>::new(BitReader::new(&payload));
//!
//! assert_eq!(cache.length(Field::MaxVendorId, |_| 8), 8);
//!
//! let vendor_bits = cache.length(Field::VendorBits, |cache| {
//!     cache.context().read_bits_at(0, 8).unwrap() as usize
//! });
//! assert_eq!(vendor_bits, 5);
//! assert_eq!(cache.cached_length(Field::VendorBits), Some(5));
//! ```

pub mod bit_reader;
pub mod bit_storage;
pub mod cache;
pub mod errors;
pub mod field;
pub mod field_map;
