//! Field identifiers: a closed, densely indexed enumeration of the fields in a bit-packed layout.

/// A field of a bit-packed layout, identified by its position in a fixed enumeration.
///
/// Static fields have a length and offset fixed by the layout. Dynamic fields depend on
/// bitstream content (e.g. a preceding count field) and are the only ones worth caching.
///
/// Prefer [crate::field_ids] over implementing this by hand.
///
/// # Safety
///
/// `ordinal` must return a value in `0..COUNT` for every value of the type, and distinct
/// fields must have distinct ordinals. [crate::cache::LengthOffsetCache] indexes its storage
/// by ordinal without bounds checks.
pub unsafe trait FieldId: Copy {
    /// Number of fields in the enumeration.
    const COUNT: usize;

    /// Dense index of this field in `0..COUNT`.
    fn ordinal(self) -> usize;

    /// Whether the length/offset of this field depends on bitstream content.
    fn is_dynamic(self) -> bool;
}

/// Declares a fieldless enum of field identifiers and implements [FieldId] for it.
///
/// Each variant is tagged `static` or `dynamic`. Variants are numbered in declaration order,
/// and an `ALL` constant lists them in that order.
///
/// ```
/// use bitmemo::field::FieldId;
///
/// bitmemo::field_ids! {
///     pub enum CoreField {
///         Version: static,
///         VendorCount: static,
///         VendorBits: dynamic,
///     }
/// }
///
/// assert_eq!(CoreField::COUNT, 3);
/// assert_eq!(CoreField::VendorBits.ordinal(), 2);
/// assert!(CoreField::VendorBits.is_dynamic());
/// assert!(!CoreField::Version.is_dynamic());
/// ```
#[macro_export]
macro_rules! field_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident : $kind:tt ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            /// Every field, in ordinal order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),*];
        }

        // SAFETY: fieldless enum without explicit discriminants, so `as usize` is dense in 0..COUNT.
        unsafe impl $crate::field::FieldId for $name {
            const COUNT: usize = $name::ALL.len();

            #[inline]
            fn ordinal(self) -> usize {
                self as usize
            }

            #[inline]
            fn is_dynamic(self) -> bool {
                match self {
                    $( $name::$variant => $crate::__field_kind!($kind), )*
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_kind {
    (static) => {
        false
    };
    (dynamic) => {
        true
    };
}

#[cfg(test)]
mod tests {
    use super::FieldId;

    crate::field_ids! {
        enum Sample {
            A: static,
            B: dynamic,
            /// Doc comments on variants are allowed.
            C: static,
            D: dynamic,
        }
    }

    #[test]
    fn test_ordinals_are_dense() {
        assert_eq!(Sample::COUNT, 4);
        for (i, field) in Sample::ALL.iter().enumerate() {
            assert_eq!(field.ordinal(), i);
        }
    }

    #[test]
    fn test_dynamic_flags() {
        let dynamic: Vec<Sample> = Sample::ALL
            .iter()
            .copied()
            .filter(|field| field.is_dynamic())
            .collect();
        assert_eq!(dynamic, vec![Sample::B, Sample::D]);
    }
}
