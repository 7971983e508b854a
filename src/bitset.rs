//! Fixed-capacity bitsets for symbols and house cells
//!
//! The engine deals with sets of symbols and sets of cell positions inside a
//! house all the time. Both have up to N² elements for a grid of box order N.
//! Efficient storage is important for maximal performance, but it should not
//! be possible to confuse bitmasks for different things, so symbols and house
//! cells get separate, otherwise identical set types.
//!
//! Capacity is fixed at 128 bits, enough for every supported [`Order`].
//! All operations are total; out-of-range bit indices are programming errors
//! and only checked via `debug_assert!`.
//!
//! [`Order`]: crate::board::Order

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign};

macro_rules! impl_bitset {
    ($(#[$doc:meta])* $name:ident, $iter_name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub(crate) u128);

        impl $name {
            /// The empty set.
            pub const NONE: $name = $name(0);

            /// Returns the set containing the first `n` elements.
            ///
            /// This is the "all elements" set for a grid with `n` symbols
            /// or house cells.
            #[inline]
            pub fn all(n: u8) -> Self {
                debug_assert!(n < 128);
                $name((1u128 << n) - 1)
            }

            /// Returns the set containing only `idx`.
            #[inline]
            pub fn from_index(idx: u8) -> Self {
                debug_assert!(idx < 128);
                $name(1u128 << idx)
            }

            /// Checks whether `idx` is contained in this set.
            #[inline]
            pub fn contains(self, idx: u8) -> bool {
                debug_assert!(idx < 128);
                self.0 & (1u128 << idx) != 0
            }

            /// Inserts `idx` into this set.
            #[inline]
            pub fn set(&mut self, idx: u8) {
                debug_assert!(idx < 128);
                self.0 |= 1u128 << idx;
            }

            /// Deletes `idx` from this set.
            #[inline]
            pub fn unset(&mut self, idx: u8) {
                debug_assert!(idx < 128);
                self.0 &= !(1u128 << idx);
            }

            /// Returns the number of elements in this set.
            #[inline]
            pub fn len(self) -> u8 {
                self.0.count_ones() as u8
            }

            /// Checks whether this set contains no element.
            #[inline]
            pub fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// Returns the number of elements strictly below `idx`.
            ///
            /// Inverse of [`nth`](Self::nth).
            #[inline]
            pub fn count_below(self, idx: u8) -> u8 {
                debug_assert!(idx < 128);
                (self.0 & ((1u128 << idx) - 1)).count_ones() as u8
            }

            /// Returns the smallest element in this set.
            ///
            /// # Precondition
            /// The set must not be empty (`debug_assert!`ed).
            #[inline]
            pub fn first(self) -> u8 {
                debug_assert!(!self.is_empty());
                self.0.trailing_zeros() as u8
            }

            /// Returns the `n`th smallest element, counting from 0.
            ///
            /// # Precondition
            /// The set must contain more than `n` elements (`debug_assert!`ed).
            #[inline]
            pub fn nth(self, n: u8) -> u8 {
                debug_assert!(self.len() > n);
                let mut bits = self.0;
                for _ in 0..n {
                    bits &= bits - 1; // clear lowest set bit
                }
                bits.trailing_zeros() as u8
            }

            /// Returns the elements of this set that aren't present in `other`.
            #[inline]
            pub fn without(self, other: Self) -> Self {
                $name(self.0 & !other.0)
            }

            /// Deletes all elements from this set that are present in `other`.
            #[inline]
            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            /// Deletes all elements from this set that are not present in `other`.
            #[inline]
            pub fn retain(&mut self, other: Self) {
                self.0 &= other.0;
            }

            /// Checks if `self` and `other` contain any common element.
            #[inline]
            pub fn overlaps(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            /// Returns the only element, iff exactly 1 element exists.
            /// `None` for both the empty set and sets with multiple elements.
            #[inline]
            pub fn unique(self) -> Option<u8> {
                if self.0.is_power_of_two() {
                    Some(self.first())
                } else {
                    None
                }
            }

            /// Checks whether `idx` is contained in any of the three masks.
            ///
            /// The engine keeps one mask per house and a cell belongs to a
            /// row, a column and a block; testing and updating all three
            /// together saves recomputing the bit. Purely a performance
            /// helper, semantically identical to three separate calls.
            #[inline]
            pub fn test_any3(masks: [&Self; 3], idx: u8) -> bool {
                debug_assert!(idx < 128);
                (masks[0].0 | masks[1].0 | masks[2].0) & (1u128 << idx) != 0
            }

            /// Inserts `idx` into all three masks.
            #[inline]
            pub fn set3(masks: [&mut Self; 3], idx: u8) {
                debug_assert!(idx < 128);
                let bit = 1u128 << idx;
                let [a, b, c] = masks;
                a.0 |= bit;
                b.0 |= bit;
                c.0 |= bit;
            }

            /// Deletes `idx` from all three masks.
            #[inline]
            pub fn unset3(masks: [&mut Self; 3], idx: u8) {
                debug_assert!(idx < 128);
                let bit = !(1u128 << idx);
                let [a, b, c] = masks;
                a.0 &= bit;
                b.0 &= bit;
                c.0 &= bit;
            }

            /// Returns an iterator over the elements in ascending order.
            #[inline]
            pub fn iter(self) -> $iter_name {
                $iter_name(self.0)
            }
        }

        /// Iterator over the elements contained in the set.
        #[derive(Clone, Debug)]
        pub struct $iter_name(u128);

        impl Iterator for $iter_name {
            type Item = u8;

            #[inline]
            fn next(&mut self) -> Option<u8> {
                if self.0 == 0 {
                    return None;
                }
                let idx = self.0.trailing_zeros() as u8;
                self.0 &= self.0 - 1;
                Some(idx)
            }
        }

        impl IntoIterator for $name {
            type Item = u8;
            type IntoIter = $iter_name;

            fn into_iter(self) -> $iter_name {
                $iter_name(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:b})"), self.0)
            }
        }

        impl fmt::Binary for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:b}", self.0)
            }
        }

        impl_binary_bitops!(
            $name;
            BitAnd, bitand;
            BitOr, bitor;
            BitXor, bitxor;
        );

        impl_bitops_assign!(
            $name;
            BitAndAssign, bitand_assign;
            BitOrAssign, bitor_assign;
            BitXorAssign, bitxor_assign;
        );
    };
}

macro_rules! impl_binary_bitops {
    ( $type:ident; $( $trait:ident, $fn_name:ident);* $(;)* ) => {
        $(
            impl $trait for $type {
                type Output = Self;

                #[inline(always)]
                fn $fn_name(self, other: Self) -> Self {
                    $type($trait::$fn_name(self.0, other.0))
                }
            }
        )*
    };
}

macro_rules! impl_bitops_assign {
    ( $type:ident; $( $trait:ident, $fn_name:ident);* $(;)* ) => {
        $(
            impl $trait for $type {
                #[inline(always)]
                fn $fn_name(&mut self, other: Self) {
                    $trait::$fn_name(&mut self.0, other.0)
                }
            }
        )*
    };
}

impl_bitset!(
    /// Set of symbols; the candidate mask of a cell.
    ///
    /// Symbols are numbered `0..N²`. A cell is solved when its candidate
    /// mask has exactly one symbol left, contradictory when it has none.
    SymSet,
    SymSetIter
);
impl_bitset!(
    /// Set of cell positions within a single house (`0..N²`).
    CellSet,
    CellSetIter
);
