//! Bit primitives used by the tree engine
//!
//! Span of a packed key = lowest set bit
//! Span of an LCA = next power of two above the highest differing bit
//! All operations are O(1) and total: zero maps to zero.

/// Constant-time bit queries on unsigned integers.
pub trait BitMath: Copy {
    /// Value of the lowest set bit (`0` for `0`).
    fn lowest_set_bit(self) -> Self;

    /// Zero-based index of the most significant set bit (`0` for `0`).
    fn highest_set_bit_position(self) -> u32;

    /// Value of the most significant set bit (`0` for `0`).
    fn highest_set_bit_value(self) -> Self;
}

macro_rules! impl_bit_math {
    ($($t:ty),* $(,)?) => {
        $(
            impl BitMath for $t {
                #[inline]
                fn lowest_set_bit(self) -> Self {
                    self & self.wrapping_neg()
                }

                #[inline]
                fn highest_set_bit_position(self) -> u32 {
                    if self == 0 {
                        0
                    } else {
                        <$t>::BITS - 1 - self.leading_zeros()
                    }
                }

                #[inline]
                fn highest_set_bit_value(self) -> Self {
                    if self == 0 {
                        0
                    } else {
                        1 << self.highest_set_bit_position()
                    }
                }
            }
        )*
    };
}

impl_bit_math!(u8, u16, u32, u64, u128, usize);

/// Free-function form of [`BitMath::lowest_set_bit`].
#[inline]
pub fn lowest_set_bit<T: BitMath>(x: T) -> T {
    x.lowest_set_bit()
}

/// Free-function form of [`BitMath::highest_set_bit_position`].
#[inline]
pub fn highest_set_bit_position<T: BitMath>(x: T) -> u32 {
    x.highest_set_bit_position()
}

/// Free-function form of [`BitMath::highest_set_bit_value`].
#[inline]
pub fn highest_set_bit_value<T: BitMath>(x: T) -> T {
    x.highest_set_bit_value()
}
