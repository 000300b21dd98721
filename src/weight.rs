//! Numeric abstraction over client weights.
//!
//! The segment table only needs checked addition, checked multiplication by a
//! client index and an ordering, so integer and floating weights share one
//! implementation. Integer weights give exact costs. Float costs are sums of
//! non-negative terms and carry only the rounding of those additions.

use std::fmt::Debug;

/// A client weight, and the cost type derived from it.
///
/// All cost arithmetic goes through the checked operations, so a sum that
/// leaves the range of the type (or turns non-finite for floats) is reported
/// instead of wrapping, panicking or producing NaN.
pub trait Weight: Copy + Debug + PartialOrd {
    /// Additive identity.
    const ZERO: Self;

    /// Converts a 0-based client index into the weight domain, or `None` when
    /// the index does not fit.
    fn from_index(index: usize) -> Option<Self>;

    /// Whether the value may be used as a client weight (finite, non-negative).
    fn is_admissible(self) -> bool;

    /// `self + rhs`, or `None` when the result is not representable.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// `self * rhs`, or `None` when the result is not representable.
    fn checked_mul(self, rhs: Self) -> Option<Self>;
}

macro_rules! unsigned_weight {
    ($($t:ty),*) => {$(
        impl Weight for $t {
            const ZERO: Self = 0;

            #[inline]
            fn from_index(index: usize) -> Option<Self> {
                <$t>::try_from(index).ok()
            }

            #[inline]
            fn is_admissible(self) -> bool {
                true
            }

            #[inline]
            fn checked_add(self, rhs: Self) -> Option<Self> {
                <$t>::checked_add(self, rhs)
            }

            #[inline]
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                <$t>::checked_mul(self, rhs)
            }
        }
    )*};
}

macro_rules! signed_weight {
    ($($t:ty),*) => {$(
        impl Weight for $t {
            const ZERO: Self = 0;

            #[inline]
            fn from_index(index: usize) -> Option<Self> {
                <$t>::try_from(index).ok()
            }

            #[inline]
            fn is_admissible(self) -> bool {
                self >= 0
            }

            #[inline]
            fn checked_add(self, rhs: Self) -> Option<Self> {
                <$t>::checked_add(self, rhs)
            }

            #[inline]
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                <$t>::checked_mul(self, rhs)
            }
        }
    )*};
}

macro_rules! float_weight {
    ($($t:ty),*) => {$(
        impl Weight for $t {
            const ZERO: Self = 0.0;

            #[inline]
            fn from_index(index: usize) -> Option<Self> {
                Some(index as $t)
            }

            #[inline]
            fn is_admissible(self) -> bool {
                self.is_finite() && self >= 0.0
            }

            #[inline]
            fn checked_add(self, rhs: Self) -> Option<Self> {
                let sum = self + rhs;
                sum.is_finite().then_some(sum)
            }

            #[inline]
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                let product = self * rhs;
                product.is_finite().then_some(product)
            }
        }
    )*};
}

unsigned_weight!(u32, u64, usize);
signed_weight!(i32, i64, isize);
float_weight!(f32, f64);
