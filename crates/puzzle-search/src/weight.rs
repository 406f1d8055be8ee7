//! Weight arithmetic shared by both search engines.
//!
//! Path totals, pruning bounds, and state-search costs all go through the
//! [`Weight`] trait, so a whole search runs over a single integer
//! representation chosen by the caller. Mixing representations inside one
//! search is a compile error rather than a runtime one.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::error::{Error, Result};

/// An integer type usable as an edge weight or accumulated search cost.
///
/// Implementations cover the primitive widths the library supports. All
/// arithmetic is checked; the free functions in this module turn a failed
/// operation into a crate error.
pub trait Weight: Copy + Ord + Hash + Debug + Display {
    /// The additive identity, used to seed running totals.
    const ZERO: Self;

    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    fn checked_mul(self, rhs: Self) -> Option<Self>;
    fn checked_div(self, rhs: Self) -> Option<Self>;
    fn checked_rem(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_weight {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Weight for $ty {
                const ZERO: Self = 0;

                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_add(self, rhs)
                }

                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_sub(self, rhs)
                }

                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_mul(self, rhs)
                }

                fn checked_div(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_div(self, rhs)
                }

                fn checked_rem(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_rem(self, rhs)
                }
            }
        )*
    };
}

impl_weight!(i32, i64, i128, u32, u64);

/// Add two weights, reporting overflow as an error.
pub fn add<W: Weight>(lhs: W, rhs: W) -> Result<W> {
    lhs.checked_add(rhs)
        .ok_or(Error::WeightOverflow { operation: "add" })
}

/// Subtract `rhs` from `lhs`, reporting overflow (or unsigned underflow)
/// as an error.
pub fn sub<W: Weight>(lhs: W, rhs: W) -> Result<W> {
    lhs.checked_sub(rhs)
        .ok_or(Error::WeightOverflow { operation: "subtract" })
}

/// Multiply two weights, reporting overflow as an error.
pub fn mul<W: Weight>(lhs: W, rhs: W) -> Result<W> {
    lhs.checked_mul(rhs)
        .ok_or(Error::WeightOverflow { operation: "multiply" })
}

/// Divide `lhs` by `rhs`. Division by zero gets its own error; the only
/// other failure is signed overflow (`MIN / -1`).
pub fn div<W: Weight>(lhs: W, rhs: W) -> Result<W> {
    if rhs == W::ZERO {
        return Err(Error::DivisionByZero);
    }
    lhs.checked_div(rhs)
        .ok_or(Error::WeightOverflow { operation: "divide" })
}

/// Remainder of `lhs / rhs`, with the same failure cases as [`div`].
pub fn rem<W: Weight>(lhs: W, rhs: W) -> Result<W> {
    if rhs == W::ZERO {
        return Err(Error::DivisionByZero);
    }
    lhs.checked_rem(rhs)
        .ok_or(Error::WeightOverflow { operation: "remainder" })
}

/// Sum an iterator of weights, stopping at the first overflow.
pub fn sum<W, I>(weights: I) -> Result<W>
where
    W: Weight,
    I: IntoIterator<Item = W>,
{
    let mut total = W::ZERO;
    for weight in weights {
        total = add(total, weight)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_sum() {
        assert_eq!(add(2i64, 3).unwrap(), 5);
        assert_eq!(sum([464i64, 141].into_iter()).unwrap(), 605);
        assert_eq!(sum(Vec::<u32>::new()).unwrap(), 0);
    }

    #[test]
    fn test_add_overflow() {
        let err = add(i32::MAX, 1).unwrap_err();
        assert!(matches!(err, Error::WeightOverflow { operation: "add" }));
    }

    #[test]
    fn test_unsigned_underflow() {
        let err = sub(3u32, 5).unwrap_err();
        assert!(matches!(err, Error::WeightOverflow { .. }));
    }

    #[test]
    fn test_mul_overflow() {
        let err = mul(u64::MAX, 2).unwrap_err();
        assert!(matches!(err, Error::WeightOverflow { .. }));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(div(10i32, 0), Err(Error::DivisionByZero)));
        assert!(matches!(rem(10i32, 0), Err(Error::DivisionByZero)));
    }

    #[test]
    fn test_signed_division_overflow() {
        let err = div(i32::MIN, -1).unwrap_err();
        assert!(matches!(err, Error::WeightOverflow { operation: "divide" }));
    }

    #[test]
    fn test_div_and_rem() {
        assert_eq!(div(17i128, 5).unwrap(), 3);
        assert_eq!(rem(17i128, 5).unwrap(), 2);
    }
}
