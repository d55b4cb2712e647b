//! Expression kind tag.
//!
//! Each expression in the pool has a `ScevKind` that identifies its shape.
//! The discriminant doubles as the first key of the canonical operand
//! order: lower values sort first, so constants lead every operand list and
//! opaque leaves trail it.
//!
//! # Kind Ranges
//!
//! - 0: Constant
//! - 1-3: Casts (data = operand + target type)
//! - 4-6: Arithmetic (data = operand list, no-wrap flags apply)
//! - 7-10: Min/Max (data = operand list)
//! - 11-12: Leaves (opaque value, sentinel)

use std::fmt;

/// Expression kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ScevKind {
    /// Integer constant.
    Constant = 0,
    /// Truncation to a narrower integer.
    Truncate = 1,
    /// Zero extension to a wider integer.
    ZeroExtend = 2,
    /// Sign extension to a wider integer.
    SignExtend = 3,
    /// N-ary sum.
    Sum = 4,
    /// N-ary product.
    Product = 5,
    /// Loop recurrence `{start,+,step,...}<loop>`.
    Recurrence = 6,
    /// Unsigned maximum.
    UMax = 7,
    /// Signed maximum.
    SMax = 8,
    /// Unsigned minimum.
    UMin = 9,
    /// Signed minimum.
    SMin = 10,
    /// Opaque program value.
    Opaque = 11,
    /// Result of a query that has no closed form.
    CouldNotCompute = 12,
}

impl ScevKind {
    /// Position in the canonical operand order.
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Check if no-wrap flags are meaningful for this kind.
    #[inline]
    pub const fn carries_no_wrap(self) -> bool {
        matches!(self, Self::Sum | Self::Product | Self::Recurrence)
    }

    /// Get the name of this kind as a static string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Truncate => "trunc",
            Self::ZeroExtend => "zext",
            Self::SignExtend => "sext",
            Self::Sum => "sum",
            Self::Product => "product",
            Self::Recurrence => "recurrence",
            Self::UMax => "umax",
            Self::SMax => "smax",
            Self::UMin => "umin",
            Self::SMin => "smin",
            Self::Opaque => "opaque",
            Self::CouldNotCompute => "could_not_compute",
        }
    }
}

impl fmt::Debug for ScevKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScevKind::{}", self.name())
    }
}

impl fmt::Display for ScevKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const _: () = assert!(std::mem::size_of::<ScevKind>() == 1);

#[cfg(test)]
mod tests;
