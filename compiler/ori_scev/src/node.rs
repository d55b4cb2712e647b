//! Node payloads.
//!
//! `ScevData` is both what the pool stores and its uniquing key: two
//! requests that produce equal `ScevData` get the same [`ScevId`]. Flags
//! live in a parallel array in the pool. The one exception is the flag that
//! changes a node's shape: the non-standard pointer marker on sums, which
//! [`SumShape`] encodes.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::{LoopId, ScalarType, ScevId, ScevKind, ValueId};

/// Operand list of an n-ary node.
pub type Operands = SmallVec<[ScevId; 4]>;

#[inline]
const fn mask(bits: u32) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

/// Fixed-width two's-complement integer constant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConstantInt {
    bits: u32,
    value: u128,
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
impl ConstantInt {
    /// Constant of width `bits` holding `value` modulo 2^bits.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=128`.
    pub fn new(bits: u32, value: i128) -> Self {
        Self::from_raw(bits, value as u128)
    }

    /// Constant of width `bits` from its unsigned bit pattern.
    pub fn from_raw(bits: u32, raw: u128) -> Self {
        assert!(
            (1..=128).contains(&bits),
            "constant width {bits} outside 1..=128"
        );
        Self {
            bits,
            value: raw & mask(bits),
        }
    }

    pub fn zero(bits: u32) -> Self {
        Self::from_raw(bits, 0)
    }

    pub fn one(bits: u32) -> Self {
        Self::from_raw(bits, 1)
    }

    /// All bits set, i.e. `-1`.
    pub fn all_ones(bits: u32) -> Self {
        Self::from_raw(bits, u128::MAX)
    }

    pub fn signed_min(bits: u32) -> Self {
        Self::from_raw(bits, 1u128 << (bits - 1))
    }

    pub fn signed_max(bits: u32) -> Self {
        Self::from_raw(bits, mask(bits) >> 1)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    #[inline]
    pub const fn ty(self) -> ScalarType {
        ScalarType::Int { bits: self.bits }
    }

    /// Value read as unsigned.
    #[inline]
    pub const fn zext_value(self) -> u128 {
        self.value
    }

    /// Value read as signed.
    #[inline]
    pub const fn sext_value(self) -> i128 {
        let shift = 128 - self.bits;
        ((self.value << shift) as i128) >> shift
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.value == 0
    }

    #[inline]
    pub const fn is_one(self) -> bool {
        self.value == 1
    }

    #[inline]
    pub const fn is_all_ones(self) -> bool {
        self.value == mask(self.bits)
    }

    #[must_use]
    pub fn wrapping_add(self, other: Self) -> Self {
        debug_assert_eq!(self.bits, other.bits, "adding constants of different widths");
        Self::from_raw(self.bits, self.value.wrapping_add(other.value))
    }

    #[must_use]
    pub fn wrapping_mul(self, other: Self) -> Self {
        debug_assert_eq!(self.bits, other.bits, "multiplying constants of different widths");
        Self::from_raw(self.bits, self.value.wrapping_mul(other.value))
    }

    #[must_use]
    pub fn wrapping_neg(self) -> Self {
        Self::from_raw(self.bits, self.value.wrapping_neg())
    }

    pub fn cmp_unsigned(self, other: Self) -> Ordering {
        self.value.cmp(&other.value)
    }

    pub fn cmp_signed(self, other: Self) -> Ordering {
        self.sext_value().cmp(&other.sext_value())
    }

    #[must_use]
    pub fn truncate(self, bits: u32) -> Self {
        Self::from_raw(bits, self.value)
    }

    #[must_use]
    pub fn zero_extend(self, bits: u32) -> Self {
        Self::from_raw(bits, self.value)
    }

    #[must_use]
    pub fn sign_extend(self, bits: u32) -> Self {
        Self::new(bits, self.sext_value())
    }
}

/// Integer conversion performed by a cast node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CastOp {
    Truncate,
    ZeroExtend,
    SignExtend,
}

impl CastOp {
    #[inline]
    pub const fn kind(self) -> ScevKind {
        match self {
            Self::Truncate => ScevKind::Truncate,
            Self::ZeroExtend => ScevKind::ZeroExtend,
            Self::SignExtend => ScevKind::SignExtend,
        }
    }

    /// Apply the conversion to a constant.
    pub fn fold(self, c: ConstantInt, bits: u32) -> ConstantInt {
        match self {
            Self::Truncate => c.truncate(bits),
            Self::ZeroExtend => c.zero_extend(bits),
            Self::SignExtend => c.sign_extend(bits),
        }
    }
}

/// Which extremum a min/max node selects.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MinMaxKind {
    UMax,
    SMax,
    UMin,
    SMin,
}

impl MinMaxKind {
    #[inline]
    pub const fn kind(self) -> ScevKind {
        match self {
            Self::UMax => ScevKind::UMax,
            Self::SMax => ScevKind::SMax,
            Self::UMin => ScevKind::UMin,
            Self::SMin => ScevKind::SMin,
        }
    }

    /// Combine two constants.
    pub fn fold(self, a: ConstantInt, b: ConstantInt) -> ConstantInt {
        let order = match self {
            Self::UMax | Self::UMin => a.cmp_unsigned(b),
            Self::SMax | Self::SMin => a.cmp_signed(b),
        };
        let a_wins = match self {
            Self::UMax | Self::SMax => order != Ordering::Less,
            Self::UMin | Self::SMin => order != Ordering::Greater,
        };
        if a_wins {
            a
        } else {
            b
        }
    }

    /// The constant that never changes the result.
    pub fn identity(self, bits: u32) -> ConstantInt {
        match self {
            Self::UMax => ConstantInt::zero(bits),
            Self::SMax => ConstantInt::signed_min(bits),
            Self::UMin => ConstantInt::all_ones(bits),
            Self::SMin => ConstantInt::signed_max(bits),
        }
    }

    /// The constant that always is the result.
    pub fn absorbing(self, bits: u32) -> ConstantInt {
        match self {
            Self::UMax => ConstantInt::all_ones(bits),
            Self::SMax => ConstantInt::signed_max(bits),
            Self::UMin => ConstantInt::zero(bits),
            Self::SMin => ConstantInt::signed_min(bits),
        }
    }
}

/// Physical layout of a sum.
///
/// A sum whose operands carry a non-standard pointer records the pointer
/// type at construction. The generic "first pointer-typed operand" rule is
/// not trustworthy there: canonical order can put an integer-typed opaque
/// operand in the place where the pointer was expected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SumShape {
    /// No operand carries a non-standard pointer.
    Plain(Operands),
    /// At least one operand does; `ty` is that pointer type.
    PointerTyped { operands: Operands, ty: ScalarType },
}

impl SumShape {
    #[inline]
    pub fn operands(&self) -> &[ScevId] {
        match self {
            Self::Plain(operands) | Self::PointerTyped { operands, .. } => operands,
        }
    }
}

/// Structural content of one expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScevData {
    CouldNotCompute,
    Constant(ConstantInt),
    Opaque {
        value: ValueId,
        ty: ScalarType,
    },
    Cast {
        op: CastOp,
        operand: ScevId,
        ty: ScalarType,
    },
    Sum(SumShape),
    Product(Operands),
    Recurrence {
        operands: Operands,
        loop_id: LoopId,
    },
    MinMax {
        kind: MinMaxKind,
        operands: Operands,
    },
}

impl ScevData {
    pub fn kind(&self) -> ScevKind {
        match self {
            Self::CouldNotCompute => ScevKind::CouldNotCompute,
            Self::Constant(_) => ScevKind::Constant,
            Self::Opaque { .. } => ScevKind::Opaque,
            Self::Cast { op, .. } => op.kind(),
            Self::Sum(_) => ScevKind::Sum,
            Self::Product(_) => ScevKind::Product,
            Self::Recurrence { .. } => ScevKind::Recurrence,
            Self::MinMax { kind, .. } => kind.kind(),
        }
    }

    /// Child expressions, in stored order.
    pub fn operands(&self) -> &[ScevId] {
        match self {
            Self::CouldNotCompute | Self::Constant(_) | Self::Opaque { .. } => &[],
            Self::Cast { operand, .. } => std::slice::from_ref(operand),
            Self::Sum(shape) => shape.operands(),
            Self::Product(operands)
            | Self::Recurrence { operands, .. }
            | Self::MinMax { operands, .. } => operands,
        }
    }

    #[inline]
    pub fn as_constant(&self) -> Option<ConstantInt> {
        match self {
            Self::Constant(c) => Some(*c),
            _ => None,
        }
    }
}
