//! Integer conversions.
//!
//! Casts only ever apply to integers. A non-standard pointer has no stable
//! integer value, so asking for one is a contract violation.

use std::cmp::Ordering;

use crate::node::{CastOp, ScevData};
use crate::{ScalarType, ScevFlags, ScevId};

use super::ScalarEvolution;

impl ScalarEvolution<'_> {
    /// Truncate `operand` to the narrower integer type `ty`.
    ///
    /// # Panics
    ///
    /// Panics if either type is not an integer or `ty` is wider.
    pub fn truncate(&mut self, operand: ScevId, ty: ScalarType) -> ScevId {
        self.cast_at_depth(CastOp::Truncate, operand, ty, 0)
    }

    /// Zero-extend `operand` to the wider integer type `ty`.
    pub fn zero_extend(&mut self, operand: ScevId, ty: ScalarType) -> ScevId {
        self.cast_at_depth(CastOp::ZeroExtend, operand, ty, 0)
    }

    /// Sign-extend `operand` to the wider integer type `ty`.
    pub fn sign_extend(&mut self, operand: ScevId, ty: ScalarType) -> ScevId {
        self.cast_at_depth(CastOp::SignExtend, operand, ty, 0)
    }

    fn cast_at_depth(&mut self, op: CastOp, operand: ScevId, ty: ScalarType, depth: u32) -> ScevId {
        assert!(
            !operand.is_could_not_compute(),
            "could-not-compute used as a {} operand",
            op.kind()
        );
        assert!(
            !self.pool.has_non_standard_pointer(operand),
            "{} of {}: a non-standard pointer has no integer value",
            op.kind(),
            self.display(operand)
        );
        let from = self.pool.ty(operand);
        let (Some(from_bits), Some(to_bits)) = (from.int_bits(), ty.int_bits()) else {
            panic!("{} from {from} to {ty}: casts convert integers only", op.kind());
        };
        match op {
            CastOp::Truncate => assert!(
                to_bits <= from_bits,
                "trunc from {from} to wider {ty}"
            ),
            CastOp::ZeroExtend | CastOp::SignExtend => assert!(
                to_bits >= from_bits,
                "{} from {from} to narrower {ty}",
                op.kind()
            ),
        }
        if to_bits == from_bits {
            return operand;
        }
        if let Some(c) = self.pool.constant(operand) {
            return self.constant_int(op.fold(c, to_bits));
        }

        let nested = match self.pool.data(operand) {
            ScevData::Cast {
                op: inner_op,
                operand: inner,
                ..
            } => Some((*inner_op, *inner)),
            _ => None,
        };
        if let Some((inner_op, inner)) = nested {
            if depth > self.config.max_cast_depth {
                tracing::trace!(depth, "cast depth budget exhausted, nested cast kept");
            } else if let Some(collapsed) = self.collapse(op, inner_op, inner, ty, depth) {
                return collapsed;
            }
        }

        self.pool.intern(
            ScevData::Cast { op, operand, ty },
            ScevFlags::empty(),
        )
    }

    /// `op(inner_op(inner))` as a single cast, if one exists.
    fn collapse(
        &mut self,
        op: CastOp,
        inner_op: CastOp,
        inner: ScevId,
        ty: ScalarType,
        depth: u32,
    ) -> Option<ScevId> {
        match (op, inner_op) {
            (CastOp::Truncate, CastOp::Truncate)
            | (CastOp::ZeroExtend, CastOp::ZeroExtend)
            | (CastOp::SignExtend, CastOp::SignExtend)
            // the sign bit of a zero extension is clear
            | (CastOp::SignExtend, CastOp::ZeroExtend) => {
                Some(self.cast_at_depth(inner_op, inner, ty, depth + 1))
            }
            (CastOp::Truncate, CastOp::ZeroExtend | CastOp::SignExtend) => {
                let inner_bits = self.effective_bits(inner);
                let to_bits = self.layout.effective_bits(ty);
                Some(match inner_bits.cmp(&to_bits) {
                    Ordering::Less => self.cast_at_depth(inner_op, inner, ty, depth + 1),
                    Ordering::Equal => inner,
                    Ordering::Greater => self.cast_at_depth(CastOp::Truncate, inner, ty, depth + 1),
                })
            }
            (CastOp::ZeroExtend | CastOp::SignExtend, _) => None,
        }
    }
}
