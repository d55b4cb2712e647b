//! Result-type derivation.
//!
//! Per kind:
//! - leaves and casts: the type stored in the node
//! - plain sum: the first pointer-typed operand in canonical order, else
//!   the first operand
//! - pointer-typed sum: the type recorded at construction, nothing derived
//! - product: the first operand; with the pointer flag set, the last
//!   operand (the negated pointer of a `(-1 * p)` difference)
//! - recurrence, min/max: the first operand

use crate::node::{ScevData, SumShape};
use crate::{ScalarType, ScevId};

use super::ScevPool;

impl ScevPool {
    /// Type of the value an expression computes.
    ///
    /// The expander relies on this to decide between address arithmetic
    /// and integer arithmetic, so a non-standard pointer expression must
    /// never report an integer type here.
    ///
    /// # Panics
    ///
    /// Panics for the could-not-compute sentinel, which has no type.
    pub fn ty(&self, id: ScevId) -> ScalarType {
        match self.data(id) {
            ScevData::CouldNotCompute => {
                panic!("type requested for the could-not-compute expression")
            }
            ScevData::Constant(c) => c.ty(),
            ScevData::Opaque { ty, .. }
            | ScevData::Cast { ty, .. }
            | ScevData::Sum(SumShape::PointerTyped { ty, .. }) => *ty,
            ScevData::Sum(SumShape::Plain(operands)) => operands
                .iter()
                .map(|&op| self.ty(op))
                .find(|ty| ty.is_pointer())
                .unwrap_or_else(|| self.ty(operands[0])),
            ScevData::Product(operands) => {
                if self.has_non_standard_pointer(id) {
                    self.ty(operands[operands.len() - 1])
                } else {
                    self.ty(operands[0])
                }
            }
            ScevData::Recurrence { operands, .. } | ScevData::MinMax { operands, .. } => {
                self.ty(operands[0])
            }
        }
    }
}
