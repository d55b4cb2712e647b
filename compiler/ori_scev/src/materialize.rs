//! Whether an expression can be turned back into code.
//!
//! Integer and ordinary pointer expressions always can. An expression
//! carrying a non-standard pointer can only be emitted as an offset from
//! one base pointer: the pointer itself is never converted to an integer,
//! so every pointer term of a sum must trace back to the same base.

use rustc_hash::FxHashSet;

use crate::error::MaterializeError;
use crate::node::{ScevData, SumShape};
use crate::{ScalarEvolution, ScevId};

/// How an expression would be emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Materialization {
    /// Plain integer arithmetic.
    Integer,
    /// Pointer arithmetic through integer conversions.
    IntegralPointer,
    /// Address arithmetic relative to `base`, without converting it.
    AddressOffset { base: ScevId },
}

impl ScalarEvolution<'_> {
    /// Decide how `id` would be emitted, or why it cannot be.
    pub fn check_materializable(&self, id: ScevId) -> Result<Materialization, MaterializeError> {
        let mut visited = FxHashSet::default();
        let mut worklist = vec![id];
        while let Some(current) = worklist.pop() {
            if !visited.insert(current) {
                continue;
            }
            match self.pool.data(current) {
                ScevData::CouldNotCompute => {
                    return Err(MaterializeError::CouldNotCompute { expr: current });
                }
                ScevData::Sum(SumShape::PointerTyped { operands, .. }) => {
                    self.check_shared_base(current, operands)?;
                }
                _ => {}
            }
            worklist.extend_from_slice(self.pool.operands(current));
        }

        Ok(if self.pool.has_non_standard_pointer(id) {
            Materialization::AddressOffset {
                base: self.pointer_base(id),
            }
        } else if self.pool.ty(id).is_pointer() {
            Materialization::IntegralPointer
        } else {
            Materialization::Integer
        })
    }

    fn check_shared_base(&self, sum: ScevId, operands: &[ScevId]) -> Result<(), MaterializeError> {
        let mut bases = operands
            .iter()
            .copied()
            .filter(|&op| self.pool.has_non_standard_pointer(op))
            .map(|op| self.pointer_base(self.strip_negation(op)));
        let Some(first) = bases.next() else {
            return Ok(());
        };
        match bases.find(|&base| base != first) {
            Some(second) => {
                tracing::debug!(?sum, ?first, ?second, "pointer terms have unrelated bases");
                Err(MaterializeError::UnrelatedPointerBases { sum, first, second })
            }
            None => Ok(()),
        }
    }

    /// `p` for `-1 * p`, anything else unchanged.
    fn strip_negation(&self, id: ScevId) -> ScevId {
        match self.pool.data(id) {
            ScevData::Product(factors) if self.pool.has_non_standard_pointer(id) => {
                factors[factors.len() - 1]
            }
            _ => id,
        }
    }
}
