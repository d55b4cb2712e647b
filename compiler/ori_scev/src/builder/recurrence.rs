//! Recurrences.

use crate::node::{ConstantInt, Operands, ScevData};
use crate::{LoopId, NoWrap, ScevFlags, ScevId};

use super::ScalarEvolution;

impl ScalarEvolution<'_> {
    /// `{start,+,step,+,...}` over `loop_id`.
    ///
    /// Trailing zero steps are dropped; a recurrence left with only its
    /// start is the start.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two operands are given, if the operands'
    /// effective types differ, if a step carries a non-standard pointer,
    /// or if an operand varies inside `loop_id`.
    #[tracing::instrument(level = "trace", skip_all, fields(operands = operands.len(), loop_id = loop_id.raw()))]
    pub fn recurrence(&mut self, operands: &[ScevId], loop_id: LoopId, no_wrap: NoWrap) -> ScevId {
        self.recurrence_from(operands.iter().copied().collect(), loop_id, no_wrap)
    }

    /// `{start,+,step}` over `loop_id`.
    pub fn affine_recurrence(
        &mut self,
        start: ScevId,
        step: ScevId,
        loop_id: LoopId,
        no_wrap: NoWrap,
    ) -> ScevId {
        self.recurrence(&[start, step], loop_id, no_wrap)
    }

    pub(super) fn recurrence_from(
        &mut self,
        mut ops: Operands,
        loop_id: LoopId,
        no_wrap: NoWrap,
    ) -> ScevId {
        assert!(
            ops.len() >= 2,
            "a recurrence needs a start and at least one step"
        );
        for &op in &ops {
            assert!(
                !op.is_could_not_compute(),
                "could-not-compute used as a recurrence operand"
            );
        }
        let bits = self.effective_bits(ops[0]);
        for &step in &ops[1..] {
            assert!(
                !self.pool.has_non_standard_pointer(step),
                "recurrence step {} carries a non-standard pointer",
                self.display(step)
            );
            assert_eq!(
                self.effective_bits(step),
                bits,
                "recurrence operands have different effective types: {}",
                self.describe(&ops)
            );
        }
        for &op in &ops {
            assert!(
                self.is_loop_invariant(op, loop_id),
                "recurrence operand {} varies inside its own loop",
                self.display(op)
            );
        }

        while ops.len() > 1
            && ops
                .last()
                .and_then(|&op| self.pool.constant(op))
                .is_some_and(ConstantInt::is_zero)
        {
            ops.pop();
        }
        if ops.len() == 1 {
            return ops[0];
        }

        let pointer = self.pool.has_non_standard_pointer(ops[0]);
        self.pool.intern(
            ScevData::Recurrence {
                operands: ops,
                loop_id,
            },
            ScevFlags::new(pointer, no_wrap),
        )
    }

    /// Start value of a recurrence, `None` for every other kind.
    pub fn recurrence_start(&self, id: ScevId) -> Option<ScevId> {
        match self.pool.data(id) {
            ScevData::Recurrence { operands, .. } => Some(operands[0]),
            _ => None,
        }
    }

    /// Recurrence with the same loop whose start is the second operand
    /// onward: the per-iteration increment. `None` for other kinds.
    pub fn recurrence_step(&mut self, id: ScevId) -> Option<ScevId> {
        let ScevData::Recurrence { operands, loop_id } = self.pool.data(id) else {
            return None;
        };
        let steps: Operands = operands[1..].iter().copied().collect();
        let loop_id = *loop_id;
        Some(if steps.len() == 1 {
            steps[0]
        } else {
            self.recurrence_from(steps, loop_id, NoWrap::empty())
        })
    }
}
