//! Unsigned and signed minimum / maximum.

use crate::node::{MinMaxKind, Operands, ScevData};
use crate::{NoWrap, ScevFlags, ScevId};

use super::{ensure_sufficient_stack, ScalarEvolution};

impl ScalarEvolution<'_> {
    /// `kind` over `operands`, simplified: constants fold, identity
    /// elements drop out, an absorbing element wins, duplicates and nested
    /// nodes of the same kind are merged.
    ///
    /// # Panics
    ///
    /// Panics if `operands` is empty, or if the operands disagree on type
    /// or on the non-standard pointer flag.
    #[tracing::instrument(level = "trace", skip_all, fields(kind = %kind.kind(), operands = operands.len()))]
    pub fn min_max(&mut self, kind: MinMaxKind, operands: &[ScevId]) -> ScevId {
        self.min_max_at_depth(kind, operands.iter().copied().collect(), 0)
    }

    pub fn umax(&mut self, a: ScevId, b: ScevId) -> ScevId {
        self.min_max(MinMaxKind::UMax, &[a, b])
    }

    pub fn smax(&mut self, a: ScevId, b: ScevId) -> ScevId {
        self.min_max(MinMaxKind::SMax, &[a, b])
    }

    pub fn umin(&mut self, a: ScevId, b: ScevId) -> ScevId {
        self.min_max(MinMaxKind::UMin, &[a, b])
    }

    pub fn smin(&mut self, a: ScevId, b: ScevId) -> ScevId {
        self.min_max(MinMaxKind::SMin, &[a, b])
    }

    fn min_max_at_depth(&mut self, kind: MinMaxKind, mut ops: Operands, depth: u32) -> ScevId {
        assert!(
            !ops.is_empty(),
            "a {} needs at least one operand",
            kind.kind()
        );
        for &op in &ops {
            assert!(
                !op.is_could_not_compute(),
                "could-not-compute used as a {} operand",
                kind.kind()
            );
        }
        let ty = self.pool.ty(ops[0]);
        let pointer = self.pool.has_non_standard_pointer(ops[0]);
        for &op in &ops[1..] {
            assert!(
                self.pool.ty(op) == ty && self.pool.has_non_standard_pointer(op) == pointer,
                "{} operands disagree on type: {}",
                kind.kind(),
                self.describe(&ops)
            );
        }
        if ops.len() == 1 {
            return ops[0];
        }
        self.sort(&mut ops);

        self.fold_leading_constants(&mut ops, |a, b| kind.fold(a, b));
        if let Some(c) = self.pool.constant(ops[0]) {
            if c == kind.absorbing(c.bits()) {
                return ops[0];
            }
            if c == kind.identity(c.bits()) && ops.len() > 1 {
                ops.remove(0);
            }
        }
        ops.dedup();
        if ops.len() == 1 {
            return ops[0];
        }

        if depth > self.config.max_arith_depth {
            tracing::trace!(depth, operands = ops.len(), "depth budget exhausted, min/max left as is");
        } else if let Some(flat) =
            self.flatten(&ops, kind.kind(), self.config.add_ops_inline_threshold)
        {
            return ensure_sufficient_stack(|| self.min_max_at_depth(kind, flat, depth + 1));
        }

        self.pool.intern(
            ScevData::MinMax {
                kind,
                operands: ops,
            },
            ScevFlags::new(pointer, NoWrap::empty()),
        )
    }
}
