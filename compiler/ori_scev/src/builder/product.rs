//! Products.
//!
//! A product may hold at most one non-standard pointer operand, and then
//! only as `-1 * pointer`: the negated pointer of a pointer difference
//! `a - b`. Any other multiple of such a pointer has no meaning.

use crate::node::{ConstantInt, Operands, ScevData, SumShape};
use crate::{NoWrap, ScevFlags, ScevId, ScevKind};

use super::{ensure_sufficient_stack, ScalarEvolution};

impl ScalarEvolution<'_> {
    /// Product of `operands`, simplified.
    ///
    /// # Panics
    ///
    /// Panics if `operands` is empty, if the operands' effective types
    /// differ, or if a non-standard pointer operand appears in anything but
    /// `-1 * pointer`.
    #[tracing::instrument(level = "trace", skip_all, fields(operands = operands.len()))]
    pub fn product(&mut self, operands: &[ScevId], no_wrap: NoWrap) -> ScevId {
        self.product_at_depth(operands.iter().copied().collect(), no_wrap, 0)
    }

    /// `a * b` without no-wrap guarantees.
    pub fn mul(&mut self, a: ScevId, b: ScevId) -> ScevId {
        self.product(&[a, b], NoWrap::empty())
    }

    /// `-1 * x`.
    pub fn negate(&mut self, x: ScevId) -> ScevId {
        let bits = self.effective_bits(x);
        let minus_one = self.constant_int(ConstantInt::all_ones(bits));
        self.product(&[minus_one, x], NoWrap::empty())
    }

    pub(super) fn product_at_depth(
        &mut self,
        mut ops: Operands,
        no_wrap: NoWrap,
        depth: u32,
    ) -> ScevId {
        assert!(!ops.is_empty(), "a product needs at least one operand");
        if ops.len() == 1 {
            return ops[0];
        }
        self.check_arith_operands(&ops, "product");
        let pointers = ops
            .iter()
            .filter(|&&op| self.pool.has_non_standard_pointer(op))
            .count();
        assert!(
            pointers <= 1,
            "a product may hold at most one non-standard pointer: {}",
            self.describe(&ops)
        );
        self.sort(&mut ops);

        let mut no_wrap = no_wrap;
        if self.fold_leading_constants(&mut ops, ConstantInt::wrapping_mul) {
            no_wrap = NoWrap::empty();
        }
        if let Some(c) = self.pool.constant(ops[0]) {
            if c.is_zero() {
                return ops[0];
            }
            if c.is_one() {
                ops.remove(0);
                no_wrap = NoWrap::empty();
            }
        }
        if ops.len() == 1 {
            return ops[0];
        }

        if pointers == 1 {
            return self.negated_pointer(ops, no_wrap, depth);
        }

        if depth > self.config.max_arith_depth {
            tracing::trace!(depth, operands = ops.len(), "depth budget exhausted, product left as is");
            return self.intern_product(ops, no_wrap);
        }

        if let Some(flat) =
            self.flatten(&ops, ScevKind::Product, self.config.mul_ops_inline_threshold)
        {
            return ensure_sufficient_stack(|| self.product_at_depth(flat, NoWrap::empty(), depth + 1));
        }
        if let Some(distributed) = self.distribute_constant(&ops, depth) {
            return distributed;
        }
        self.intern_product(ops, no_wrap)
    }

    /// The pointer-difference exception: `-1 * p`, with a doubled negation
    /// `-1 * (-1 * p)` collapsing back to `p`.
    ///
    /// A negated pointer sum is distributed into `(-1 * p) + (-1 * x)...`
    /// so its terms can cancel against the positive ones of a difference.
    fn negated_pointer(&mut self, ops: Operands, no_wrap: NoWrap, depth: u32) -> ScevId {
        let is_minus_one = |id: ScevId| self.pool.constant(id).is_some_and(ConstantInt::is_all_ones);
        assert!(
            ops.len() == 2 && is_minus_one(ops[0]),
            "a non-standard pointer can only be multiplied by -1: {}",
            self.describe(&ops)
        );
        let terms = match self.pool.data(ops[1]) {
            ScevData::Product(inner) if inner.len() == 2 && is_minus_one(inner[0]) => {
                return inner[1];
            }
            ScevData::Sum(SumShape::PointerTyped { operands, .. })
                if depth <= self.config.max_arith_depth =>
            {
                Some(operands.clone())
            }
            _ => None,
        };
        let Some(terms) = terms else {
            return self.intern_product(ops, no_wrap);
        };

        tracing::debug!(terms = terms.len(), "distributing negation over a pointer sum");
        let minus_one = ops[0];
        let mut negated = Operands::with_capacity(terms.len());
        for term in terms {
            let pair: Operands = [minus_one, term].into_iter().collect();
            negated.push(ensure_sufficient_stack(|| {
                self.product_at_depth(pair, NoWrap::empty(), depth + 1)
            }));
        }
        ensure_sufficient_stack(|| self.sum_at_depth(negated, NoWrap::empty(), depth + 1))
    }

    /// `c * (a + b)` becomes `c*a + c*b`; `c * {a,+,b}` becomes
    /// `{c*a,+,c*b}`.
    fn distribute_constant(&mut self, ops: &[ScevId], depth: u32) -> Option<ScevId> {
        if ops.len() != 2 {
            return None;
        }
        let scale = ops[0];
        self.pool.constant(scale)?;
        match self.pool.data(ops[1]).clone() {
            ScevData::Sum(SumShape::Plain(terms)) => {
                let mut scaled = Operands::with_capacity(terms.len());
                for term in terms {
                    let pair: Operands = [scale, term].into_iter().collect();
                    scaled.push(ensure_sufficient_stack(|| {
                        self.product_at_depth(pair, NoWrap::empty(), depth + 1)
                    }));
                }
                Some(ensure_sufficient_stack(|| self.sum_at_depth(scaled, NoWrap::empty(), depth + 1)))
            }
            ScevData::Recurrence { operands, loop_id } => {
                let mut scaled = Operands::with_capacity(operands.len());
                for op in operands {
                    let pair: Operands = [scale, op].into_iter().collect();
                    scaled.push(ensure_sufficient_stack(|| {
                        self.product_at_depth(pair, NoWrap::empty(), depth + 1)
                    }));
                }
                Some(self.recurrence_from(scaled, loop_id, NoWrap::empty()))
            }
            _ => None,
        }
    }

    fn intern_product(&mut self, ops: Operands, no_wrap: NoWrap) -> ScevId {
        let pointer = ScevFlags::any_pointer(ops.iter().map(|&op| self.pool.flags(op)));
        self.pool
            .intern(ScevData::Product(ops), ScevFlags::new(pointer, no_wrap))
    }
}
