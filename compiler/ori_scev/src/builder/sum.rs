//! Sums.
//!
//! Beyond constant folding, a sum within the depth budget
//! - flattens nested sums,
//! - merges like terms (`x + 3*x` to `4*x`),
//! - folds operands invariant in a recurrence's loop into its start,
//! - adds recurrences over the same loop operand-wise.
//!
//! The interned shape records the pointer type whenever an operand carries
//! a non-standard pointer (see [`SumShape`]).

use crate::node::{ConstantInt, Operands, ScevData, SumShape};
use crate::{NoWrap, ScevFlags, ScevId, ScevKind};

use super::{ensure_sufficient_stack, ScalarEvolution};

/// Operands sharing one non-constant part, `coefficient * rest`.
struct Term {
    coefficient: ConstantInt,
    rest: Operands,
    originals: Operands,
}

impl ScalarEvolution<'_> {
    /// Sum of `operands`, simplified.
    ///
    /// `no_wrap` is kept only if simplification leaves the operand list
    /// exactly as given (up to order).
    ///
    /// # Panics
    ///
    /// Panics if `operands` is empty, if the operands' effective types
    /// differ, or if operands carry non-standard pointers of different
    /// types.
    #[tracing::instrument(level = "trace", skip_all, fields(operands = operands.len()))]
    pub fn sum(&mut self, operands: &[ScevId], no_wrap: NoWrap) -> ScevId {
        self.sum_at_depth(operands.iter().copied().collect(), no_wrap, 0)
    }

    /// `a + b` without no-wrap guarantees.
    pub fn add(&mut self, a: ScevId, b: ScevId) -> ScevId {
        self.sum(&[a, b], NoWrap::empty())
    }

    /// `a - b`, built as `a + (-1 * b)`.
    pub fn minus(&mut self, a: ScevId, b: ScevId) -> ScevId {
        let negated = self.negate(b);
        self.sum(&[a, negated], NoWrap::empty())
    }

    pub(super) fn sum_at_depth(&mut self, mut ops: Operands, no_wrap: NoWrap, depth: u32) -> ScevId {
        assert!(!ops.is_empty(), "a sum needs at least one operand");
        if ops.len() == 1 {
            return ops[0];
        }
        self.check_arith_operands(&ops, "sum");
        self.sort(&mut ops);

        let mut no_wrap = no_wrap;
        if self.fold_leading_constants(&mut ops, ConstantInt::wrapping_add) {
            no_wrap = NoWrap::empty();
        }
        if self.pool.constant(ops[0]).is_some_and(ConstantInt::is_zero) && ops.len() > 1 {
            ops.remove(0);
            no_wrap = NoWrap::empty();
        }
        if ops.len() == 1 {
            return ops[0];
        }

        if depth > self.config.max_arith_depth {
            tracing::trace!(depth, operands = ops.len(), "depth budget exhausted, sum left as is");
            return self.intern_sum(ops, no_wrap);
        }

        if let Some(flat) = self.flatten(&ops, ScevKind::Sum, self.config.add_ops_inline_threshold) {
            return ensure_sufficient_stack(|| self.sum_at_depth(flat, NoWrap::empty(), depth + 1));
        }
        if let Some(merged) = self.merge_like_terms(&ops, depth) {
            return merged;
        }
        if let Some(folded) = self.fold_recurrences(&ops, depth) {
            return folded;
        }
        self.intern_sum(ops, no_wrap)
    }

    /// Intern a finished operand list, choosing the shape from the
    /// operands' pointer flags.
    fn intern_sum(&mut self, ops: Operands, no_wrap: NoWrap) -> ScevId {
        let pointer_ty = ops
            .iter()
            .copied()
            .find(|&op| self.pool.has_non_standard_pointer(op))
            .map(|op| self.pool.ty(op));
        let (data, pointer) = match pointer_ty {
            Some(ty) => (
                ScevData::Sum(SumShape::PointerTyped { operands: ops, ty }),
                true,
            ),
            None => (ScevData::Sum(SumShape::Plain(ops)), false),
        };
        self.pool.intern(data, ScevFlags::new(pointer, no_wrap))
    }

    /// Split `op` into a constant coefficient and the rest of the term.
    fn split_coefficient(&self, op: ScevId, bits: u32) -> (ConstantInt, Operands) {
        if let ScevData::Product(factors) = self.pool.data(op) {
            if let Some(c) = self.pool.constant(factors[0]) {
                return (c, factors[1..].iter().copied().collect());
            }
        }
        (ConstantInt::one(bits), std::iter::once(op).collect())
    }

    /// `x + 3*x` becomes `4*x`; `p + (-1 * p)` cancels.
    ///
    /// Terms over a non-standard pointer only combine when the resulting
    /// coefficient is 0, 1, or -1, the only multiples of such a pointer
    /// that can be expressed.
    fn merge_like_terms(&mut self, ops: &[ScevId], depth: u32) -> Option<ScevId> {
        let bits = self.effective_bits(ops[0]);
        let mut terms: Vec<Term> = Vec::with_capacity(ops.len());
        for &op in ops {
            let (coefficient, rest) = self.split_coefficient(op, bits);
            match terms.iter_mut().find(|t| t.rest == rest) {
                Some(term) => {
                    term.coefficient = term.coefficient.wrapping_add(coefficient);
                    term.originals.push(op);
                }
                None => terms.push(Term {
                    coefficient,
                    rest,
                    originals: std::iter::once(op).collect(),
                }),
            }
        }
        if terms.len() == ops.len() {
            return None;
        }

        let mut changed = false;
        let mut merged = Operands::with_capacity(terms.len());
        for term in terms {
            if term.originals.len() == 1 {
                merged.push(term.originals[0]);
                continue;
            }
            let c = term.coefficient;
            if c.is_zero() {
                changed = true;
                continue;
            }
            let pointer = term
                .rest
                .iter()
                .any(|&op| self.pool.has_non_standard_pointer(op));
            if pointer && !c.is_one() && !c.is_all_ones() {
                tracing::debug!(
                    coefficient = c.sext_value(),
                    "pointer terms left unmerged, coefficient not expressible"
                );
                merged.extend_from_slice(&term.originals);
                continue;
            }
            changed = true;
            let scaled = self.scale(c, &term.rest, depth + 1);
            merged.push(scaled);
        }
        if !changed {
            return None;
        }
        if merged.is_empty() {
            return Some(self.constant_int(ConstantInt::zero(bits)));
        }
        Some(ensure_sufficient_stack(|| self.sum_at_depth(merged, NoWrap::empty(), depth + 1)))
    }

    /// `c * rest...`
    fn scale(&mut self, c: ConstantInt, rest: &[ScevId], depth: u32) -> ScevId {
        if c.is_one() && rest.len() == 1 {
            return rest[0];
        }
        let mut factors = Operands::with_capacity(rest.len() + 1);
        if !c.is_one() {
            factors.push(self.constant_int(c));
        }
        factors.extend_from_slice(rest);
        ensure_sufficient_stack(|| self.product_at_depth(factors, NoWrap::empty(), depth))
    }

    /// Fold invariant operands into the first recurrence's start, or add
    /// two recurrences over the same loop operand-wise.
    fn fold_recurrences(&mut self, ops: &[ScevId], depth: u32) -> Option<ScevId> {
        let index = ops
            .iter()
            .position(|&op| self.pool.kind(op) == ScevKind::Recurrence)?;
        let rec = ops[index];
        let loop_id = self.pool.recurrence_loop(rec)?;

        let mut invariant = Operands::new();
        let mut variant = Operands::new();
        for (i, &op) in ops.iter().enumerate() {
            if i == index {
                continue;
            }
            if self.is_loop_invariant(op, loop_id) {
                invariant.push(op);
            } else {
                variant.push(op);
            }
        }

        if !invariant.is_empty() {
            let mut rec_ops: Operands = self.pool.operands(rec).iter().copied().collect();
            invariant.push(rec_ops[0]);
            rec_ops[0] = ensure_sufficient_stack(|| self.sum_at_depth(invariant, NoWrap::empty(), depth + 1));
            let folded = self.recurrence_from(rec_ops, loop_id, NoWrap::empty());
            if variant.is_empty() {
                return Some(folded);
            }
            variant.push(folded);
            return Some(ensure_sufficient_stack(|| self.sum_at_depth(variant, NoWrap::empty(), depth + 1)));
        }

        let partner = ops
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|&(_, &op)| self.pool.recurrence_loop(op) == Some(loop_id))
            .map(|(i, _)| i)?;
        let lhs: Operands = self.pool.operands(rec).iter().copied().collect();
        let rhs: Operands = self.pool.operands(ops[partner]).iter().copied().collect();
        let mut combined = Operands::with_capacity(lhs.len().max(rhs.len()));
        for i in 0..lhs.len().max(rhs.len()) {
            let operand = match (lhs.get(i), rhs.get(i)) {
                (Some(&a), Some(&b)) => {
                    let pair: Operands = [a, b].into_iter().collect();
                    ensure_sufficient_stack(|| self.sum_at_depth(pair, NoWrap::empty(), depth + 1))
                }
                (Some(&a), None) | (None, Some(&a)) => a,
                (None, None) => unreachable!("index below the longer length"),
            };
            combined.push(operand);
        }
        tracing::debug!(?rec, other = ?ops[partner], "adding recurrences over one loop");
        let combined = self.recurrence_from(combined, loop_id, NoWrap::empty());

        let mut rest: Operands = ops
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index && i != partner)
            .map(|(_, &op)| op)
            .collect();
        if rest.is_empty() {
            return Some(combined);
        }
        rest.push(combined);
        Some(ensure_sufficient_stack(|| self.sum_at_depth(rest, NoWrap::empty(), depth + 1)))
    }
}
