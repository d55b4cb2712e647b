//! Queries over built expressions.

use rustc_hash::FxHashMap;

use crate::builder::ensure_sufficient_stack;
use crate::node::{Operands, ScevData, SumShape};
use crate::{LoopId, NoWrap, ScalarEvolution, ScevId};

impl ScalarEvolution<'_> {
    /// Whether `id` has the same value on every iteration of `loop_id`.
    ///
    /// A recurrence over `loop_id` or a loop nested in it varies; one over
    /// an enclosing loop is fixed while `loop_id` runs. Recurrences over
    /// unrelated loops are treated as varying.
    pub fn is_loop_invariant(&self, id: ScevId, loop_id: LoopId) -> bool {
        let mut memo = FxHashMap::default();
        self.invariant_in(id, loop_id, &mut memo)
    }

    fn invariant_in(&self, id: ScevId, loop_id: LoopId, memo: &mut FxHashMap<ScevId, bool>) -> bool {
        if let Some(&known) = memo.get(&id) {
            return known;
        }
        let invariant = match self.pool.data(id) {
            ScevData::CouldNotCompute | ScevData::Constant(_) => true,
            ScevData::Opaque { value, .. } => match self.func.value_loop(*value) {
                Some(defined_in) => !self.func.loop_contains(loop_id, defined_in),
                None => true,
            },
            ScevData::Recurrence { loop_id: own, .. } => {
                self.func.loop_contains(*own, loop_id) && *own != loop_id
            }
            data => data
                .operands()
                .iter()
                .all(|&op| ensure_sufficient_stack(|| self.invariant_in(op, loop_id, memo))),
        };
        memo.insert(id, invariant);
        invariant
    }

    /// The pointer an address expression is an offset from.
    ///
    /// Walks recurrence starts and pointer-carrying sum operands. In a
    /// pointer difference the subtracted pointer is skipped in favour of
    /// the one added. Anything else is its own base.
    pub fn pointer_base(&self, id: ScevId) -> ScevId {
        let mut current = id;
        loop {
            let next = match self.pool.data(current) {
                ScevData::Recurrence { operands, .. } => operands[0],
                ScevData::Sum(SumShape::PointerTyped { operands, .. }) => {
                    let pointers = || {
                        operands
                            .iter()
                            .copied()
                            .filter(|&op| self.pool.has_non_standard_pointer(op))
                    };
                    match pointers()
                        .find(|&op| !self.is_negated_pointer(op))
                        .or_else(|| pointers().next())
                    {
                        Some(op) => op,
                        None => return current,
                    }
                }
                ScevData::Sum(SumShape::Plain(operands)) => {
                    match operands.iter().copied().find(|&op| self.pool.ty(op).is_pointer()) {
                        Some(op) => op,
                        None => return current,
                    }
                }
                _ => return current,
            };
            current = next;
        }
    }

    fn is_negated_pointer(&self, id: ScevId) -> bool {
        matches!(self.pool.data(id), ScevData::Product(_)) && self.pool.has_non_standard_pointer(id)
    }

    /// Value of a recurrence one iteration later: `{a,+,b}` becomes
    /// `{a+b,+,b}`.
    ///
    /// # Panics
    ///
    /// Panics if `rec` is not a recurrence.
    pub fn post_increment(&mut self, rec: ScevId) -> ScevId {
        let (operands, loop_id): (Operands, LoopId) = match self.pool.data(rec) {
            ScevData::Recurrence { operands, loop_id } => (operands.clone(), *loop_id),
            _ => panic!("post-increment of non-recurrence {}", self.display(rec)),
        };
        let mut next = Operands::with_capacity(operands.len());
        for pair in operands.windows(2) {
            next.push(self.sum(pair, NoWrap::empty()));
        }
        next.push(operands[operands.len() - 1]);
        self.recurrence(&next, loop_id, NoWrap::empty())
    }
}

#[cfg(test)]
mod tests;
