//! Canonical operand order.
//!
//! Commutative nodes sort their operands with [`compare_complexity`] before
//! uniquing, so `a + b` and `b + a` produce the same key.
//!
//! Keys, most significant first:
//! 1. kind rank (constants first, opaque leaves last)
//! 2. per-kind structure: constant width and value, opaque value id,
//!    recurrence loop depth and loop, operand count, operands in order
//! 3. arena index
//!
//! Structural comparison recurses at most `max_depth` levels; below that
//! the arena index decides. The last key makes the order total, and
//! because each level is a lexicographic combination of total orders the
//! result is consistent for any depth bound.

use std::cmp::Ordering;

use crate::node::ScevData;
use crate::{FunctionContext, ScevId, ScevPool};

/// Compare two expressions in canonical order.
pub fn compare_complexity(
    pool: &ScevPool,
    func: &dyn FunctionContext,
    a: ScevId,
    b: ScevId,
    max_depth: u32,
) -> Ordering {
    Comparator {
        pool,
        func,
        max_depth,
    }
    .compare(a, b, 0)
}

/// Sort an operand list into canonical order.
pub fn sort_operands(
    pool: &ScevPool,
    func: &dyn FunctionContext,
    operands: &mut [ScevId],
    max_depth: u32,
) {
    let cmp = Comparator {
        pool,
        func,
        max_depth,
    };
    operands.sort_by(|&a, &b| cmp.compare(a, b, 0));
}

struct Comparator<'a> {
    pool: &'a ScevPool,
    func: &'a dyn FunctionContext,
    max_depth: u32,
}

impl Comparator<'_> {
    fn compare(&self, a: ScevId, b: ScevId, depth: u32) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (kind_a, kind_b) = (self.pool.kind(a), self.pool.kind(b));
        if kind_a != kind_b {
            return kind_a.rank().cmp(&kind_b.rank());
        }
        if depth > self.max_depth {
            return a.cmp(&b);
        }

        let structural = match (self.pool.data(a), self.pool.data(b)) {
            (ScevData::Constant(x), ScevData::Constant(y)) => x
                .bits()
                .cmp(&y.bits())
                .then_with(|| x.zext_value().cmp(&y.zext_value())),
            (ScevData::Opaque { value: x, .. }, ScevData::Opaque { value: y, .. }) => x.cmp(y),
            (
                ScevData::Cast {
                    operand: x, ty: tx, ..
                },
                ScevData::Cast {
                    operand: y, ty: ty_, ..
                },
            ) => self.compare(*x, *y, depth + 1).then_with(|| tx.cmp(ty_)),
            (
                ScevData::Recurrence {
                    operands: xs,
                    loop_id: lx,
                },
                ScevData::Recurrence {
                    operands: ys,
                    loop_id: ly,
                },
            ) => self
                .func
                .loop_depth(*lx)
                .cmp(&self.func.loop_depth(*ly))
                .then_with(|| lx.cmp(ly))
                .then_with(|| self.compare_lists(xs, ys, depth)),
            (x, y) => self.compare_lists(x.operands(), y.operands(), depth),
        };
        structural.then_with(|| a.cmp(&b))
    }

    fn compare_lists(&self, xs: &[ScevId], ys: &[ScevId], depth: u32) -> Ordering {
        xs.len().cmp(&ys.len()).then_with(|| {
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| self.compare(x, y, depth + 1))
                .find(|order| order.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }
}
