use pretty_assertions::assert_eq;

use super::*;
use crate::node::{CastOp, MinMaxKind, Operands};
use crate::{FunctionContext, ScalarType, ValueId};

/// A function that names nothing: every value is `i64` and outside loops.
struct Anonymous;

impl FunctionContext for Anonymous {
    fn value_type(&self, _value: ValueId) -> ScalarType {
        ScalarType::I64
    }

    fn value_loop(&self, _value: ValueId) -> Option<LoopId> {
        None
    }

    fn parent_loop(&self, _l: LoopId) -> Option<LoopId> {
        None
    }
}

fn ops(ids: &[ScevId]) -> Operands {
    ids.iter().copied().collect()
}

fn opaque(pool: &mut ScevPool, raw: u32, ty: ScalarType, pointer: bool) -> ScevId {
    pool.intern(
        ScevData::Opaque {
            value: ValueId::new(raw),
            ty,
        },
        ScevFlags::new(pointer, NoWrap::empty()),
    )
}

fn constant(pool: &mut ScevPool, value: i128) -> ScevId {
    pool.intern(
        ScevData::Constant(ConstantInt::new(64, value)),
        ScevFlags::empty(),
    )
}

#[test]
fn new_pool_holds_the_sentinel() {
    let pool = ScevPool::new();
    assert_eq!(pool.len(), 1);
    assert!(pool.is_empty());
    assert_eq!(pool.kind(ScevId::COULD_NOT_COMPUTE), ScevKind::CouldNotCompute);
    assert_eq!(pool.lookup(&ScevData::CouldNotCompute), Some(ScevId::COULD_NOT_COMPUTE));
}

#[test]
fn equal_content_interns_once() {
    let mut pool = ScevPool::new();
    let a = constant(&mut pool, 7);
    let b = constant(&mut pool, 7);
    let c = constant(&mut pool, 8);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(pool.len(), 3);
    assert!(!pool.is_empty());
    assert_eq!(pool.constant(a).map(ConstantInt::sext_value), Some(7));
}

#[test]
fn no_wrap_is_not_part_of_identity() {
    let mut pool = ScevPool::new();
    let x = opaque(&mut pool, 0, ScalarType::I64, false);
    let y = opaque(&mut pool, 1, ScalarType::I64, false);
    let sum = ScevData::Sum(SumShape::Plain(ops(&[x, y])));

    let plain = pool.intern(sum.clone(), ScevFlags::empty());
    let nuw = pool.intern(sum.clone(), ScevFlags::new(false, NoWrap::NUW));
    assert_eq!(plain, nuw);
    assert_eq!(pool.no_wrap(plain), NoWrap::NUW);

    // weaker requests never clear what is known
    pool.intern(sum, ScevFlags::empty());
    assert_eq!(pool.no_wrap(plain), NoWrap::NUW);
}

#[test]
fn flags_are_masked_per_kind() {
    let mut pool = ScevPool::new();
    let x = opaque(&mut pool, 0, ScalarType::I64, false);
    let cast = pool.intern(
        ScevData::Cast {
            op: CastOp::Truncate,
            operand: x,
            ty: ScalarType::I32,
        },
        ScevFlags::new(false, NoWrap::NSW),
    );
    assert!(pool.no_wrap(cast).is_empty());

    pool.refine_no_wrap(cast, NoWrap::NUW);
    assert!(pool.no_wrap(cast).is_empty());
}

#[test]
#[should_panic(expected = "different pointer flag")]
fn pointer_flag_is_fixed_at_construction() {
    let mut pool = ScevPool::new();
    opaque(&mut pool, 0, ScalarType::ptr(10), true);
    opaque(&mut pool, 0, ScalarType::ptr(10), false);
}

#[test]
fn recurrence_accessors() {
    let mut pool = ScevPool::new();
    let start = constant(&mut pool, 0);
    let step = constant(&mut pool, 4);
    let rec = pool.intern(
        ScevData::Recurrence {
            operands: ops(&[start, step]),
            loop_id: LoopId::new(2),
        },
        ScevFlags::empty(),
    );
    assert_eq!(pool.recurrence_loop(rec), Some(LoopId::new(2)));
    assert_eq!(pool.recurrence_loop(start), None);
    assert_eq!(pool.operands(rec), &[start, step]);
    assert_eq!(pool.flags(rec), ScevFlags::empty());
}

// Type derivation

#[test]
fn plain_sum_prefers_pointer_operands() {
    let mut pool = ScevPool::new();
    let offset = opaque(&mut pool, 0, ScalarType::I64, false);
    let ptr = opaque(&mut pool, 1, ScalarType::ptr(0), false);
    let sum = pool.intern(
        ScevData::Sum(SumShape::Plain(ops(&[offset, ptr]))),
        ScevFlags::empty(),
    );
    assert_eq!(pool.ty(sum), ScalarType::ptr(0));

    let ints = pool.intern(
        ScevData::Sum(SumShape::Plain(ops(&[offset, offset]))),
        ScevFlags::empty(),
    );
    assert_eq!(pool.ty(ints), ScalarType::I64);
}

#[test]
fn pointer_typed_sum_reports_its_recorded_type() {
    let mut pool = ScevPool::new();
    let offset = opaque(&mut pool, 0, ScalarType::I64, false);
    let other_offset = opaque(&mut pool, 1, ScalarType::I64, false);
    // a recorded type is trusted even when no operand is a pointer of it
    let sum = pool.intern(
        ScevData::Sum(SumShape::PointerTyped {
            operands: ops(&[offset, other_offset]),
            ty: ScalarType::ptr(10),
        }),
        ScevFlags::new(true, NoWrap::empty()),
    );
    assert_eq!(pool.ty(sum), ScalarType::ptr(10));
    assert!(pool.has_non_standard_pointer(sum));
}

#[test]
fn pointer_product_takes_the_last_operand_type() {
    let mut pool = ScevPool::new();
    let minus_one = constant(&mut pool, -1);
    let ptr = opaque(&mut pool, 0, ScalarType::ptr(10), true);
    let negated = pool.intern(
        ScevData::Product(ops(&[minus_one, ptr])),
        ScevFlags::new(true, NoWrap::empty()),
    );
    assert_eq!(pool.ty(negated), ScalarType::ptr(10));

    let x = opaque(&mut pool, 1, ScalarType::I64, false);
    let product = pool.intern(
        ScevData::Product(ops(&[minus_one, x])),
        ScevFlags::empty(),
    );
    assert_eq!(pool.ty(product), ScalarType::I64);
}

#[test]
#[should_panic(expected = "could-not-compute")]
fn sentinel_has_no_type() {
    let pool = ScevPool::new();
    pool.ty(ScevId::COULD_NOT_COMPUTE);
}

// Printing

#[test]
fn unnamed_values_and_loops() {
    let mut pool = ScevPool::new();
    let x = opaque(&mut pool, 3, ScalarType::I64, false);
    let step = constant(&mut pool, -2);
    let rec = pool.intern(
        ScevData::Recurrence {
            operands: ops(&[x, step]),
            loop_id: LoopId::new(1),
        },
        ScevFlags::new(false, NoWrap::NUW),
    );
    assert_eq!(pool.display(rec, &Anonymous).to_string(), "{%v3,+,-2}<nuw><%loop1>");
    assert_eq!(
        pool.display(ScevId::COULD_NOT_COMPUTE, &Anonymous).to_string(),
        "***COULDNOTCOMPUTE***"
    );
}

#[test]
fn min_max_and_debug_rendering() {
    let mut pool = ScevPool::new();
    let x = opaque(&mut pool, 0, ScalarType::I64, false);
    let y = opaque(&mut pool, 1, ScalarType::I64, false);
    let smin = pool.intern(
        ScevData::MinMax {
            kind: MinMaxKind::SMin,
            operands: ops(&[x, y]),
        },
        ScevFlags::empty(),
    );
    assert_eq!(pool.display(smin, &Anonymous).to_string(), "(%v0 smin %v1)");
    assert_eq!(
        format!("{:?}", pool.display(x, &Anonymous)),
        format!("{x:?} = %v0")
    );
}
