use pretty_assertions::assert_eq;

use crate::test_helpers::{show, Fixture, GC_PTR};
use crate::{NoWrap, ScalarType};

#[test]
fn leaves_defined_outside_a_loop_are_invariant() {
    let fx = Fixture::new();
    let mut se = fx.session();
    let n = se.opaque(fx.n);
    let off = se.opaque(fx.offset);
    let five = se.constant(ScalarType::I64, 5);

    assert!(se.is_loop_invariant(five, fx.outer));
    assert!(se.is_loop_invariant(n, fx.outer));
    assert!(!se.is_loop_invariant(off, fx.outer));
    // defined in the outer body, before the inner loop runs
    assert!(se.is_loop_invariant(off, fx.inner));
    assert!(se.is_loop_invariant(off, fx.sibling));
}

#[test]
fn recurrence_invariance_follows_nesting() {
    let fx = Fixture::new();
    let mut se = fx.session();
    let n = se.opaque(fx.n);
    let one = se.one(ScalarType::I64);
    let outer = se.affine_recurrence(n, one, fx.outer, NoWrap::empty());
    let inner = se.affine_recurrence(n, one, fx.inner, NoWrap::empty());
    let sibling = se.affine_recurrence(n, one, fx.sibling, NoWrap::empty());

    assert!(!se.is_loop_invariant(outer, fx.outer));
    assert!(se.is_loop_invariant(outer, fx.inner));
    assert!(!se.is_loop_invariant(inner, fx.outer));
    assert!(!se.is_loop_invariant(sibling, fx.outer));

    let mixed = se.add(outer, n);
    assert!(!se.is_loop_invariant(mixed, fx.outer));
    assert!(se.is_loop_invariant(mixed, fx.inner));
}

#[test]
fn sibling_recurrences_are_not_folded_together() {
    let fx = Fixture::new();
    let mut se = fx.session();
    let n = se.opaque(fx.n);
    let one = se.one(ScalarType::I64);
    let a = se.affine_recurrence(n, one, fx.outer, NoWrap::empty());
    let b = se.affine_recurrence(n, one, fx.sibling, NoWrap::empty());
    let both = se.add(a, b);
    assert_eq!(se.pool().operands(both), &[a, b]);
}

#[test]
fn pointer_base_walks_starts_and_sums() {
    let fx = Fixture::new();
    let mut se = fx.session();
    let base = se.opaque(fx.base);
    let other = se.opaque(fx.other);
    let off = se.opaque(fx.offset);
    let n = se.opaque(fx.n);
    let raw = se.opaque(fx.raw);
    let eight = se.constant(ScalarType::I64, 8);

    let rec = se.affine_recurrence(base, eight, fx.outer, NoWrap::empty());
    let addr = se.add(rec, off);
    assert_eq!(se.pointer_base(addr), base);

    let diff = se.minus(base, other);
    assert_eq!(se.pointer_base(diff), base);

    let plain = se.add(raw, n);
    assert_eq!(se.pointer_base(plain), raw);
    assert_eq!(se.pointer_base(n), n);
}

#[test]
fn post_increment_advances_one_iteration() {
    let fx = Fixture::new();
    let mut se = fx.session();
    let n = se.opaque(fx.n);
    let base = se.opaque(fx.base);
    let one = se.one(ScalarType::I64);
    let eight = se.constant(ScalarType::I64, 8);

    let counter = se.affine_recurrence(n, one, fx.outer, NoWrap::empty());
    let next = se.post_increment(counter);
    assert_eq!(show(&se, next), "{(1 + %n),+,1}<%outer>");

    let cursor = se.affine_recurrence(base, eight, fx.outer, NoWrap::empty());
    let next = se.post_increment(cursor);
    assert_eq!(show(&se, next), "{(8 + %base),+,8}<%outer>");
    assert!(se.has_non_standard_pointer(next));
    assert_eq!(se.ty(next), GC_PTR);
}

#[test]
fn higher_order_recurrence_steps() {
    let fx = Fixture::new();
    let mut se = fx.session();
    let n = se.opaque(fx.n);
    let m = se.opaque(fx.m);
    let one = se.one(ScalarType::I64);
    let quadratic = se.recurrence(&[n, m, one], fx.outer, NoWrap::empty());

    let step = se.recurrence_step(quadratic);
    assert_eq!(step, Some(se.affine_recurrence(m, one, fx.outer, NoWrap::empty())));
    assert_eq!(se.recurrence_start(quadratic), Some(n));
    assert_eq!(se.recurrence_start(n), None);
    assert_eq!(se.recurrence_step(n), None);

    let next = se.post_increment(quadratic);
    assert_eq!(show(&se, next), "{(%n + %m),+,(1 + %m),+,1}<%outer>");
}

#[test]
#[should_panic(expected = "post-increment of non-recurrence")]
fn post_increment_of_a_leaf_panics() {
    let fx = Fixture::new();
    let mut se = fx.session();
    let n = se.opaque(fx.n);
    se.post_increment(n);
}
