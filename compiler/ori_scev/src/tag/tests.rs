use super::*;

#[test]
fn constants_lead_and_opaque_trails() {
    let all = [
        ScevKind::Constant,
        ScevKind::Truncate,
        ScevKind::ZeroExtend,
        ScevKind::SignExtend,
        ScevKind::Sum,
        ScevKind::Product,
        ScevKind::Recurrence,
        ScevKind::UMax,
        ScevKind::SMax,
        ScevKind::UMin,
        ScevKind::SMin,
        ScevKind::Opaque,
    ];
    for kind in all {
        assert!(ScevKind::Constant.rank() <= kind.rank());
        assert!(kind.rank() <= ScevKind::Opaque.rank());
    }
    assert!(ScevKind::Recurrence.rank() < ScevKind::Opaque.rank());
}

#[test]
fn no_wrap_kinds() {
    assert!(ScevKind::Sum.carries_no_wrap());
    assert!(ScevKind::Product.carries_no_wrap());
    assert!(ScevKind::Recurrence.carries_no_wrap());
    assert!(!ScevKind::ZeroExtend.carries_no_wrap());
    assert!(!ScevKind::UMax.carries_no_wrap());
}

#[test]
fn names_render() {
    assert_eq!(ScevKind::Sum.to_string(), "sum");
    assert_eq!(format!("{:?}", ScevKind::SMax), "ScevKind::smax");
}
