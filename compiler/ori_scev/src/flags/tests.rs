use super::*;

#[test]
fn flags_size() {
    assert_eq!(std::mem::size_of::<ScevFlags>(), 1);
    assert_eq!(std::mem::size_of::<NoWrap>(), 1);
}

#[test]
fn no_wrap_bits_line_up() {
    assert_eq!(NoWrap::NUW.bits(), ScevFlags::NUW.bits());
    assert_eq!(NoWrap::NSW.bits(), ScevFlags::NSW.bits());
    assert_eq!(NoWrap::NW.bits(), ScevFlags::NW.bits());
    assert!(!ScevFlags::NO_WRAP_MASK.contains(ScevFlags::HAS_NON_STANDARD_POINTER));
}

#[test]
fn new_sets_marker_and_guarantees() {
    let flags = ScevFlags::new(true, NoWrap::NSW);
    assert!(flags.has_non_standard_pointer());
    assert_eq!(flags.no_wrap(), NoWrap::NSW);

    let plain = ScevFlags::new(false, NoWrap::empty());
    assert!(!plain.has_non_standard_pointer());
    assert!(plain.no_wrap().is_empty());
}

#[test]
fn strengthening_keeps_pointer_marker() {
    let flags = ScevFlags::new(true, NoWrap::NUW).strengthened(NoWrap::NSW);
    assert!(flags.has_non_standard_pointer());
    assert_eq!(flags.no_wrap(), NoWrap::NUW | NoWrap::NSW);

    let flags = ScevFlags::new(false, NoWrap::empty()).strengthened(NoWrap::NUW);
    assert!(!flags.has_non_standard_pointer());
}

#[test]
fn for_kind_masks_meaningless_bits() {
    assert_eq!(
        (NoWrap::NUW | NoWrap::NW).for_kind(ScevKind::Sum),
        NoWrap::NUW
    );
    assert_eq!(
        NoWrap::NSW.for_kind(ScevKind::Recurrence),
        NoWrap::NSW | NoWrap::NW
    );
    assert_eq!(NoWrap::NW.for_kind(ScevKind::Recurrence), NoWrap::NW);
    assert!(NoWrap::all().for_kind(ScevKind::SMax).is_empty());
}

#[test]
fn any_pointer_is_an_or() {
    let plain = ScevFlags::new(false, NoWrap::NUW);
    let ptr = ScevFlags::new(true, NoWrap::empty());
    assert!(!ScevFlags::any_pointer([plain, plain]));
    assert!(ScevFlags::any_pointer([plain, ptr]));
    assert!(!ScevFlags::any_pointer([]));
}
