use pretty_assertions::assert_eq;

use super::*;

#[test]
fn display_types() {
    assert_eq!(ScalarType::I64.to_string(), "i64");
    assert_eq!(ScalarType::ptr(0).to_string(), "ptr");
    assert_eq!(ScalarType::ptr(10).to_string(), "ptr addrspace(10)");
}

#[test]
fn int_bits_only_for_integers() {
    assert_eq!(ScalarType::I32.int_bits(), Some(32));
    assert_eq!(ScalarType::ptr(1).int_bits(), None);
    assert!(ScalarType::ptr(1).is_pointer());
    assert!(ScalarType::I8.is_integer());
}

#[test]
fn non_integral_spaces_are_non_standard() {
    let layout = DataLayout::new(64).with_non_integral(10);
    assert!(layout.is_non_standard_pointer(ScalarType::ptr(10)));
    assert!(!layout.is_non_standard_pointer(ScalarType::ptr(0)));
    assert!(!layout.is_non_standard_pointer(ScalarType::I64));
}

#[test]
fn effective_type_of_pointer_is_pointer_width_integer() {
    let layout = DataLayout::new(64).with_pointer_bits(3, 32);
    assert_eq!(layout.effective_type(ScalarType::ptr(0)), ScalarType::I64);
    assert_eq!(layout.effective_type(ScalarType::ptr(3)), ScalarType::I32);
    assert_eq!(layout.effective_type(ScalarType::I8), ScalarType::I8);
    assert_eq!(layout.effective_bits(ScalarType::ptr(3)), 32);
}

#[test]
fn parse_pointer_specs_and_non_integral_list() {
    let layout = match DataLayout::parse("e-m:e-p:32:32-p1:64:64-i64:64-ni:10:11") {
        Ok(layout) => layout,
        Err(err) => panic!("layout should parse: {err}"),
    };
    assert_eq!(layout.pointer_bits(0), 32);
    assert_eq!(layout.pointer_bits(1), 64);
    assert_eq!(layout.pointer_bits(7), 32);
    assert!(layout.is_non_standard_pointer(ScalarType::ptr(10)));
    assert!(layout.is_non_standard_pointer(ScalarType::ptr(11)));
    assert!(!layout.is_non_standard_pointer(ScalarType::ptr(1)));
}

#[test]
fn parse_rejects_bad_numbers() {
    assert_eq!(
        DataLayout::parse("ni:abc").err(),
        Some(LayoutError::InvalidNumber {
            component: "ni:abc".to_owned(),
            text: "abc".to_owned(),
        })
    );
    assert_eq!(
        DataLayout::parse("p:0:0").err(),
        Some(LayoutError::InvalidPointerWidth {
            component: "p:0:0".to_owned(),
            bits: 0,
        })
    );
}
