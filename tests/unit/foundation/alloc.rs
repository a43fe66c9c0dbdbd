use super::*;

#[test]
fn filled_vec_has_requested_len() {
    let v = try_filled(6, 7u8, "test").unwrap();
    assert_eq!(v, vec![7; 6]);
    let v: Vec<u32> = try_with_capacity(10, "test").unwrap();
    assert!(v.is_empty());
    assert!(v.capacity() >= 10);
}

#[test]
fn impossible_allocation_is_reported() {
    let err = try_filled(usize::MAX, 0u8, "huge").unwrap_err();
    assert!(err.to_string().starts_with("allocation error:"));
}

#[test]
fn rgba_len_checks_overflow() {
    assert_eq!(rgba_len(3, 2).unwrap(), 24);
    assert!(rgba_len(u32::MAX, u32::MAX).is_err());
    assert_eq!(rgba_len(0, 5).unwrap(), 0);
}
