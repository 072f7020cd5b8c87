use super::*;
use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn define_id_hash_map_lookup() {
    let id = TestId::from_string("tst-abc");
    let mut map = HashMap::new();
    map.insert(id, 42);
    assert_eq!(map.get("tst-abc"), Some(&42));
}

#[test]
fn define_id_new_has_prefix() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("tst-"));
}

#[test]
fn define_id_suffix_strips_prefix() {
    let id = TestId::from_string("tst-xyz123");
    assert_eq!(id.suffix(), "xyz123");
}

#[test]
fn define_id_short_truncates_suffix() {
    let id = TestId::from_string("tst-abcdefghijklmnop");
    assert_eq!(id.short(8), "abcdefgh");
}

#[test]
fn define_id_short_returns_full_when_shorter() {
    let id = TestId::from_string("tst-ab");
    assert_eq!(id.short(8), "ab");
}

#[test]
fn short_fn_on_str() {
    let s = "abcdefghijklmnop";
    assert_eq!(short(s, 8), "abcdefgh");
    assert_eq!(short(s, 100), s);
    assert_eq!(short("abc", 8), "abc");
}

#[test]
fn define_id_two_new_ids_are_distinct() {
    assert_ne!(TestId::new(), TestId::new());
}
