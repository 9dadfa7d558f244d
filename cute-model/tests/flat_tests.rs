use cute_model::{FlatRecord, FlatValue, SYS_KEYS, is_sys_key, sys_key};
use cute_types::CmsTimestamp;
use serde_json::json;

// ── FlatValue ─────────────────────────────────────────────────────

#[test]
fn blank_covers_null_and_whitespace() {
    assert!(FlatValue::Null.is_blank());
    assert!(FlatValue::from("  ").is_blank());
    assert!(!FlatValue::from("x").is_blank());
    assert!(!FlatValue::Integer(0).is_blank());
}

#[test]
fn display_forms() {
    assert_eq!(FlatValue::Null.to_string(), "");
    assert_eq!(FlatValue::Bool(true).to_string(), "true");
    assert_eq!(FlatValue::Integer(-4).to_string(), "-4");
    assert_eq!(FlatValue::Number(50.945359).to_string(), "50.945359");
    assert_eq!(FlatValue::Number(2.0).to_string(), "2");
    let date = CmsTimestamp::parse("2024-03-01T10:20:30.5Z").unwrap();
    assert_eq!(FlatValue::Date(date).to_string(), "2024-03-01T10:20:30Z");
}

#[test]
fn to_text_is_none_when_blank() {
    assert_eq!(FlatValue::from("").to_text(), None);
    assert_eq!(FlatValue::from(3i64).to_text(), Some("3".into()));
}

#[test]
fn option_conversion() {
    assert_eq!(FlatValue::from(None::<i64>), FlatValue::Null);
    assert_eq!(FlatValue::from(Some("a")), FlatValue::String("a".into()));
}

#[test]
fn from_json_maps_scalars_and_keeps_structures_as_text() {
    assert_eq!(FlatValue::from_json(&json!(null)), FlatValue::Null);
    assert_eq!(FlatValue::from_json(&json!(7)), FlatValue::Integer(7));
    assert_eq!(FlatValue::from_json(&json!(7.5)), FlatValue::Number(7.5));
    assert_eq!(FlatValue::from_json(&json!(false)), FlatValue::Bool(false));
    assert_eq!(FlatValue::from_json(&json!({"a": 1})), FlatValue::from(r#"{"a":1}"#));
}

#[test]
fn to_json_renders_dates_as_strings() {
    let date = CmsTimestamp::parse("2024-03-01").unwrap();
    assert_eq!(FlatValue::Date(date).to_json(), json!("2024-03-01T00:00:00Z"));
    assert_eq!(FlatValue::Number(f64::NAN).to_json(), json!(null));
}

#[test]
fn untagged_serde() {
    let json = serde_json::to_string(&vec![
        FlatValue::Null,
        FlatValue::Bool(true),
        FlatValue::Integer(1),
        FlatValue::Number(1.5),
        FlatValue::from("s"),
    ])
    .unwrap();
    assert_eq!(json, r#"[null,true,1,1.5,"s"]"#);

    let back: Vec<FlatValue> = serde_json::from_str(&json).unwrap();
    assert_eq!(back[0], FlatValue::Null);
    assert_eq!(back[2], FlatValue::Integer(1));
    assert_eq!(back[3], FlatValue::Number(1.5));
}

// ── FlatRecord ────────────────────────────────────────────────────

#[test]
fn keeps_insertion_order() {
    let mut record = FlatRecord::new();
    record.insert("b", "2");
    record.insert("a", "1");
    record.insert("c", "3");
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);

    record.insert("b", "changed");
    assert_eq!(record.keys().next(), Some("b"));

    record.remove("a");
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "c"]);
}

#[test]
fn value_defaults_to_null() {
    let record: FlatRecord = [("x", FlatValue::from(1i64))].into_iter().collect();
    assert_eq!(record.value("x"), &FlatValue::Integer(1));
    assert_eq!(record.value("missing"), &FlatValue::Null);
    assert!(record.get("missing").is_none());
}

#[test]
fn serializes_as_json_object() {
    let record: FlatRecord = [("sys.Id", FlatValue::from("a")), ("title.en", FlatValue::Null)]
        .into_iter()
        .collect();
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"sys.Id":"a","title.en":null}"#
    );
}

// ── sys keys ──────────────────────────────────────────────────────

#[test]
fn sys_keys_are_fixed() {
    assert_eq!(SYS_KEYS.len(), 11);
    assert_eq!(SYS_KEYS[0], sys_key::ID);
    assert_eq!(SYS_KEYS[10], sys_key::ENVIRONMENT);
    assert!(SYS_KEYS.iter().all(|k| is_sys_key(k)));
    assert!(!is_sys_key("title.en"));
}
