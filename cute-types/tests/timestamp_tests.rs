use chrono::{TimeZone, Timelike, Utc};
use cute_types::{CmsTimestamp, EntryId, Error};

// ── Parsing ───────────────────────────────────────────────────────

#[test]
fn parses_rfc3339_utc() {
    let ts = CmsTimestamp::parse("2024-03-01T10:20:30Z").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-03-01T10:20:30Z");
}

#[test]
fn drops_subsecond_precision() {
    let ts = CmsTimestamp::parse("2024-03-01T10:20:30.987Z").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-03-01T10:20:30Z");
    assert_eq!(ts.as_datetime().nanosecond(), 0);
}

#[test]
fn keeps_numeric_offset() {
    let ts = CmsTimestamp::parse("2024-03-01T10:20:30+02:00").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-03-01T10:20:30+02:00");
    assert_eq!(ts.to_utc(), Utc.with_ymd_and_hms(2024, 3, 1, 8, 20, 30).unwrap());
}

#[test]
fn parses_minute_precision_with_offset() {
    let ts = CmsTimestamp::parse("2024-03-01T10:20+01:00").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-03-01T10:20:00+01:00");
}

#[test]
fn parses_space_separated_universal_format() {
    let ts = CmsTimestamp::parse("2024-03-01 10:20:30Z").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-03-01T10:20:30Z");
}

#[test]
fn naive_values_are_utc() {
    let ts = CmsTimestamp::parse("2024-03-01T10:20:30").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-03-01T10:20:30Z");
    let ts = CmsTimestamp::parse("2024-03-01T10:20").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-03-01T10:20:00Z");
}

#[test]
fn parses_bare_date_as_midnight() {
    let ts = CmsTimestamp::parse("2024-03-01").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-03-01T00:00:00Z");
}

#[test]
fn rejects_garbage_and_empty() {
    assert!(CmsTimestamp::parse("not a date").is_err());
    assert!(CmsTimestamp::parse("   ").is_err());
    assert!(CmsTimestamp::parse("2024-13-45").is_err());
}

#[test]
fn errors_name_the_rejected_input() {
    // No wildcard arm: each variant needs a producer below.
    for err in [
        CmsTimestamp::parse("yesterday").unwrap_err(),
        EntryId::parse("bad id").unwrap_err(),
    ] {
        match &err {
            Error::InvalidTimestamp(input) => assert!(input.contains("yesterday")),
            Error::InvalidEntryId(input) => assert!(input.contains("bad id")),
        }
        assert!(err.to_string().starts_with("invalid "));
    }
}

// ── Equality & ordering ───────────────────────────────────────────

#[test]
fn equality_is_by_instant() {
    let a = CmsTimestamp::parse("2024-03-01T10:00:00+02:00").unwrap();
    let b = CmsTimestamp::parse("2024-03-01T08:00:00Z").unwrap();
    assert_eq!(a, b);
}

#[test]
fn ordering_follows_time() {
    let early = CmsTimestamp::parse("2024-01-01").unwrap();
    let late = CmsTimestamp::parse("2024-06-01").unwrap();
    assert!(early < late);
}

#[test]
fn from_utc_truncates() {
    let dt = Utc.with_ymd_and_hms(2023, 5, 6, 7, 8, 9).unwrap() + chrono::Duration::milliseconds(450);
    let ts = CmsTimestamp::from(dt);
    assert_eq!(ts.to_string(), "2023-05-06T07:08:09Z");
}

// ── Serde ─────────────────────────────────────────────────────────

#[test]
fn serde_uses_rfc3339_string() {
    let ts = CmsTimestamp::parse("2024-03-01T10:20:30.5Z").unwrap();
    let json = serde_json::to_string(&ts).unwrap();
    assert_eq!(json, "\"2024-03-01T10:20:30Z\"");
    let back: CmsTimestamp = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ts);
}

#[test]
fn deserialize_rejects_invalid() {
    assert!(serde_json::from_str::<CmsTimestamp>("\"yesterday\"").is_err());
}
