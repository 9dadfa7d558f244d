use cute_transcode::{ArrayComparison, CodecConfig, ConfigError};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn defaults() {
    let config = CodecConfig::default();
    assert_eq!(config.id_prefix, "cute-");
    assert_eq!(config.id_length, 22);
    assert_eq!(config.default_link_type, "Entry");
    assert_eq!(config.array_comparison, ArrayComparison::Ordered);
}

#[test]
fn empty_toml_is_default() {
    assert_eq!(CodecConfig::from_toml_str("").unwrap(), CodecConfig::default());
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let config = CodecConfig::from_toml_str(
        r#"
        id_prefix = "import-"
        array_comparison = "multiset"
        "#,
    )
    .unwrap();
    assert_eq!(config.id_prefix, "import-");
    assert_eq!(config.array_comparison, ArrayComparison::Multiset);
    assert_eq!(config.id_length, 22);
    assert_eq!(config.default_link_type, "Entry");
}

#[test]
fn rejects_unknown_comparison() {
    let err = CodecConfig::from_toml_str(r#"array_comparison = "fuzzy""#).unwrap_err();
    assert!(matches!(err, ConfigError::TomlDeserialize(_)));
}

#[test]
fn serializes_back_to_toml() {
    let config = CodecConfig {
        id_length: 10,
        ..CodecConfig::default()
    };
    let text = toml::to_string(&config).unwrap();
    assert_eq!(CodecConfig::from_toml_str(&text).unwrap(), config);
}

// ── Loading from disk ─────────────────────────────────────────────

#[test]
fn loads_from_file() {
    let file = write_config("id_length = 12\ndefault_link_type = \"Asset\"\n");
    let config = CodecConfig::try_load_from(file.path()).unwrap();
    assert_eq!(config.id_length, 12);
    assert_eq!(config.default_link_type, "Asset");
    assert_eq!(CodecConfig::load_from(file.path()), config);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("codec.toml");
    assert_eq!(CodecConfig::load_from(&path), CodecConfig::default());
    assert!(matches!(CodecConfig::try_load_from(&path), Err(ConfigError::Io(_))));
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let file = write_config("id_length = \"many\"");
    assert!(CodecConfig::try_load_from(file.path()).is_err());
    assert_eq!(CodecConfig::load_from(file.path()), CodecConfig::default());
}
