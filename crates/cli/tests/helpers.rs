use std::fs;

use code_explainer::{load_config, parse_address};
use tempfile::tempdir;

#[test]
fn parse_address_accepts_hex_and_decimal() {
    assert_eq!(parse_address("0x1000").unwrap(), 0x1000);
    assert_eq!(parse_address("0XfF").unwrap(), 0xFF);
    assert_eq!(parse_address(" 4096 ").unwrap(), 4096);
}

#[test]
fn parse_address_rejects_garbage() {
    let err = parse_address("0xZZ").unwrap_err();
    assert!(err.to_string().contains("Invalid address"));
    assert!(parse_address("main").is_err());
}

#[test]
fn load_config_defaults_without_path() {
    let config = load_config(None).expect("defaults");
    assert_eq!(config.text_segment, "__TEXT");
    assert_eq!(config.wrap_width, 80);
}

#[test]
fn load_config_reads_file_and_reports_bad_json() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.json");
    fs::write(&good, r#"{"api_key":"sk-test","wrap_width":60,"ignored_labels":[]}"#).unwrap();
    let config = load_config(Some(good.as_path())).expect("config");
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.wrap_width, 60);
    assert!(config.ignored_labels.is_empty());

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    let err = load_config(Some(bad.as_path())).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load config"));
}
