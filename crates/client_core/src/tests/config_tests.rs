use super::*;

use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_point_at_local_service() {
    let settings = Settings::default();
    assert_eq!(settings.base_url, "http://127.0.0.1:8000");
    assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    assert_eq!(settings.file_range_policy, FileRangePolicy::Reject);
}

#[test]
fn normalizes_trailing_slash_and_rejects_bad_urls() {
    assert_eq!(
        normalize_base_url(" http://localhost:8000/ ").expect("url"),
        "http://localhost:8000"
    );
    assert_eq!(
        normalize_base_url("https://calc.example.com/api/").expect("url"),
        "https://calc.example.com/api"
    );
    assert_eq!(normalize_base_url("").expect("default"), DEFAULT_BASE_URL);
    assert!(normalize_base_url("ftp://host").is_err());
    assert!(normalize_base_url("not a url").is_err());
}

#[test]
fn base_url_with_query_or_fragment_is_rejected() {
    let err = normalize_base_url("http://host:8000/?x=1").expect_err("query");
    assert!(err.to_string().contains("query or fragment"), "{err}");
    assert!(normalize_base_url("http://host:8000/#top").is_err());
    assert!(Settings::default().with_base_url("http://host?debug").is_err());
}

#[test]
fn zero_timeout_is_rejected_from_env_and_file() {
    let mut settings = Settings::default();
    let err = apply_env(&mut settings, env_of(&[("APP__REQUEST_TIMEOUT_MS", "0")]))
        .expect_err("zero timeout");
    assert!(err.to_string().contains("greater than zero"), "{err}");
    assert_eq!(settings.request_timeout_ms, 10_000);

    let file: FileSettings = toml::from_str("request_timeout_ms = 0").expect("parse");
    assert!(apply_file(&mut settings, file).is_err());
    assert_eq!(settings.request_timeout_ms, 10_000);
}

#[test]
fn app_prefixed_env_wins_over_short_name() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_of(&[
            ("CALC_BASE_URL", "http://short:1"),
            ("APP__BASE_URL", "http://prefixed:2"),
            ("APP__REQUEST_TIMEOUT_MS", "250"),
            ("APP__FILE_RANGE_POLICY", "Accept"),
        ]),
    )
    .expect("env");

    assert_eq!(settings.base_url, "http://prefixed:2");
    assert_eq!(settings.request_timeout_ms, 250);
    assert_eq!(settings.file_range_policy, FileRangePolicy::Accept);
}

#[test]
fn invalid_env_values_are_reported() {
    let mut settings = Settings::default();
    assert!(apply_env(&mut settings, env_of(&[("APP__REQUEST_TIMEOUT_MS", "soon")])).is_err());
    assert!(apply_env(&mut settings, env_of(&[("APP__FILE_RANGE_POLICY", "clamp")])).is_err());
}

#[test]
fn settings_file_overrides_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("calc.toml");
    fs::write(
        &path,
        "base_url = \"http://10.1.1.1:8000/\"\nrequest_timeout_ms = 1500\nfile_range_policy = \"accept\"\n",
    )
    .expect("write");

    let file = read_settings_file(&path).expect("parse");
    let mut settings = Settings::default();
    apply_file(&mut settings, file).expect("apply");

    assert_eq!(settings.base_url, "http://10.1.1.1:8000/");
    assert_eq!(settings.request_timeout_ms, 1500);
    assert_eq!(settings.file_range_policy, FileRangePolicy::Accept);
}

#[test]
fn explicit_missing_settings_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_settings(Some(&dir.path().join("absent.toml"))).expect_err("missing");
    assert!(err.to_string().contains("failed to read settings file"));
}
