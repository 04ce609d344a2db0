use super::{apply_env_overrides, apply_file_overrides, build_directory, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_bind_locally_with_demo_limits() {
    let settings = Settings::default();
    assert_eq!(settings.server_bind, "127.0.0.1:3000");
    assert_eq!(settings.empty_query_limit, 8);
    assert!(settings.client_catalog_path.is_none());
}

#[test]
fn settings_file_overrides_defaults() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        r#"
            bind_addr = "0.0.0.0:8080"
            client_catalog = "clients.toml"
            empty_query_limit = 3
        "#,
    )
    .expect("parse");
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.client_catalog_path.as_deref(), Some("clients.toml"));
    assert_eq!(settings.empty_query_limit, 3);
    assert_eq!(settings.max_body_bytes, Settings::default().max_body_bytes);
}

#[test]
fn malformed_settings_file_is_reported() {
    let mut settings = Settings::default();
    assert!(apply_file_overrides(&mut settings, "bind_addr = [").is_err());
    assert_eq!(settings, Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_legacy_bind_var() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:4000"),
            ("APP__BIND_ADDR", "127.0.0.1:5000"),
            ("APP__MAX_BODY_BYTES", "2048"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:5000");
    assert_eq!(settings.max_body_bytes, 2048);
}

#[test]
fn unparsable_numeric_env_keeps_previous_value() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[("APP__EMPTY_QUERY_LIMIT", "lots")]),
    );
    assert_eq!(settings.empty_query_limit, 8);
}

#[test]
fn directory_defaults_to_demo_catalog() {
    let directory = build_directory(&Settings::default()).expect("directory");
    assert_eq!(directory.len(), 4);
}

#[test]
fn directory_loads_catalog_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("writers_intake_catalog_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("clients.toml");
    fs::write(
        &path,
        "[[clients]]\nid = \"9\"\nname = \"Durham Bulls\"\n",
    )
    .expect("write catalog");

    let settings = Settings {
        client_catalog_path: Some(path.to_string_lossy().into_owned()),
        ..Settings::default()
    };
    let directory = build_directory(&settings).expect("directory");
    assert_eq!(directory.search("bulls").len(), 1);

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn empty_catalog_file_yields_empty_directory() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("writers_intake_empty_catalog_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("clients.toml");
    fs::write(&path, "# no clients yet\n").expect("write catalog");

    let settings = Settings {
        client_catalog_path: Some(path.to_string_lossy().into_owned()),
        ..Settings::default()
    };
    let directory = build_directory(&settings).expect("directory");
    assert!(directory.is_empty());
    assert_eq!(directory.len(), 0);
    assert!(directory.search("").is_empty());

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_catalog_file_is_an_error() {
    let settings = Settings {
        client_catalog_path: Some("/definitely/not/here/clients.toml".into()),
        ..Settings::default()
    };
    let err = build_directory(&settings).expect_err("missing file");
    assert!(err.to_string().contains("failed to read client catalog"));
}
