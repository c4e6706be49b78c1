use std::{fs, sync::Mutex};

use glide_config::{ConfigLoadError, ConfigLoader, ConfigSource, loader};
use glide_core::{AutoPlayDirection, EdgeBehavior, Orientation};
use once_cell::sync::Lazy;
use tempfile::tempdir;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn clear_env() {
    for key in [loader::PATH_VAR, loader::JSON_VAR] {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
fn env_path_wins_over_inline_json() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("carousel.toml");
    fs::write(
        &path,
        r#"
        orientation = "vertical"

        [touch.edge]
        behavior = "stop"
        "#,
    )
    .expect("write config");

    unsafe { std::env::set_var(loader::PATH_VAR, &path) };
    unsafe {
        std::env::set_var(loader::JSON_VAR, r#"{ "wrap_mode": "infinite" }"#)
    };
    let loaded = ConfigLoader::from_env().load();
    clear_env();

    let loaded = loaded.expect("load from path");
    assert_eq!(loaded.source, ConfigSource::EnvPath(path));
    assert_eq!(loaded.config.orientation, Orientation::Vertical);
    assert_eq!(loaded.config.touch.edge.behavior, EdgeBehavior::Stop);
    assert!(!loaded.config.wrap_around());
}

#[test]
fn inline_json_is_used_when_no_path() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    unsafe {
        std::env::set_var(
            loader::JSON_VAR,
            r#"{ "autoplay": { "direction": "enabled", "interval_ms": 1500 } }"#,
        )
    };
    let loaded = ConfigLoader::from_env().load();
    clear_env();

    let loaded = loaded.expect("inline json");
    assert_eq!(loaded.source, ConfigSource::EnvInline);
    assert_eq!(loaded.config.autoplay.direction, AutoPlayDirection::Forward);
    assert_eq!(loaded.config.autoplay.interval_ms, 1500);
}

#[test]
fn blank_env_values_are_ignored() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = tempdir().expect("tempdir");
    unsafe { std::env::set_var(loader::PATH_VAR, "   ") };
    unsafe { std::env::set_var(loader::JSON_VAR, "") };
    let loaded = ConfigLoader::from_env().with_search_root(dir.path()).load();
    clear_env();

    assert_eq!(loaded.expect("defaults").source, ConfigSource::Default);
}

#[test]
fn malformed_inline_json_names_the_variable() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    unsafe { std::env::set_var(loader::JSON_VAR, "{ not json") };
    let result = ConfigLoader::from_env().load();
    clear_env();

    match result {
        Err(ConfigLoadError::Inline { var, .. }) => {
            assert_eq!(var, loader::JSON_VAR)
        }
        other => panic!("expected inline parse error, got {other:?}"),
    }
}

#[test]
fn default_file_is_found_in_config_subdir() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("config")).expect("mkdir");
    let path = dir.path().join("config").join("glide.json");
    fs::write(&path, r#"{ "wrap_mode": "infinite" }"#).expect("write");

    let loaded = ConfigLoader::in_dir(dir.path()).load().expect("load");
    assert_eq!(loaded.source, ConfigSource::File(path));
    assert!(loaded.config.wrap_around());
}

#[test]
fn root_toml_beats_nested_json() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("config")).expect("mkdir");
    fs::write(
        dir.path().join("config").join("glide.json"),
        r#"{ "orientation": "vertical" }"#,
    )
    .expect("write json");
    let toml_path = dir.path().join("glide.toml");
    fs::write(&toml_path, "keyboard_enabled = false\n").expect("write toml");

    let loaded = ConfigLoader::in_dir(dir.path()).load().expect("load");
    assert_eq!(loaded.source, ConfigSource::File(toml_path));
    assert!(!loaded.config.keyboard_enabled);
    assert_eq!(loaded.config.orientation, Orientation::Horizontal);
}

#[test]
fn guard_rail_failure_is_reported() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("glide.toml"),
        "[touch.momentum]\nfriction = 0.0\n",
    )
    .expect("write");

    let err = ConfigLoader::in_dir(dir.path())
        .load()
        .expect_err("zero friction is rejected");
    assert!(matches!(err, ConfigLoadError::GuardRail(_)));
    assert!(err.to_string().contains("touch.momentum.friction"));
}

#[test]
fn soft_warnings_are_returned() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("glide.toml"),
        "[touch.edge]\nbehavior = \"wrap\"\n",
    )
    .expect("write");

    let loaded = ConfigLoader::in_dir(dir.path()).load().expect("load");
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.config.touch.edge.behavior, EdgeBehavior::Wrap);
}

#[test]
fn unreadable_file_reports_its_path() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("missing.toml");
    let err = loader::load_from_file(&missing).expect_err("missing file");
    assert!(format!("{err:#}").contains("missing.toml"));
}
