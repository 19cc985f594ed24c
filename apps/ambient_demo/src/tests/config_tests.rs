use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_config(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("ambient_demo_config_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn missing_file_yields_defaults() {
    let settings = load_settings_from(Path::new("/nonexistent/ambient.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.probe_timeout_ms, 2000);
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        "asset_path = \"public/music/loop.ogg\"\nprobe_timeout_ms = \"750\"\nlog_filter = \"debug\"\n",
    );

    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.asset_path, "public/music/loop.ogg");
    assert_eq!(settings.probe_timeout_ms, 750);
    assert_eq!(settings.log_filter, "debug");

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let path = temp_config("asset_path = \"from-file.mp3\"\n");

    let settings = load_settings_from(&path, |key| match key {
        "AMBIENT_ASSET_PATH" => Some("from-legacy-env.mp3".to_string()),
        "APP__ASSET_PATH" => Some("from-app-env.mp3".to_string()),
        "APP__PROBE_TIMEOUT_MS" => Some("100".to_string()),
        _ => None,
    });
    assert_eq!(settings.asset_path, "from-app-env.mp3");
    assert_eq!(settings.probe_timeout_ms, 100);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn unparseable_timeout_keeps_previous_value() {
    let path = temp_config("probe_timeout_ms = \"soon\"\n");

    let settings = load_settings_from(&path, |key| {
        (key == "APP__PROBE_TIMEOUT_MS").then(|| "later".to_string())
    });
    assert_eq!(settings.probe_timeout_ms, Settings::default().probe_timeout_ms);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn malformed_file_is_ignored() {
    let path = temp_config("this is not toml = = =");

    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings, Settings::default());

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn controller_options_carry_path_and_timeout() {
    let settings = Settings {
        asset_path: "a/b.mp3".into(),
        probe_timeout_ms: 1500,
        log_filter: "info".into(),
    };

    let options = settings.controller_options();
    assert_eq!(options.asset_path, std::path::PathBuf::from("a/b.mp3"));
    assert_eq!(options.probe_timeout, Duration::from_millis(1500));
}
