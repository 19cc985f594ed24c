use std::{collections::HashMap, fs, path::Path, time::Duration};

use ambient_core::{ControllerOptions, DEFAULT_ASSET_PATH, DEFAULT_PROBE_TIMEOUT};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "ambient.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub asset_path: String,
    pub probe_timeout_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_path: DEFAULT_ASSET_PATH.into(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            asset_path: self.asset_path.clone().into(),
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, env);

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };

    if let Some(v) = file_cfg.get("asset_path") {
        settings.asset_path = v.clone();
    }
    if let Some(v) = file_cfg.get("probe_timeout_ms") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.probe_timeout_ms = parsed;
        }
    }
    if let Some(v) = file_cfg.get("log_filter") {
        settings.log_filter = v.clone();
    }
}

fn apply_env(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("AMBIENT_ASSET_PATH") {
        settings.asset_path = v;
    }
    if let Some(v) = env("APP__ASSET_PATH") {
        settings.asset_path = v;
    }

    if let Some(v) = env("APP__PROBE_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.probe_timeout_ms = parsed;
        }
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
