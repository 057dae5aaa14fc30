use std::{collections::HashMap, fs, path::Path};

use host::HostSettings;
use shared::domain::PointerReleasePolicy;

pub const DEFAULT_CONFIG_PATH: &str = "tapper.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_filter: String,
    pub pointer_release: PointerReleasePolicy,
    pub command_capacity: usize,
    pub event_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let host = HostSettings::default();
        Self {
            log_filter: "info".into(),
            pointer_release: host.pointer_release,
            command_capacity: host.command_capacity,
            event_capacity: host.event_capacity,
        }
    }
}

impl Settings {
    pub fn host_settings(&self) -> HostSettings {
        HostSettings {
            pointer_release: self.pointer_release,
            command_capacity: self.command_capacity,
            event_capacity: self.event_capacity,
        }
    }
}

/// Defaults, then the flat TOML file at `path` (skipped when missing or
/// unparsable), then environment overrides. Rejected values are returned as
/// notes so they can be logged once tracing is up.
pub fn load_settings(path: &Path) -> (Settings, Vec<String>) {
    let mut settings = Settings::default();
    let mut ignored = Vec::new();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_overrides(&mut settings, &mut ignored, |key| file_cfg.get(key).cloned());
        }
    }

    apply_overrides(&mut settings, &mut ignored, env_value);
    (settings, ignored)
}

fn env_value(key: &str) -> Option<String> {
    let vars: &[&str] = match key {
        "log_filter" => &["TAPPER_LOG", "APP__LOG_FILTER"],
        "pointer_release" => &["APP__POINTER_RELEASE"],
        "command_capacity" => &["APP__COMMAND_CAPACITY"],
        "event_capacity" => &["APP__EVENT_CAPACITY"],
        _ => &[],
    };
    vars.iter().rev().find_map(|var| std::env::var(var).ok())
}

fn apply_overrides(
    settings: &mut Settings,
    ignored: &mut Vec<String>,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("log_filter") {
        settings.log_filter = v;
    }

    if let Some(v) = lookup("pointer_release") {
        match v.parse::<PointerReleasePolicy>() {
            Ok(policy) => settings.pointer_release = policy,
            Err(err) => ignored.push(format!("pointer_release: {err}")),
        }
    }

    if let Some(v) = lookup("command_capacity") {
        match parse_capacity(&v) {
            Some(parsed) => settings.command_capacity = parsed,
            None => ignored.push(format!("command_capacity: '{v}' is not a positive integer")),
        }
    }

    if let Some(v) = lookup("event_capacity") {
        match parse_capacity(&v) {
            Some(parsed) => settings.event_capacity = parsed,
            None => ignored.push(format!("event_capacity: '{v}' is not a positive integer")),
        }
    }
}

fn parse_capacity(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|value| *value > 0)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
