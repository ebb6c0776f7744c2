use std::{path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_STEM: &str = "console";
const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080/api".into(),
            request_timeout_secs: 15,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn apply_overrides(&mut self, server_url: Option<String>) {
        if let Some(url) = server_url {
            self.server_url = url;
        }
    }
}

/// Defaults, then `console.toml` (or `config_path`), then `APP__*` variables.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with_env(config_path, app_environment())
}

fn app_environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

pub(crate) fn load_settings_with_env(
    config_path: Option<&Path>,
    environment: Environment,
) -> anyhow::Result<Settings> {
    let file = match config_path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_STEM).required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()
        .with_context(|| match config_path {
            Some(path) => format!("failed to read console settings from '{}'", path.display()),
            None => "failed to read console settings".to_string(),
        })?
        .try_deserialize::<Settings>()
        .context("invalid console settings")?;

    Ok(settings)
}

#[cfg(test)]
pub(crate) fn test_environment(vars: &[(&str, &str)]) -> Environment {
    let source = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    app_environment().source(Some(source))
}
