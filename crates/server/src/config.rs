use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use server_api::{demo_clients, parse_client_catalog, ClientDirectory, DEFAULT_EMPTY_QUERY_LIMIT};
use tracing::{info, warn};

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub client_catalog_path: Option<String>,
    pub empty_query_limit: usize,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            client_catalog_path: None,
            empty_query_limit: DEFAULT_EMPTY_QUERY_LIMIT,
            max_body_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    client_catalog: Option<String>,
    empty_query_limit: Option<usize>,
    max_body_bytes: Option<usize>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        if let Err(error) = apply_file_overrides(&mut settings, &raw) {
            warn!(file = SETTINGS_FILE, %error, "ignoring unreadable settings file");
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub(crate) fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("failed to parse settings file")?;

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.client_catalog {
        settings.client_catalog_path = Some(v);
    }
    if let Some(v) = file_cfg.empty_query_limit {
        settings.empty_query_limit = v;
    }
    if let Some(v) = file_cfg.max_body_bytes {
        settings.max_body_bytes = v;
    }
    Ok(())
}

pub(crate) fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("APP__CLIENT_CATALOG") {
        settings.client_catalog_path = Some(v).filter(|path| !path.trim().is_empty());
    }

    if let Some(v) = lookup("APP__EMPTY_QUERY_LIMIT") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.empty_query_limit = parsed,
            Err(_) => warn!(value = %v, "APP__EMPTY_QUERY_LIMIT is not a number; keeping {}", settings.empty_query_limit),
        }
    }

    if let Some(v) = lookup("APP__MAX_BODY_BYTES") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.max_body_bytes = parsed,
            Err(_) => warn!(value = %v, "APP__MAX_BODY_BYTES is not a number; keeping {}", settings.max_body_bytes),
        }
    }
}

/// Builds the client directory, falling back to the demo catalog when no file is configured.
pub fn build_directory(settings: &Settings) -> anyhow::Result<ClientDirectory> {
    let directory = match settings.client_catalog_path.as_deref() {
        None => {
            let directory = ClientDirectory::new(demo_clients(), settings.empty_query_limit);
            info!(clients = directory.len(), "using demo client catalog");
            directory
        }
        Some(path) => {
            let raw = fs::read_to_string(Path::new(path))
                .with_context(|| format!("failed to read client catalog '{path}'"))?;
            let clients = parse_client_catalog(&raw)
                .with_context(|| format!("failed to load client catalog '{path}'"))?;
            let directory = ClientDirectory::new(clients, settings.empty_query_limit);
            info!(path, clients = directory.len(), "loaded client catalog");
            directory
        }
    };

    if directory.is_empty() {
        warn!("client catalog is empty; every lookup will report no matches");
    }
    Ok(directory)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
