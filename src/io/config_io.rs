use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Environment variable that overrides `api.url`
pub const API_URL_ENV: &str = "IDEABOX_API_URL";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("no config directory on this platform; pass --config")]
    NoConfigDir,
}

/// Default config location: `<config dir>/ideabox/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join("ideabox").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Default TUI log file: `<cache dir>/ideabox/ideabox.log`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("ideabox").join("ideabox.log"))
}

/// Read the config file. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Apply environment overrides. `lookup` is `std::env::var(..).ok()` outside
/// of tests.
pub fn apply_env(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
        config.api.url = url.trim().to_string();
    }
}

/// Load the effective config: file, then environment, then `--api-url`.
pub fn load_config(path: &Path, api_url: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = read_config(path)?;
    apply_env(&mut config, |key| std::env::var(key).ok());
    if let Some(url) = api_url {
        config.api.url = url.to_string();
    }
    Ok(config)
}

/// Read the raw document for round-trip-safe editing. A missing file is an
/// empty document.
pub fn read_document(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    if !path.exists() {
        return Ok(toml_edit::DocumentMut::new());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(text.parse()?)
}

/// Write the document back, creating the parent directory if needed.
pub fn write_document(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let write_err = |e: std::io::Error| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, doc.to_string()).map_err(write_err)
}

/// Set `api.url` in the config document
pub fn set_api_url(doc: &mut toml_edit::DocumentMut, url: &str) {
    if !doc.contains_key("api") {
        doc["api"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["api"]["url"] = toml_edit::value(url);
}
