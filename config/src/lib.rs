//! Configuration for nl2sql.
//!
//! Two steps, both run once at startup:
//!
//! 1. [`load_and_apply`] merges the XDG `config.toml` `[env]` table and the project `.env` into
//!    the process environment with priority **existing env > .env > XDG**.
//! 2. [`Settings::from_env`] reads the environment once and validates every required field,
//!    failing fast with [`ConfigError`].

mod dotenv;
mod settings;
mod xdg_toml;

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub use settings::{
    ConfigError, DatabaseSettings, GeminiSettings, SchemaLimits, ServerSettings, Settings,
    SqlPolicy, DEFAULT_ADDR, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Sets every key found in `.env` or `<config dir>/<app_name>/config.toml` that is not already
/// present in the process environment. Returns the number of variables applied.
///
/// `override_dir` replaces the current directory as the place to look for `.env`.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<usize, LoadError> {
    let xdg = xdg_toml::load_env_map(app_name)?;
    let dotenv = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let keys: HashSet<&String> = xdg.keys().chain(dotenv.keys()).collect();
    let mut applied = 0;
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(value) = dotenv.get(key).or_else(|| xdg.get(key)) {
            std::env::set_var(key, value);
            applied += 1;
        }
    }
    tracing::debug!(app = app_name, applied, "configuration files applied to env");
    Ok(applied)
}
