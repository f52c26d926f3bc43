//! Environment-driven configuration, read once at startup.

use std::env;

use crate::error::AppError;

pub mod db;
pub mod oauth;
pub mod session;

/// Required environment variable or a config error naming it.
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

/// Optional environment variable; empty values count as unset.
pub(crate) fn opt_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Boolean environment variable (`1/true/yes/on`, case-insensitive).
pub(crate) fn bool_var(name: &str, default: bool) -> Result<bool, AppError> {
    match opt_var(name) {
        None => Ok(default),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(AppError::config(format!(
                "Environment variable '{name}' must be a boolean, got '{other}'"
            ))),
        },
    }
}
