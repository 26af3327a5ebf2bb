//! Small helpers for reading typed environment variables.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Value of `key`, or `default` when unset.
pub(crate) fn string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parsed value of `key`; `None` when unset or blank, an error when set but unparsable.
pub(crate) fn parse_opt<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} has an invalid value: {}", key, value)),
        _ => Ok(None),
    }
}

pub(crate) fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_opt(key)?.unwrap_or(default))
}

/// `true`/`1`/`yes`/`on` (any case) are true; `false`/`0`/`no`/`off` are false.
pub(crate) fn bool_or(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => anyhow::bail!("{} must be a boolean, got: {}", key, value),
        },
        _ => Ok(default),
    }
}

/// Comma-separated list with surrounding whitespace and empty items removed.
pub(crate) fn list(key: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
