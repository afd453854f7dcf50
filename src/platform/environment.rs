//! Resolves the app credentials from the process environment.
//!
//! Lookup order, first hit wins:
//!
//! 1. the `config` object of `__FIREBASE_DEFAULTS__` (inline JSON) or of the
//!    JSON file named by `__FIREBASE_DEFAULTS_PATH`;
//! 2. `FIREBASE_CONFIG`, `FIREBASE_OPTIONS`, `FIREBASE_WEBAPP_CONFIG`, each
//!    holding inline JSON, a path to a JSON file (e.g. a mounted secret) or
//!    `key=value,key=value` pairs.

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::app::ConnectionConfig;

const DEFAULTS_ENV: &str = "__FIREBASE_DEFAULTS__";
const DEFAULTS_PATH_ENV: &str = "__FIREBASE_DEFAULTS_PATH";
const CONFIG_VARIABLES: [&str; 3] = ["FIREBASE_CONFIG", "FIREBASE_OPTIONS", "FIREBASE_WEBAPP_CONFIG"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvironmentError {
    /// None of the recognised variables is set.
    NotConfigured,
    /// A variable is set but its value cannot be turned into a config.
    Malformed { variable: String, message: String },
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentError::NotConfigured => write!(
                f,
                "No Firebase configuration found; set {} or one of {}",
                DEFAULTS_ENV,
                CONFIG_VARIABLES.join(", ")
            ),
            EnvironmentError::Malformed { variable, message } => {
                write!(f, "{variable} does not hold a usable Firebase configuration: {message}")
            }
        }
    }
}

impl std::error::Error for EnvironmentError {}

/// Reads the connection config from the real process environment.
pub fn connection_config_from_env() -> Result<ConnectionConfig, EnvironmentError> {
    resolve_connection_config(|key| env::var(key).ok())
}

/// Same as [`connection_config_from_env`] with an injectable variable lookup.
pub fn resolve_connection_config<F>(lookup: F) -> Result<ConnectionConfig, EnvironmentError>
where
    F: Fn(&str) -> Option<String>,
{
    let (variable, config) = match defaults_config(&lookup)? {
        Some(found) => found,
        None => config_from_variables(&lookup)?.ok_or(EnvironmentError::NotConfigured)?,
    };

    ConnectionConfig::from_json(Value::Object(config)).map_err(|err| EnvironmentError::Malformed {
        variable: variable.to_string(),
        message: err.to_string(),
    })
}

type Found = (&'static str, Map<String, Value>);

fn defaults_config<F>(lookup: &F) -> Result<Option<Found>, EnvironmentError>
where
    F: Fn(&str) -> Option<String>,
{
    let (variable, defaults) = if let Some(raw) = non_blank(lookup(DEFAULTS_ENV)) {
        (DEFAULTS_ENV, parse_json_object(&raw))
    } else if let Some(path) = non_blank(lookup(DEFAULTS_PATH_ENV)) {
        let content = fs::read_to_string(path.trim()).map_err(|err| malformed(DEFAULTS_PATH_ENV, err))?;
        (DEFAULTS_PATH_ENV, parse_json_object(&content))
    } else {
        return Ok(None);
    };

    let defaults = defaults.ok_or_else(|| malformed(variable, "expected a JSON object"))?;
    Ok(defaults
        .get("config")
        .and_then(Value::as_object)
        .map(|config| (variable, config.clone())))
}

fn config_from_variables<F>(lookup: &F) -> Result<Option<Found>, EnvironmentError>
where
    F: Fn(&str) -> Option<String>,
{
    for variable in CONFIG_VARIABLES {
        if let Some(raw) = non_blank(lookup(variable)) {
            return parse_config_source(&raw)
                .map(|config| Some((variable, config)))
                .ok_or_else(|| malformed(variable, "expected JSON, a JSON file path or key=value pairs"));
        }
    }
    Ok(None)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn malformed(variable: &str, message: impl ToString) -> EnvironmentError {
    EnvironmentError::Malformed {
        variable: variable.to_string(),
        message: message.to_string(),
    }
}

fn parse_json_object(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn parse_config_source(raw: &str) -> Option<Map<String, Value>> {
    if let Some(json) = parse_json_object(raw) {
        return Some(json);
    }

    if let Some(path) = treat_as_path(raw) {
        if let Ok(contents) = fs::read_to_string(path) {
            return parse_json_object(&contents);
        }
    }

    parse_key_value_config(raw)
}

fn treat_as_path(raw: &str) -> Option<&str> {
    if raw.contains('=') {
        return None;
    }
    let trimmed = raw.trim();
    Path::new(trimmed).exists().then_some(trimmed)
}

fn parse_key_value_config(raw: &str) -> Option<Map<String, Value>> {
    let mut map = Map::new();
    for entry in raw.split(',') {
        let Some((key, value)) = entry.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    (!map.is_empty()).then_some(map)
}
