//! Layered configuration loading.
//!
//! The built-in defaults are embedded in the binary. A deployment may supply
//! an override document (JSON, or TOML when the file ends in `.toml`); each
//! key it sets replaces the default value for that key wholesale.
//!
//! The merged document is validated once and frozen into an `AccessConfig`,
//! which consumers share by reference or clone.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use access_contracts::{AccessError, AccessResult};

use crate::access_time::{AccessTime, AccessTimeOption};
use crate::naming::NameValidator;

const DEFAULT_CONFIG: &str = include_str!("../config/config.default.json");

/// A scalar that may be written as a string or a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(u64),
    Text(String),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

/// One configuration document, before layering. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigDocument {
    #[serde(rename = "ACCESS_TIME_LABELS", default)]
    access_time_labels: Option<BTreeMap<String, String>>,
    #[serde(rename = "DEFAULT_ACCESS_TIME", default)]
    default_access_time: Option<Scalar>,
    #[serde(rename = "NAME_VALIDATION_PATTERN", default)]
    name_validation_pattern: Option<String>,
    #[serde(rename = "NAME_VALIDATION_ERROR", default)]
    name_validation_error: Option<String>,
    #[serde(rename = "ACCESS_APP_RESERVED_NAME", default)]
    access_app_reserved_name: Option<String>,
}

impl ConfigDocument {
    /// Keys present in `over` win; the rest come from `self`.
    fn overlay(self, over: ConfigDocument) -> ConfigDocument {
        ConfigDocument {
            access_time_labels: over.access_time_labels.or(self.access_time_labels),
            default_access_time: over.default_access_time.or(self.default_access_time),
            name_validation_pattern: over
                .name_validation_pattern
                .or(self.name_validation_pattern),
            name_validation_error: over.name_validation_error.or(self.name_validation_error),
            access_app_reserved_name: over
                .access_app_reserved_name
                .or(self.access_app_reserved_name),
        }
    }
}

fn missing(key: &str) -> AccessError {
    AccessError::ConfigError {
        reason: format!("missing required key {}", key),
    }
}

/// Immutable front-end configuration.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    access_times: Vec<AccessTimeOption>,
    default_access_time: AccessTime,
    name_validator: NameValidator,
    access_app_reserved_name: String,
}

impl AccessConfig {
    /// The built-in defaults with no override.
    pub fn builtin() -> AccessResult<Self> {
        Self::from_document(Self::default_document()?)
    }

    /// Overlay a JSON document onto the built-in defaults.
    pub fn from_json_str(s: &str) -> AccessResult<Self> {
        let over: ConfigDocument =
            serde_json::from_str(s).map_err(|e| AccessError::ConfigError {
                reason: format!("failed to parse config JSON: {}", e),
            })?;
        Self::from_document(Self::default_document()?.overlay(over))
    }

    /// Overlay a TOML document onto the built-in defaults.
    pub fn from_toml_str(s: &str) -> AccessResult<Self> {
        let over: ConfigDocument = toml::from_str(s).map_err(|e| AccessError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;
        Self::from_document(Self::default_document()?.overlay(over))
    }

    /// Read an override file and overlay it onto the built-in defaults.
    ///
    /// Files ending in `.toml` are parsed as TOML, anything else as JSON.
    pub fn from_file(path: &Path) -> AccessResult<Self> {
        debug!(path = %path.display(), "loading access configuration override");
        let contents = std::fs::read_to_string(path).map_err(|e| AccessError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            _ => Self::from_json_str(&contents),
        }
    }

    fn default_document() -> AccessResult<ConfigDocument> {
        serde_json::from_str(DEFAULT_CONFIG).map_err(|e| AccessError::ConfigError {
            reason: format!("built-in config is malformed: {}", e),
        })
    }

    fn from_document(doc: ConfigDocument) -> AccessResult<Self> {
        let labels = doc
            .access_time_labels
            .ok_or_else(|| missing("ACCESS_TIME_LABELS"))?;
        let mut access_times = labels
            .into_iter()
            .map(|(key, label)| {
                let time = key.parse::<AccessTime>().map_err(|_| AccessError::ConfigError {
                    reason: format!("ACCESS_TIME_LABELS key '{}' is not a duration, 'indefinite' or 'custom'", key),
                })?;
                Ok(AccessTimeOption { time, label })
            })
            .collect::<AccessResult<Vec<_>>>()?;
        access_times.sort_by_key(|option| option.time);

        let default_key = doc
            .default_access_time
            .ok_or_else(|| missing("DEFAULT_ACCESS_TIME"))?
            .into_string();
        let default_access_time =
            default_key
                .parse::<AccessTime>()
                .map_err(|_| AccessError::ConfigError {
                    reason: format!("DEFAULT_ACCESS_TIME '{}' is not a valid access time", default_key),
                })?;
        if !access_times.iter().any(|option| option.time == default_access_time) {
            return Err(AccessError::ConfigError {
                reason: format!(
                    "DEFAULT_ACCESS_TIME '{}' is not one of the ACCESS_TIME_LABELS keys",
                    default_key
                ),
            });
        }

        let pattern = doc
            .name_validation_pattern
            .ok_or_else(|| missing("NAME_VALIDATION_PATTERN"))?;
        let message = doc
            .name_validation_error
            .ok_or_else(|| missing("NAME_VALIDATION_ERROR"))?;
        let name_validator = NameValidator::new(&pattern, message)?;

        let access_app_reserved_name = doc
            .access_app_reserved_name
            .ok_or_else(|| missing("ACCESS_APP_RESERVED_NAME"))?;

        debug!(
            access_times = access_times.len(),
            default_access_time = %default_access_time,
            reserved_app = %access_app_reserved_name,
            "access configuration loaded"
        );

        Ok(Self {
            access_times,
            default_access_time,
            name_validator,
            access_app_reserved_name,
        })
    }

    /// All configured access times in display order.
    pub fn access_times(&self) -> &[AccessTimeOption] {
        &self.access_times
    }

    /// The configured default, regardless of any limit.
    pub fn default_access_time(&self) -> AccessTime {
        self.default_access_time
    }

    pub fn name_validator(&self) -> &NameValidator {
        &self.name_validator
    }

    /// Name of the app whose owner group confers Access admin.
    pub fn access_app_reserved_name(&self) -> &str {
        &self.access_app_reserved_name
    }

    /// The label configured for `time`.
    pub fn label_for(&self, time: AccessTime) -> Option<&str> {
        self.access_times
            .iter()
            .find(|option| option.time == time)
            .map(|option| option.label.as_str())
    }

    /// The access times offered under a limit of `limit` seconds.
    pub fn allowed_access_times(&self, limit: Option<u64>) -> Vec<&AccessTimeOption> {
        self.access_times
            .iter()
            .filter(|option| option.time.permitted_by(limit))
            .collect()
    }

    /// The access time preselected under a limit of `limit` seconds.
    ///
    /// The configured default when it is allowed, otherwise the longest
    /// allowed duration, otherwise `Custom`.
    pub fn default_access_time_for(&self, limit: Option<u64>) -> AccessTime {
        if self.default_access_time.permitted_by(limit) {
            return self.default_access_time;
        }
        self.access_times
            .iter()
            .map(|option| option.time)
            .filter(|time| matches!(time, AccessTime::Duration(_)) && time.permitted_by(limit))
            .max()
            .unwrap_or(AccessTime::Custom)
    }
}
