//! Group naming rules.
//!
//! Every group name must match the configured validation pattern. Role groups
//! additionally carry the `Role-` prefix and app groups the
//! `App-<AppName>-` prefix, so the owning app is visible in the name.

use regex::Regex;

use access_contracts::{AccessError, AccessResult};

pub const ROLE_GROUP_NAME_PREFIX: &str = "Role-";
pub const APP_GROUP_NAME_PREFIX: &str = "App-";
pub const APP_NAME_GROUP_NAME_SEPARATOR: &str = "-";

/// The configured name pattern, compiled once.
#[derive(Debug, Clone)]
pub struct NameValidator {
    pattern: Regex,
    message: String,
}

impl NameValidator {
    /// Compile `pattern`. `message` is reported for names that do not match.
    pub fn new(pattern: &str, message: impl Into<String>) -> AccessResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| AccessError::ConfigError {
            reason: format!("invalid NAME_VALIDATION_PATTERN '{}': {}", pattern, e),
        })?;
        Ok(Self {
            pattern,
            message: message.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    /// Check `name` against the pattern.
    pub fn validate(&self, name: &str) -> AccessResult<()> {
        if self.is_valid(name) {
            Ok(())
        } else {
            Err(AccessError::InvalidName {
                name: name.to_string(),
                reason: self.message.clone(),
            })
        }
    }
}

/// The kind of group being named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupNameKind<'a> {
    Okta,
    Role,
    /// An app group of the app with this name.
    App(&'a str),
}

impl GroupNameKind<'_> {
    /// The prefix every name of this kind starts with.
    pub fn prefix(&self) -> String {
        match self {
            GroupNameKind::Okta => String::new(),
            GroupNameKind::Role => ROLE_GROUP_NAME_PREFIX.to_string(),
            GroupNameKind::App(app_name) => {
                format!("{APP_GROUP_NAME_PREFIX}{app_name}{APP_NAME_GROUP_NAME_SEPARATOR}")
            }
        }
    }

    /// Build a full group name from the part a user typed after the prefix.
    pub fn full_name(&self, suffix: &str) -> String {
        let prefix = self.prefix();
        if suffix.starts_with(&prefix) {
            suffix.to_string()
        } else {
            format!("{prefix}{suffix}")
        }
    }
}

/// Validate a complete group name for `kind`.
pub fn validate_group_name(
    validator: &NameValidator,
    kind: GroupNameKind<'_>,
    name: &str,
) -> AccessResult<()> {
    let prefix = kind.prefix();
    if !name.starts_with(&prefix) || name.len() == prefix.len() {
        return Err(AccessError::InvalidName {
            name: name.to_string(),
            reason: format!("name must start with '{}' followed by a group name", prefix),
        });
    }
    validator.validate(name)
}
