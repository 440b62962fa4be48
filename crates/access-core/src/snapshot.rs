//! Entity snapshots.
//!
//! The rules only read data that was already fetched from the API. A snapshot
//! is that data saved as a single JSON document, so rules can be evaluated
//! offline against a known state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use access_contracts::{AccessError, AccessResult, OktaUser, PolymorphicGroup};

/// Users and groups captured from the API at one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<OktaUser>,
    #[serde(default)]
    pub groups: Vec<PolymorphicGroup>,
}

impl Snapshot {
    pub fn from_json_str(s: &str) -> AccessResult<Self> {
        serde_json::from_str(s).map_err(|e| AccessError::SnapshotError {
            reason: format!("failed to parse snapshot JSON: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> AccessResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AccessError::SnapshotError {
            reason: format!("failed to read snapshot '{}': {}", path.display(), e),
        })?;
        Self::from_json_str(&contents)
    }

    /// Find a user by id or email.
    pub fn user(&self, key: &str) -> AccessResult<&OktaUser> {
        self.users
            .iter()
            .find(|user| user.id == key || user.email.eq_ignore_ascii_case(key))
            .ok_or_else(|| AccessError::SnapshotError {
                reason: format!("no user '{}' in snapshot", key),
            })
    }

    /// Find a group by id or name.
    pub fn group(&self, key: &str) -> AccessResult<&PolymorphicGroup> {
        self.groups
            .iter()
            .find(|group| group.id() == key || group.name() == key)
            .ok_or_else(|| AccessError::SnapshotError {
                reason: format!("no group '{}' in snapshot", key),
            })
    }
}
