//! Users and their group access records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::group::{PolymorphicGroup, RoleGroupMap};

/// A user as returned by the API, with their currently active access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OktaUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_group_memberships: Vec<OktaUserGroupMember>,
    #[serde(default)]
    pub active_group_ownerships: Vec<OktaUserGroupMember>,
}

impl OktaUser {
    /// Display name, falling back to "first last", then to the email.
    pub fn display_label(&self) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }

    /// Groups the user currently belongs to, skipping records without a loaded group.
    pub fn member_groups(&self) -> impl Iterator<Item = &PolymorphicGroup> {
        self.active_group_memberships
            .iter()
            .filter_map(|record| record.active_group.as_ref())
    }

    /// Groups the user currently owns, skipping records without a loaded group.
    pub fn owned_groups(&self) -> impl Iterator<Item = &PolymorphicGroup> {
        self.active_group_ownerships
            .iter()
            .filter_map(|record| record.active_group.as_ref())
    }

    /// This user with only the records still active at `now`.
    ///
    /// Snapshot rows can outlive their `ended_at`; rules evaluated at a point
    /// in time should run against this view.
    pub fn active_at(&self, now: DateTime<Utc>) -> OktaUser {
        let keep = |records: &[OktaUserGroupMember]| {
            records
                .iter()
                .filter(|record| record.is_active_at(now))
                .cloned()
                .collect::<Vec<_>>()
        };
        OktaUser {
            active_group_memberships: keep(&self.active_group_memberships),
            active_group_ownerships: keep(&self.active_group_ownerships),
            ..self.clone()
        }
    }
}

/// One membership or ownership of a user in a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OktaUserGroupMember {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_reason: Option<String>,
    #[serde(default)]
    pub should_expire: bool,
    #[serde(default)]
    pub active_group: Option<PolymorphicGroup>,
    /// Set when the access was granted through a role.
    #[serde(default)]
    pub active_role_group_mapping: Option<RoleGroupMap>,
}

impl OktaUserGroupMember {
    /// True when the record has no end or ends after `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.ended_at.map_or(true, |ended_at| ended_at > now)
    }

    /// True when the record is active but ends no later than `now + window`.
    pub fn ends_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match self.ended_at {
            Some(ended_at) => {
                ended_at > now
                    && now
                        .checked_add_signed(window)
                        .map_or(true, |horizon| ended_at <= horizon)
            }
            None => false,
        }
    }

    /// True when the access was granted directly rather than through a role.
    pub fn is_direct(&self) -> bool {
        self.active_role_group_mapping.is_none()
    }
}
