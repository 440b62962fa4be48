//! Policy tags and their attachments.
//!
//! A tag carries a set of constraints that restrict how access to a group may
//! be granted. Tags reach a group either directly or through an app-level
//! mapping; both routes show up as rows of the group's `active_group_tags`.

use serde::{Deserialize, Serialize};

use crate::grant::GrantKind;

/// A named policy object.
///
/// Disabled tags are inert: none of their constraints apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to true when the row omits it.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub constraints: TagConstraints,
}

fn enabled_by_default() -> bool {
    true
}

/// The recognized constraint keys on a tag.
///
/// Every key is optional. Unrecognized keys in the source document are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConstraints {
    /// Longest ownership grant, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_time_limit: Option<u64>,
    /// Longest membership grant, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_time_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_owner_reason: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_member_reason: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disallow_self_add_ownership: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disallow_self_add_membership: Option<bool>,
}

impl TagConstraints {
    /// The time-limit key relevant to `kind`, if set.
    pub fn time_limit(&self, kind: GrantKind) -> Option<u64> {
        match kind {
            GrantKind::Ownership => self.owner_time_limit,
            GrantKind::Membership => self.member_time_limit,
        }
    }

    /// Whether the reason key relevant to `kind` is set to true.
    pub fn require_reason(&self, kind: GrantKind) -> bool {
        match kind {
            GrantKind::Ownership => self.require_owner_reason,
            GrantKind::Membership => self.require_member_reason,
        }
        .unwrap_or(false)
    }

    /// Whether the self-add key relevant to `kind` is set to true.
    pub fn disallow_self_add(&self, kind: GrantKind) -> bool {
        match kind {
            GrantKind::Ownership => self.disallow_self_add_ownership,
            GrantKind::Membership => self.disallow_self_add_membership,
        }
        .unwrap_or(false)
    }
}

/// A tag attached to an app. Groups of the app inherit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppTagMap {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub tag_id: Option<String>,
    #[serde(default)]
    pub active_tag: Option<Tag>,
}

/// One row of a group's effective tags.
///
/// `active_app_tag_mapping` is set when the row was inherited from the group's app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTagMap {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub active_tag: Option<Tag>,
    #[serde(default)]
    pub active_app_tag_mapping: Option<AppTagMap>,
}

impl GroupTagMap {
    /// True when the tag reached the group through its app.
    pub fn is_inherited(&self) -> bool {
        self.active_app_tag_mapping.is_some()
    }
}
