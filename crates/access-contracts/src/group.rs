//! Groups, role mappings, and apps.
//!
//! The API returns groups as one polymorphic record discriminated by a `type`
//! field. Here that record is a tagged enum so every call site that needs the
//! variant has to match on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tag::{GroupTagMap, Tag};

/// An application registered in Access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields every group variant carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_managed: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Direct and app-inherited tags, both currently active.
    #[serde(default)]
    pub active_group_tags: Vec<GroupTagMap>,
}

/// A plain group with no special semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OktaGroup {
    #[serde(flatten)]
    pub base: GroupBase,
}

/// A group scoped to a single app.
///
/// Exactly one app group per app has `is_owner` set; its members own the app
/// and, with it, every other group of that app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppGroup {
    #[serde(flatten)]
    pub base: GroupBase,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub app: Option<App>,
    #[serde(default)]
    pub is_owner: bool,
}

impl AppGroup {
    /// The owning app's id, from `app_id` or else the embedded `app`.
    pub fn app_id(&self) -> Option<&str> {
        self.app_id
            .as_deref()
            .or_else(|| self.app.as_ref().map(|app| app.id.as_str()))
    }

    /// The owning app's name, when the `app` relation was loaded.
    pub fn app_name(&self) -> Option<&str> {
        self.app.as_ref().map(|app| app.name.as_str())
    }
}

/// A group whose members receive access to other groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleGroup {
    #[serde(flatten)]
    pub base: GroupBase,
    /// Groups the role's members own.
    #[serde(default)]
    pub active_role_associated_group_owner_mappings: Vec<RoleGroupMap>,
    /// Groups the role's members belong to.
    #[serde(default)]
    pub active_role_associated_group_member_mappings: Vec<RoleGroupMap>,
}

impl RoleGroup {
    /// Groups this role grants ownership of, skipping mappings without a loaded group.
    pub fn owned_groups(&self) -> impl Iterator<Item = &PolymorphicGroup> {
        self.active_role_associated_group_owner_mappings
            .iter()
            .filter_map(|mapping| mapping.active_group.as_deref())
    }

    /// Groups this role grants membership of, skipping mappings without a loaded group.
    pub fn member_groups(&self) -> impl Iterator<Item = &PolymorphicGroup> {
        self.active_role_associated_group_member_mappings
            .iter()
            .filter_map(|mapping| mapping.active_group.as_deref())
    }
}

/// A link between a role group and a group it grants access to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleGroupMap {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub role_group_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_role_group: Option<Box<PolymorphicGroup>>,
    #[serde(default)]
    pub active_group: Option<Box<PolymorphicGroup>>,
}

/// A group of any variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolymorphicGroup {
    OktaGroup(OktaGroup),
    RoleGroup(RoleGroup),
    AppGroup(AppGroup),
}

impl PolymorphicGroup {
    pub fn base(&self) -> &GroupBase {
        match self {
            Self::OktaGroup(group) => &group.base,
            Self::RoleGroup(group) => &group.base,
            Self::AppGroup(group) => &group.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    /// The wire discriminant of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::OktaGroup(_) => "okta_group",
            Self::RoleGroup(_) => "role_group",
            Self::AppGroup(_) => "app_group",
        }
    }

    pub fn as_app_group(&self) -> Option<&AppGroup> {
        match self {
            Self::AppGroup(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_role_group(&self) -> Option<&RoleGroup> {
        match self {
            Self::RoleGroup(group) => Some(group),
            _ => None,
        }
    }

    /// The tags in effect on this group.
    ///
    /// Rows whose `active_tag` relation was not loaded are skipped. Disabled
    /// tags are still yielded; the resolver is responsible for ignoring them.
    pub fn active_tags(&self) -> impl Iterator<Item = &Tag> + Clone {
        self.base()
            .active_group_tags
            .iter()
            .filter_map(|row| row.active_tag.as_ref())
    }
}
