//! Tag constraint resolution.
//!
//! Time limits reduce with MIN: the most restrictive tag caps the grant.
//! Reason and self-add requirements reduce with OR: any one tag can impose
//! them, and a laxer tag never lifts them. Disabled tags take part in neither
//! reduction.

use serde::{Deserialize, Serialize};

use access_contracts::{GrantKind, PolymorphicGroup, Tag};

fn enabled<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> impl Iterator<Item = &'a Tag> {
    tags.into_iter().filter(|tag| tag.enabled)
}

/// The shortest time limit, in seconds, any enabled tag sets for `kind`.
///
/// `None` means no limit.
pub fn min_tag_time<'a>(tags: impl IntoIterator<Item = &'a Tag>, kind: GrantKind) -> Option<u64> {
    enabled(tags)
        .filter_map(|tag| tag.constraints.time_limit(kind))
        .min()
}

/// True when any enabled tag requires a reason for `kind`.
pub fn required_reason<'a>(tags: impl IntoIterator<Item = &'a Tag>, kind: GrantKind) -> bool {
    enabled(tags).any(|tag| tag.constraints.require_reason(kind))
}

/// True when any enabled tag forbids owners from granting `kind` to themselves.
pub fn owner_cant_add_self<'a>(tags: impl IntoIterator<Item = &'a Tag>, kind: GrantKind) -> bool {
    enabled(tags).any(|tag| tag.constraints.disallow_self_add(kind))
}

/// `min_tag_time` over the tags of every group in `groups`.
pub fn min_tag_time_groups(groups: &[PolymorphicGroup], kind: GrantKind) -> Option<u64> {
    min_tag_time(groups.iter().flat_map(PolymorphicGroup::active_tags), kind)
}

/// `required_reason` over the tags of every group in `groups`.
pub fn required_reason_groups(groups: &[PolymorphicGroup], kind: GrantKind) -> bool {
    required_reason(groups.iter().flat_map(PolymorphicGroup::active_tags), kind)
}

/// `owner_cant_add_self` over the tags of every group in `groups`.
pub fn owner_cant_add_self_groups(groups: &[PolymorphicGroup], kind: GrantKind) -> bool {
    owner_cant_add_self(groups.iter().flat_map(PolymorphicGroup::active_tags), kind)
}

/// The resolved constraints binding one grant.
///
/// The default value is the permissive one: no limit, nothing required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantConstraints {
    /// Longest allowed grant in seconds, or `None` for no limit.
    pub time_limit: Option<u64>,
    pub reason_required: bool,
    pub self_add_disallowed: bool,
}

impl GrantConstraints {
    /// Resolve a set of tags for a grant of `kind`.
    pub fn from_tags<'a>(tags: impl IntoIterator<Item = &'a Tag> + Clone, kind: GrantKind) -> Self {
        Self {
            time_limit: min_tag_time(tags.clone(), kind),
            reason_required: required_reason(tags.clone(), kind),
            self_add_disallowed: owner_cant_add_self(tags, kind),
        }
    }

    /// The stricter combination of two resolutions.
    pub fn merge(self, other: GrantConstraints) -> Self {
        let time_limit = match (self.time_limit, other.time_limit) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            time_limit,
            reason_required: self.reason_required || other.reason_required,
            self_add_disallowed: self.self_add_disallowed || other.self_add_disallowed,
        }
    }

    /// Constraints for granting `kind` on `group`.
    ///
    /// Joining a role as a member also grants everything the role carries, so
    /// a role membership is bound by the role's own member tags, the owner
    /// tags of every group the role owns, and the member tags of every group
    /// the role belongs to. Owning a role grants nothing transitively.
    pub fn for_group(group: &PolymorphicGroup, kind: GrantKind) -> Self {
        let own = Self::from_tags(group.active_tags(), kind);

        match (group, kind) {
            (PolymorphicGroup::RoleGroup(role), GrantKind::Membership) => {
                let owned = role
                    .owned_groups()
                    .map(|group| Self::from_tags(group.active_tags(), GrantKind::Ownership));
                let joined = role
                    .member_groups()
                    .map(|group| Self::from_tags(group.active_tags(), GrantKind::Membership));
                owned.chain(joined).fold(own, Self::merge)
            }
            _ => own,
        }
    }

    /// Constraints for granting `kind` on all of `groups` at once.
    pub fn for_groups(groups: &[PolymorphicGroup], kind: GrantKind) -> Self {
        groups
            .iter()
            .map(|group| Self::for_group(group, kind))
            .fold(Self::default(), Self::merge)
    }
}
