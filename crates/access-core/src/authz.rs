//! Authorization predicates.
//!
//! A user may manage a group when any of these holds:
//!
//! 1. they are an Access admin, i.e. a *member* of the owner group of the
//!    reserved Access app;
//! 2. they directly own the group;
//! 3. the group is an app group and they *own* that app's owner group.
//!
//! Admin status is derived from membership while the other two rules look at
//! ownership. Both halves are load-bearing; do not make them symmetric.
//!
//! Every predicate is total. Records whose `active_group` relation was not
//! loaded never match.

use access_contracts::{OktaUser, PolymorphicGroup};

/// True when `user` directly owns the group with id `group_id`.
pub fn is_group_owner(user: &OktaUser, group_id: &str) -> bool {
    user.owned_groups().any(|group| group.id() == group_id)
}

/// True when `user` owns the owner group of the app with id `app_id`.
pub fn is_app_owner_group_owner(user: &OktaUser, app_id: &str) -> bool {
    user.owned_groups()
        .filter_map(PolymorphicGroup::as_app_group)
        .any(|group| group.is_owner && group.app_id() == Some(app_id))
}

/// True when `user` is a member of the owner group of the app named
/// `reserved_app_name`.
pub fn is_access_admin(user: &OktaUser, reserved_app_name: &str) -> bool {
    user.member_groups()
        .filter_map(PolymorphicGroup::as_app_group)
        .any(|group| group.is_owner && group.app_name() == Some(reserved_app_name))
}

/// True when `user` may manage `group`.
///
/// Accepts either a group reference or an `Option`; no group means no.
pub fn can_manage_group<'g>(
    user: &OktaUser,
    group: impl Into<Option<&'g PolymorphicGroup>>,
    reserved_app_name: &str,
) -> bool {
    let Some(group) = group.into() else {
        return false;
    };

    if is_access_admin(user, reserved_app_name) || is_group_owner(user, group.id()) {
        return true;
    }

    match group {
        PolymorphicGroup::AppGroup(app_group) => app_group
            .app_id()
            .is_some_and(|app_id| is_app_owner_group_owner(user, app_id)),
        PolymorphicGroup::OktaGroup(_) | PolymorphicGroup::RoleGroup(_) => false,
    }
}
