//! # access-core
//!
//! The rule core of Access: who may manage a group, and what constraints bind
//! a grant of access to it.
//!
//! - [`authz`] answers "can this user manage this group?"
//! - [`constraints`] resolves a group's policy tags into a time limit, a
//!   reason requirement, and a self-add restriction.
//! - [`grant`] combines both to accept or refuse a submitted grant.
//!
//! Everything here is a pure function of an already-fetched entity snapshot.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use access_core::{authz, constraints::GrantConstraints};
//! use access_contracts::GrantKind;
//!
//! if authz::can_manage_group(&user, &group, config.access_app_reserved_name()) {
//!     let limits = GrantConstraints::for_group(&group, GrantKind::Membership);
//! }
//! ```

pub mod authz;
pub mod constraints;
pub mod grant;
pub mod snapshot;

pub use constraints::GrantConstraints;
pub use grant::GrantChecker;
pub use snapshot::Snapshot;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::{json, Value};

    use access_config::AccessConfig;
    use access_contracts::{
        AccessError, GrantKind, GrantRequest, GrantVerdict, OktaUser, OktaUserGroupMember,
        PolymorphicGroup, Tag, Until,
    };

    use crate::authz::{can_manage_group, is_access_admin, is_app_owner_group_owner, is_group_owner};
    use crate::constraints::{
        min_tag_time, min_tag_time_groups, owner_cant_add_self, owner_cant_add_self_groups,
        required_reason, required_reason_groups, GrantConstraints,
    };
    use crate::{GrantChecker, Snapshot};

    const OWNER: GrantKind = GrantKind::Ownership;
    const MEMBER: GrantKind = GrantKind::Membership;
    const RESERVED: &str = "Access";

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn tag(enabled: bool, constraints: Value) -> Tag {
        serde_json::from_value(json!({
            "id": "tag",
            "name": "Tag",
            "enabled": enabled,
            "constraints": constraints,
        }))
        .unwrap()
    }

    fn tag_rows(tags: &[Tag]) -> Value {
        Value::Array(tags.iter().map(|t| json!({ "active_tag": t })).collect())
    }

    fn okta_group(id: &str, tags: &[Tag]) -> PolymorphicGroup {
        serde_json::from_value(json!({
            "type": "okta_group",
            "id": id,
            "name": id,
            "active_group_tags": tag_rows(tags),
        }))
        .unwrap()
    }

    fn app_group(id: &str, app_id: &str, app_name: &str, is_owner: bool) -> PolymorphicGroup {
        serde_json::from_value(json!({
            "type": "app_group",
            "id": id,
            "name": id,
            "app_id": app_id,
            "is_owner": is_owner,
            "app": { "id": app_id, "name": app_name },
        }))
        .unwrap()
    }

    fn role_group(
        id: &str,
        tags: &[Tag],
        owns: &[PolymorphicGroup],
        joins: &[PolymorphicGroup],
    ) -> PolymorphicGroup {
        let mappings = |groups: &[PolymorphicGroup]| {
            Value::Array(groups.iter().map(|g| json!({ "active_group": g })).collect())
        };
        serde_json::from_value(json!({
            "type": "role_group",
            "id": id,
            "name": id,
            "active_group_tags": tag_rows(tags),
            "active_role_associated_group_owner_mappings": mappings(owns),
            "active_role_associated_group_member_mappings": mappings(joins),
        }))
        .unwrap()
    }

    fn record(group: Option<PolymorphicGroup>) -> OktaUserGroupMember {
        let mut record: OktaUserGroupMember = serde_json::from_value(json!({})).unwrap();
        record.active_group = group;
        record
    }

    fn user(id: &str, memberships: Vec<PolymorphicGroup>, ownerships: Vec<PolymorphicGroup>) -> OktaUser {
        let mut user: OktaUser = serde_json::from_value(json!({
            "id": id,
            "email": format!("{id}@example.com"),
        }))
        .unwrap();
        user.active_group_memberships = memberships.into_iter().map(|g| record(Some(g))).collect();
        user.active_group_ownerships = ownerships.into_iter().map(|g| record(Some(g))).collect();
        user
    }

    fn admin(id: &str) -> OktaUser {
        user(id, vec![app_group("access-owners", "app-access", RESERVED, true)], vec![])
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    // ── min_tag_time ──────────────────────────────────────────────────────────

    #[test]
    fn min_tag_time_of_nothing_is_no_limit() {
        assert_eq!(min_tag_time(&[] as &[Tag], OWNER), None);
        assert_eq!(min_tag_time(&[tag(true, json!({ "require_owner_reason": true }))], OWNER), None);
    }

    #[test]
    fn min_tag_time_takes_the_minimum() {
        let tags = [
            tag(true, json!({ "owner_time_limit": 86400 })),
            tag(true, json!({ "owner_time_limit": 3600 })),
        ];
        assert_eq!(min_tag_time(&tags, OWNER), Some(3600));
        // The member key is independent.
        assert_eq!(min_tag_time(&tags, MEMBER), None);
    }

    #[test]
    fn min_tag_time_ignores_disabled_tags() {
        let tags = [
            tag(false, json!({ "member_time_limit": 60 })),
            tag(true, json!({ "member_time_limit": 7200 })),
        ];
        assert_eq!(min_tag_time(&tags, MEMBER), Some(7200));
    }

    #[test]
    fn tags_missing_the_key_do_not_block_the_minimum_or_the_or() {
        let tags = [
            tag(true, json!({ "require_member_reason": true })),
            tag(true, json!({ "member_time_limit": 1800 })),
        ];
        assert_eq!(min_tag_time(&tags, MEMBER), Some(1800));
        assert!(required_reason(&tags, MEMBER));
    }

    // ── required_reason / owner_cant_add_self ────────────────────────────────

    #[test]
    fn required_reason_is_an_or() {
        let tags = [
            tag(true, json!({ "require_owner_reason": false })),
            tag(true, json!({ "require_owner_reason": true })),
        ];
        assert!(required_reason(&tags, OWNER));
        assert!(!required_reason(&tags, MEMBER));
        assert!(!required_reason(&[] as &[Tag], OWNER));
    }

    #[test]
    fn owner_cant_add_self_is_an_or() {
        let tags = [
            tag(true, json!({})),
            tag(true, json!({ "disallow_self_add_membership": true })),
        ];
        assert!(owner_cant_add_self(&tags, MEMBER));
        assert!(!owner_cant_add_self(&tags, OWNER));
    }

    #[test]
    fn disabled_tags_yield_permissive_defaults() {
        let tags = [tag(
            false,
            json!({
                "owner_time_limit": 1,
                "member_time_limit": 1,
                "require_owner_reason": true,
                "require_member_reason": true,
                "disallow_self_add_ownership": true,
                "disallow_self_add_membership": true,
            }),
        )];
        for kind in [OWNER, MEMBER] {
            assert_eq!(min_tag_time(&tags, kind), None);
            assert!(!required_reason(&tags, kind));
            assert!(!owner_cant_add_self(&tags, kind));
            assert_eq!(GrantConstraints::from_tags(&tags, kind), GrantConstraints::default());
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let tags = [
            tag(true, json!({ "owner_time_limit": 600, "require_owner_reason": true })),
            tag(true, json!({ "disallow_self_add_ownership": true })),
        ];
        let first = GrantConstraints::from_tags(&tags, OWNER);
        let second = GrantConstraints::from_tags(&tags, OWNER);
        assert_eq!(first, second);
        assert_eq!(
            first,
            GrantConstraints {
                time_limit: Some(600),
                reason_required: true,
                self_add_disallowed: true,
            }
        );
    }

    // ── Group-level resolution ────────────────────────────────────────────────

    #[test]
    fn group_reductions_span_every_group() {
        let groups = [
            okta_group("a", &[tag(true, json!({ "member_time_limit": 9000 }))]),
            okta_group("b", &[tag(true, json!({ "member_time_limit": 4000, "require_member_reason": true }))]),
            okta_group("c", &[tag(true, json!({ "disallow_self_add_membership": true }))]),
        ];
        assert_eq!(min_tag_time_groups(&groups, MEMBER), Some(4000));
        assert!(required_reason_groups(&groups, MEMBER));
        assert!(owner_cant_add_self_groups(&groups, MEMBER));
        assert!(!required_reason_groups(&groups, OWNER));

        assert_eq!(
            GrantConstraints::for_groups(&groups, MEMBER),
            GrantConstraints {
                time_limit: Some(4000),
                reason_required: true,
                self_add_disallowed: true,
            }
        );
        assert_eq!(GrantConstraints::for_groups(&[], MEMBER), GrantConstraints::default());
    }

    #[test]
    fn app_inherited_tags_bind_like_direct_ones() {
        let direct = tag(true, json!({ "member_time_limit": 1800 }));
        let inherited = tag(true, json!({ "member_time_limit": 600, "require_member_reason": true }));
        let group: PolymorphicGroup = serde_json::from_value(json!({
            "type": "app_group",
            "id": "g1",
            "name": "App-Payments-Readers",
            "app_id": "app-payments",
            "active_group_tags": [
                { "active_tag": direct },
                {
                    "active_tag": inherited,
                    "active_app_tag_mapping": { "app_id": "app-payments", "tag_id": "tag" }
                }
            ]
        }))
        .unwrap();

        assert!(group.base().active_group_tags[1].is_inherited());
        assert_eq!(
            GrantConstraints::for_group(&group, MEMBER),
            GrantConstraints {
                time_limit: Some(600),
                reason_required: true,
                self_add_disallowed: false,
            }
        );
    }

    #[test]
    fn merge_treats_no_limit_as_identity() {
        let limited = GrantConstraints {
            time_limit: Some(100),
            ..Default::default()
        };
        assert_eq!(limited.merge(GrantConstraints::default()).time_limit, Some(100));
        assert_eq!(GrantConstraints::default().merge(limited).time_limit, Some(100));
    }

    #[test]
    fn role_membership_inherits_associated_group_constraints() {
        let owned = okta_group(
            "owned",
            &[tag(true, json!({ "require_owner_reason": true, "owner_time_limit": 3600 }))],
        );
        let joined = okta_group(
            "joined",
            &[tag(true, json!({ "disallow_self_add_membership": true, "member_time_limit": 7200 }))],
        );
        let role = role_group("Role-Oncall", &[], &[owned], &[joined]);

        assert_eq!(
            GrantConstraints::for_group(&role, MEMBER),
            GrantConstraints {
                time_limit: Some(3600),
                reason_required: true,
                self_add_disallowed: true,
            }
        );
    }

    #[test]
    fn role_membership_uses_owner_keys_for_owned_groups() {
        // The owned group only restricts membership, which joining the role never grants on it.
        let owned = okta_group("owned", &[tag(true, json!({ "require_member_reason": true }))]);
        let role = role_group("Role-Oncall", &[], &[owned], &[]);
        assert!(!GrantConstraints::for_group(&role, MEMBER).reason_required);
    }

    #[test]
    fn role_ownership_ignores_associated_groups() {
        let joined = okta_group("joined", &[tag(true, json!({ "require_owner_reason": true, "require_member_reason": true }))]);
        let role = role_group(
            "Role-Oncall",
            &[tag(true, json!({ "owner_time_limit": 500 }))],
            &[],
            &[joined],
        );

        assert_eq!(
            GrantConstraints::for_group(&role, OWNER),
            GrantConstraints {
                time_limit: Some(500),
                reason_required: false,
                self_add_disallowed: false,
            }
        );
    }

    #[test]
    fn disabled_tags_on_associated_groups_stay_inert() {
        let joined = okta_group("joined", &[tag(false, json!({ "require_member_reason": true }))]);
        let role = role_group("Role-Oncall", &[], &[], &[joined]);
        assert_eq!(GrantConstraints::for_group(&role, MEMBER), GrantConstraints::default());
    }

    // ── Authorization predicates ──────────────────────────────────────────────

    #[test]
    fn is_group_owner_matches_direct_ownership() {
        let owner = user("u1", vec![], vec![okta_group("g1", &[])]);
        assert!(is_group_owner(&owner, "g1"));
        assert!(!is_group_owner(&owner, "g2"));

        // Membership is not ownership.
        let member = user("u2", vec![okta_group("g1", &[])], vec![]);
        assert!(!is_group_owner(&member, "g1"));

        assert!(!is_group_owner(&user("u3", vec![], vec![]), "g1"));
    }

    #[test]
    fn records_without_loaded_group_never_match() {
        let mut dangling = user("u1", vec![], vec![]);
        dangling.active_group_ownerships.push(record(None));
        dangling.active_group_memberships.push(record(None));

        assert!(!is_group_owner(&dangling, "g1"));
        assert!(!is_app_owner_group_owner(&dangling, "app-1"));
        assert!(!is_access_admin(&dangling, RESERVED));
        assert!(!can_manage_group(&dangling, &okta_group("g1", &[]), RESERVED));
    }

    #[test]
    fn is_app_owner_group_owner_requires_the_owner_group() {
        let app_owner = user("u1", vec![], vec![app_group("pay-owners", "app-pay", "Payments", true)]);
        assert!(is_app_owner_group_owner(&app_owner, "app-pay"));
        assert!(!is_app_owner_group_owner(&app_owner, "app-wiki"));

        let plain = user("u2", vec![], vec![app_group("pay-readers", "app-pay", "Payments", false)]);
        assert!(!is_app_owner_group_owner(&plain, "app-pay"));
    }

    #[test]
    fn is_access_admin_is_derived_from_membership() {
        assert!(is_access_admin(&admin("u1"), RESERVED));

        // Owning the reserved app's owner group does not make an admin.
        let owner_only = user("u2", vec![], vec![app_group("access-owners", "app-access", RESERVED, true)]);
        assert!(!is_access_admin(&owner_only, RESERVED));

        // Membership in another app's owner group does not either.
        let other = user("u3", vec![app_group("pay-owners", "app-pay", "Payments", true)], vec![]);
        assert!(!is_access_admin(&other, RESERVED));

        // A non-owner group of the reserved app is not enough.
        let reader = user("u4", vec![app_group("access-readers", "app-access", RESERVED, false)], vec![]);
        assert!(!is_access_admin(&reader, RESERVED));
    }

    #[test]
    fn reserved_app_name_is_configurable() {
        let gatekeeper = user("u1", vec![app_group("gk-owners", "app-gk", "Gatekeeper", true)], vec![]);
        assert!(is_access_admin(&gatekeeper, "Gatekeeper"));
        assert!(!is_access_admin(&gatekeeper, RESERVED));
    }

    #[test]
    fn admins_can_manage_any_group() {
        let admin = admin("u1");
        assert!(can_manage_group(&admin, &okta_group("g1", &[]), RESERVED));
        assert!(can_manage_group(&admin, &role_group("r1", &[], &[], &[]), RESERVED));
        assert!(can_manage_group(&admin, &app_group("x", "app-x", "X", false), RESERVED));
    }

    #[test]
    fn app_owners_can_manage_their_app_groups_only() {
        let app_owner = user("u1", vec![], vec![app_group("pay-owners", "app-pay", "Payments", true)]);

        assert!(can_manage_group(&app_owner, &app_group("pay-readers", "app-pay", "Payments", false), RESERVED));
        assert!(!can_manage_group(&app_owner, &app_group("wiki-readers", "app-wiki", "Wiki", false), RESERVED));
        assert!(!can_manage_group(&app_owner, &okta_group("g1", &[]), RESERVED));
    }

    #[test]
    fn direct_owners_can_manage_their_group() {
        let owner = user("u1", vec![], vec![okta_group("g1", &[])]);
        assert!(can_manage_group(&owner, &okta_group("g1", &[]), RESERVED));
        assert!(!can_manage_group(&owner, &okta_group("g2", &[]), RESERVED));
    }

    #[test]
    fn no_group_means_no_management() {
        assert!(!can_manage_group(&admin("u1"), None::<&PolymorphicGroup>, RESERVED));
    }

    // ── GrantChecker ──────────────────────────────────────────────────────────

    fn request<'a>(
        actor: &'a OktaUser,
        target: &'a str,
        group: &'a PolymorphicGroup,
        kind: GrantKind,
        until: Until,
        reason: Option<&'a str>,
    ) -> GrantRequest<'a> {
        GrantRequest {
            actor,
            target_user_id: target,
            group,
            kind,
            until,
            reason,
        }
    }

    fn expect_deny(verdict: GrantVerdict, needle: &str) {
        match verdict {
            GrantVerdict::Deny { reason } => {
                assert!(reason.contains(needle), "expected '{needle}' in reason, got: {reason}");
            }
            other => panic!("expected Deny, got {:?}", other),
        }
    }

    #[test]
    fn grant_allowed_for_owner_without_tags() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[]);
        let owner = user("u1", vec![], vec![group.clone()]);

        let verdict = checker
            .evaluate(&request(&owner, "u2", &group, MEMBER, Until::Duration(3600), None), now())
            .unwrap();
        assert_eq!(verdict, GrantVerdict::Allow { ends_at: Some(now() + Duration::hours(1)) });

        let verdict = checker
            .evaluate(&request(&owner, "u2", &group, MEMBER, Until::Indefinite, None), now())
            .unwrap();
        assert_eq!(verdict, GrantVerdict::Allow { ends_at: None });
    }

    #[test]
    fn grant_denied_when_actor_cannot_manage() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[]);
        let stranger = user("u1", vec![group.clone()], vec![]);

        let verdict = checker
            .evaluate(&request(&stranger, "u2", &group, MEMBER, Until::Indefinite, None), now())
            .unwrap();
        expect_deny(verdict, "not allowed to manage");
    }

    #[test]
    fn self_add_refused_unless_admin() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[tag(true, json!({ "disallow_self_add_ownership": true }))]);
        let owner = user("u1", vec![], vec![group.clone()]);

        let verdict = checker
            .evaluate(&request(&owner, "u1", &group, OWNER, Until::Indefinite, None), now())
            .unwrap();
        expect_deny(verdict, "to themselves");

        // Granting someone else is fine.
        let verdict = checker
            .evaluate(&request(&owner, "u2", &group, OWNER, Until::Indefinite, None), now())
            .unwrap();
        assert!(verdict.is_allowed());

        // The restriction is per kind.
        let verdict = checker
            .evaluate(&request(&owner, "u1", &group, MEMBER, Until::Indefinite, None), now())
            .unwrap();
        assert!(verdict.is_allowed());

        let admin = admin("root");
        let verdict = checker
            .evaluate(&request(&admin, "root", &group, OWNER, Until::Indefinite, None), now())
            .unwrap();
        assert!(verdict.is_allowed());
    }

    #[test]
    fn ended_ownership_no_longer_authorizes_grants() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[]);
        let mut former_owner = user("u1", vec![], vec![group.clone()]);
        former_owner.active_group_ownerships[0].ended_at =
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        let verdict = checker
            .evaluate(&request(&former_owner, "u2", &group, MEMBER, Until::Duration(3600), None), now())
            .unwrap();
        expect_deny(verdict, "not allowed to manage");

        // Still active when the end lies ahead.
        former_owner.active_group_ownerships[0].ended_at = Some(now() + Duration::days(1));
        let verdict = checker
            .evaluate(&request(&former_owner, "u2", &group, MEMBER, Until::Duration(3600), None), now())
            .unwrap();
        assert!(verdict.is_allowed());
    }

    #[test]
    fn ended_admin_membership_loses_the_self_add_exemption() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[tag(true, json!({ "disallow_self_add_membership": true }))]);
        let mut lapsed = admin("root");
        lapsed.active_group_ownerships.push(record(Some(group.clone())));
        lapsed.active_group_memberships[0].ended_at =
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        let verdict = checker
            .evaluate(&request(&lapsed, "root", &group, MEMBER, Until::Indefinite, None), now())
            .unwrap();
        expect_deny(verdict, "to themselves");
    }

    #[test]
    fn self_add_is_caught_when_target_is_looked_up_by_email() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[tag(true, json!({ "disallow_self_add_membership": true }))]);
        let snapshot = Snapshot {
            users: vec![user("u1", vec![], vec![group.clone()])],
            groups: vec![group],
        };

        let actor = snapshot.user("u1@example.com").unwrap();
        let target = snapshot.user("U1@Example.com").unwrap();
        let group = snapshot.group("g1").unwrap();
        let verdict = checker
            .evaluate(&request(actor, &target.id, group, MEMBER, Until::Indefinite, None), now())
            .unwrap();
        expect_deny(verdict, "to themselves");
    }

    #[test]
    fn reason_must_be_present_and_non_blank() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[tag(true, json!({ "require_member_reason": true }))]);
        let admin = admin("root");

        for reason in [None, Some(""), Some("   ")] {
            let verdict = checker
                .evaluate(&request(&admin, "u2", &group, MEMBER, Until::Indefinite, reason), now())
                .unwrap();
            expect_deny(verdict, "requires a reason");
        }

        let verdict = checker
            .evaluate(
                &request(&admin, "u2", &group, MEMBER, Until::Indefinite, Some("on-call rotation")),
                now(),
            )
            .unwrap();
        assert!(verdict.is_allowed());
    }

    #[test]
    fn time_limit_bounds_the_chosen_end() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[tag(true, json!({ "member_time_limit": 432000 }))]);
        let admin = admin("root");
        let eval = |until| {
            checker
                .evaluate(&request(&admin, "u2", &group, MEMBER, until, None), now())
                .unwrap()
        };

        expect_deny(eval(Until::Indefinite), "5 Days");
        expect_deny(eval(Until::Duration(1_209_600)), "at most");
        assert!(eval(Until::Duration(432_000)).is_allowed());
        assert!(eval(Until::Duration(43_200)).is_allowed());

        assert!(eval(Until::At(now() + Duration::days(5))).is_allowed());
        expect_deny(eval(Until::At(now() + Duration::days(6))), "at most");
    }

    #[test]
    fn unlabelled_limit_is_reported_in_seconds() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[tag(true, json!({ "owner_time_limit": 90 }))]);
        let admin = admin("root");

        let verdict = checker
            .evaluate(&request(&admin, "u2", &group, OWNER, Until::Indefinite, None), now())
            .unwrap();
        expect_deny(verdict, "90 seconds");
    }

    #[test]
    fn past_end_dates_are_refused() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[]);
        let admin = admin("root");

        let verdict = checker
            .evaluate(
                &request(&admin, "u2", &group, MEMBER, Until::At(now() - Duration::hours(1)), None),
                now(),
            )
            .unwrap();
        expect_deny(verdict, "in the past");
    }

    #[test]
    fn zero_duration_is_a_malformed_request() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let group = okta_group("g1", &[]);
        let admin = admin("root");

        let result = checker.evaluate(&request(&admin, "u2", &group, MEMBER, Until::Duration(0), None), now());
        assert!(matches!(result, Err(AccessError::InvalidAccessTime { .. })));
    }

    #[test]
    fn role_membership_grant_honours_associated_groups() {
        let config = AccessConfig::builtin().unwrap();
        let checker = GrantChecker::new(&config);
        let owned = okta_group("owned", &[tag(true, json!({ "require_owner_reason": true }))]);
        let role = role_group("Role-Oncall", &[], &[owned], &[]);
        let role_owner = user("u1", vec![], vec![role.clone()]);

        let verdict = checker
            .evaluate(&request(&role_owner, "u2", &role, MEMBER, Until::Indefinite, None), now())
            .unwrap();
        expect_deny(verdict, "requires a reason");
    }

    // ── Snapshot ──────────────────────────────────────────────────────────────

    #[test]
    fn snapshot_lookup_by_id_name_and_email() {
        let snapshot = Snapshot::from_json_str(
            &json!({
                "users": [ { "id": "u1", "email": "Ada@Example.com" } ],
                "groups": [ { "type": "okta_group", "id": "g1", "name": "Engineering" } ]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(snapshot.user("u1").unwrap().id, "u1");
        assert_eq!(snapshot.user("ada@example.com").unwrap().id, "u1");
        assert_eq!(snapshot.group("Engineering").unwrap().id(), "g1");

        match snapshot.group("missing") {
            Err(AccessError::SnapshotError { reason }) => assert!(reason.contains("missing")),
            other => panic!("expected SnapshotError, got {:?}", other),
        }
    }

    #[test]
    fn malformed_snapshot_is_a_snapshot_error() {
        assert!(matches!(
            Snapshot::from_json_str(r#"{ "users": 5 }"#),
            Err(AccessError::SnapshotError { .. })
        ));
    }
}
