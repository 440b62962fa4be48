//! Grant checking.
//!
//! `GrantChecker` decides whether a submitted add-access form may proceed.
//!
//! Only the actor's access records still active at evaluation time count.
//!
//! Evaluation order, first failure wins:
//!
//! 1. The actor must be able to manage the target group.
//! 2. If the group's tags forbid self-adds, a non-admin actor may not grant
//!    the access to themselves.
//! 3. If a reason is required, a non-blank reason must be present.
//! 4. If a time limit applies, indefinite access is refused and the chosen
//!    end must fall within the limit. An explicit end date in the past is
//!    always refused.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use access_config::{AccessConfig, AccessTime};
use access_contracts::{
    grant::add_seconds, AccessError, AccessResult, GrantRequest, GrantVerdict, Until,
};

use crate::authz::{can_manage_group, is_access_admin};
use crate::constraints::GrantConstraints;

/// Evaluates `GrantRequest`s against group tags and authorization rules.
#[derive(Debug, Clone)]
pub struct GrantChecker<'c> {
    config: &'c AccessConfig,
}

impl<'c> GrantChecker<'c> {
    pub fn new(config: &'c AccessConfig) -> Self {
        Self { config }
    }

    /// Evaluate `request` as if submitted at `now`.
    ///
    /// Policy refusals come back as `GrantVerdict::Deny`. `Err` is reserved
    /// for requests that are malformed in themselves.
    pub fn evaluate(&self, request: &GrantRequest<'_>, now: DateTime<Utc>) -> AccessResult<GrantVerdict> {
        if request.until == Until::Duration(0) {
            return Err(AccessError::InvalidAccessTime {
                value: "0".to_string(),
            });
        }

        let reserved = self.config.access_app_reserved_name();
        let group = request.group;
        let actor = request.actor.active_at(now);

        debug!(
            actor = %request.actor.id,
            target = %request.target_user_id,
            group = %group.name(),
            kind = %request.kind,
            "evaluating grant"
        );

        if !can_manage_group(&actor, group, reserved) {
            warn!(
                actor = %request.actor.id,
                group = %group.name(),
                "actor cannot manage group"
            );
            return Ok(deny(format!(
                "'{}' is not allowed to manage group '{}'",
                actor.display_label(),
                group.name()
            )));
        }

        let constraints = GrantConstraints::for_group(group, request.kind);

        if constraints.self_add_disallowed
            && request.actor.id == request.target_user_id
            && !is_access_admin(&actor, reserved)
        {
            warn!(actor = %request.actor.id, group = %group.name(), "self-add refused by tag");
            return Ok(deny(format!(
                "group '{}' does not allow owners to grant {} to themselves",
                group.name(),
                request.kind
            )));
        }

        if constraints.reason_required
            && request.reason.map_or(true, |reason| reason.trim().is_empty())
        {
            return Ok(deny(format!(
                "group '{}' requires a reason for {}",
                group.name(),
                request.kind
            )));
        }

        if let Until::At(at) = request.until {
            if at <= now {
                return Ok(deny(format!("end date {} is in the past", at.to_rfc3339())));
            }
        }

        if let Some(limit) = constraints.time_limit {
            let within = match request.until {
                Until::Indefinite => false,
                Until::Duration(seconds) => seconds <= limit,
                Until::At(at) => at <= add_seconds(now, limit),
            };
            if !within {
                let label = self
                    .config
                    .label_for(AccessTime::Duration(limit))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} seconds", limit));
                return Ok(deny(format!(
                    "group '{}' limits {} to at most {}",
                    group.name(),
                    request.kind,
                    label
                )));
            }
        }

        let ends_at = request.until.ends_at(now);
        debug!(group = %group.name(), ends_at = ?ends_at, "grant allowed");
        Ok(GrantVerdict::Allow { ends_at })
    }
}

fn deny(reason: String) -> GrantVerdict {
    GrantVerdict::Deny { reason }
}
