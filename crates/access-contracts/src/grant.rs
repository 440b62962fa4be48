//! Grant vocabulary shared by the resolver and the grant checker.
//!
//! A grant is either ownership or membership of a group. Every tag constraint
//! comes in an owner-flavoured and a member-flavoured key, and `GrantKind`
//! selects between them.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a group an access grant targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantKind {
    Ownership,
    Membership,
}

impl GrantKind {
    /// Map a `for_ownership` flag onto a kind.
    pub fn from_ownership(for_ownership: bool) -> Self {
        if for_ownership {
            Self::Ownership
        } else {
            Self::Membership
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ownership => f.write_str("ownership"),
            Self::Membership => f.write_str("membership"),
        }
    }
}

/// The concrete end of an access grant chosen by the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Until {
    /// Access never expires.
    Indefinite,
    /// Access expires this many seconds after it is granted.
    Duration(u64),
    /// Access expires at a fixed instant.
    At(DateTime<Utc>),
}

impl Until {
    /// The instant access ends when granted at `now`, or `None` for indefinite access.
    pub fn ends_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match *self {
            Until::Indefinite => None,
            Until::Duration(seconds) => Some(add_seconds(now, seconds)),
            Until::At(at) => Some(at),
        }
    }
}

/// `now + seconds`, saturating at the latest representable instant.
pub fn add_seconds(now: DateTime<Utc>, seconds: u64) -> DateTime<Utc> {
    let seconds = i64::try_from(seconds).unwrap_or(i64::MAX).min(i64::MAX / 1_000);
    now.checked_add_signed(Duration::seconds(seconds))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A proposed grant of access, as submitted from an add-access form.
#[derive(Debug, Clone)]
pub struct GrantRequest<'a> {
    /// The principal performing the grant.
    pub actor: &'a crate::user::OktaUser,
    /// The user receiving access.
    pub target_user_id: &'a str,
    /// The group access is granted on.
    pub group: &'a crate::group::PolymorphicGroup,
    /// Ownership or membership.
    pub kind: GrantKind,
    /// When the granted access ends.
    pub until: Until,
    /// Free-text justification, if one was given.
    pub reason: Option<&'a str>,
}

/// The decision for a single `GrantRequest`.
///
/// A denial is an ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantVerdict {
    /// The grant may proceed. `ends_at` is `None` for indefinite access.
    Allow { ends_at: Option<DateTime<Utc>> },

    /// The grant is refused.
    Deny {
        /// Human-readable explanation shown next to the form.
        reason: String,
    },
}

impl GrantVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}
