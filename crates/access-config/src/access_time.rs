//! Access-time choices offered when granting access.
//!
//! Each configured label key is one of: a number of seconds, `"indefinite"`,
//! or `"custom"` (the requester picks an explicit end date).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use access_contracts::{AccessError, AccessResult, Until};

/// One selectable access duration.
///
/// Ordering is durations ascending, then `Indefinite`, then `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccessTime {
    Duration(u64),
    Indefinite,
    Custom,
}

impl AccessTime {
    /// Whether this choice is offered under a time limit of `limit` seconds.
    ///
    /// Without a limit every choice is offered. With one, indefinite access
    /// disappears, durations must fit, and a custom date stays available
    /// (it is checked against the limit once picked).
    pub fn permitted_by(&self, limit: Option<u64>) -> bool {
        match (self, limit) {
            (_, None) => true,
            (AccessTime::Duration(seconds), Some(limit)) => *seconds <= limit,
            (AccessTime::Indefinite, Some(_)) => false,
            (AccessTime::Custom, Some(_)) => true,
        }
    }

    /// The concrete `Until` for a fixed choice; `None` for `Custom`.
    pub fn to_until(self) -> Option<Until> {
        match self {
            AccessTime::Duration(seconds) => Some(Until::Duration(seconds)),
            AccessTime::Indefinite => Some(Until::Indefinite),
            AccessTime::Custom => None,
        }
    }
}

impl FromStr for AccessTime {
    type Err = AccessError;

    fn from_str(s: &str) -> AccessResult<Self> {
        match s.trim() {
            "indefinite" => Ok(AccessTime::Indefinite),
            "custom" => Ok(AccessTime::Custom),
            other => match other.parse::<u64>() {
                Ok(seconds) if seconds > 0 => Ok(AccessTime::Duration(seconds)),
                _ => Err(AccessError::InvalidAccessTime {
                    value: s.to_string(),
                }),
            },
        }
    }
}

impl fmt::Display for AccessTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessTime::Duration(seconds) => write!(f, "{seconds}"),
            AccessTime::Indefinite => f.write_str("indefinite"),
            AccessTime::Custom => f.write_str("custom"),
        }
    }
}

/// A configured access time together with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTimeOption {
    pub time: AccessTime,
    pub label: String,
}

/// Parse a requester's choice: a label key, or an RFC 3339 end date.
///
/// `"custom"` on its own is rejected because it names no end.
pub fn parse_until(input: &str) -> AccessResult<Until> {
    if let Ok(at) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(Until::At(at.with_timezone(&Utc)));
    }
    input
        .parse::<AccessTime>()?
        .to_until()
        .ok_or_else(|| AccessError::InvalidAccessTime {
            value: input.to_string(),
        })
}
