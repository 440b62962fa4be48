//! # access-config
//!
//! Front-end configuration for the Access rule core: the selectable access
//! times, the default access time, the group-name pattern, and the name of the
//! reserved app whose owner group makes its members Access admins.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use access_config::AccessConfig;
//!
//! let config = AccessConfig::from_file(Path::new("config/config.override.json"))?;
//! let options = config.allowed_access_times(Some(86_400));
//! ```

pub mod access_time;
pub mod config;
pub mod naming;

pub use access_time::{parse_until, AccessTime, AccessTimeOption};
pub use config::AccessConfig;
pub use naming::{validate_group_name, GroupNameKind, NameValidator};

// ── Tests ─────────────────────────────────────────────────────────────────────
