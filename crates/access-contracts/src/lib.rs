//! # access-contracts
//!
//! Entity types, grant vocabulary, and errors for the Access rule core.
//!
//! Entities mirror the JSON the Access API returns and are only ever read by
//! the rule crates. No business logic lives in this crate.

pub mod error;
pub mod grant;
pub mod group;
pub mod tag;
pub mod user;

pub use error::{AccessError, AccessResult};
pub use grant::{GrantKind, GrantRequest, GrantVerdict, Until};
pub use group::{App, AppGroup, GroupBase, OktaGroup, PolymorphicGroup, RoleGroup, RoleGroupMap};
pub use tag::{AppTagMap, GroupTagMap, Tag, TagConstraints};
pub use user::{OktaUser, OktaUserGroupMember};
