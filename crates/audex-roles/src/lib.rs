//! # audex-roles — Role & Permission Model
//!
//! Decides what a principal may do, resolved per context: system-wide,
//! organization, or engagement.
//!
//! ## Design
//!
//! - The [`RoleCatalog`] is an injected configuration value built once at
//!   startup and passed to the resolver by reference. Validators never
//!   read role definitions from disk.
//! - Permission sets are unions over every effective role source; there
//!   are no deny rules.
//! - `can_manage_roles` on an engagement role is closed-world: it may
//!   only name roles in the catalog's engagement-role enumeration.
//!   Catalog validation rejects dangling references at construction.

pub mod catalog;
pub mod resolver;

pub use catalog::{
    AccessLevel, EngagementRoleDefinition, Permission, RoleCatalog, RoleCategory, RoleDefinition,
};
pub use resolver::PermissionResolver;
