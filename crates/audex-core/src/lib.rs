//! # audex-core — Foundational Types for Audex
//!
//! This crate is the bedrock of the Audex compliance-audit platform. It
//! defines the primitives every other crate in the workspace depends on;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `OrgId`, `UserId`,
//!    `EngagementId`, `ControlId`, `RoleId` — all newtypes with validated
//!    constructors. No bare strings for identifiers, and no way to pass an
//!    organization id where an engagement id is expected.
//!
//! 2. **Single error taxonomy.** `DomainError` carries every failure class
//!    the platform produces: validation, duplicate keys, missing records,
//!    illegal lifecycle transitions, storage faults, and fatal configuration
//!    problems. Managers add context by re-wrapping; nothing is swallowed.
//!
//! 3. **UTC-only timestamps.** `Timestamp` enforces UTC with seconds
//!    precision so persisted records and audit trails compare cleanly.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `audex-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a persistence boundary.

pub mod error;
pub mod identity;
pub mod temporal;
pub mod validate;

pub use error::{DomainError, FieldError, StateTransitionError, ValidationErrors};
pub use identity::{AssignmentId, ControlId, EngagementId, MessageId, OrgId, RoleId, UserId};
pub use temporal::Timestamp;
