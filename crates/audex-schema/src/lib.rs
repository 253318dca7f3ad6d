//! # audex-schema — Entity Definitions
//!
//! Plain-data entity types for the Audex platform, each paired with a
//! `validate()` method that checks every structural constraint and
//! returns the complete set of field errors in one pass.
//!
//! ## Design
//!
//! - Entities are plain structs; behavior lives in free-standing methods
//!   (`org.is_active()`, `user.full_name()`), not in storage hooks.
//! - Relations are by id only. A `User` holds an `OrgId`, never an
//!   `Organization`.
//! - Validation is pure: no entity validator queries storage. Checks that
//!   need the persisted prior value (status transitions, uniqueness) run
//!   in the store and the managers instead, where the two-phase read can
//!   be made explicit.

pub mod assignment;
pub mod control;
pub mod engagement;
pub mod message;
pub mod organization;
pub mod user;

pub use assignment::{AssignmentContext, RoleAssignment};
pub use control::{ControlNote, EngagementControlProfile, Evidence, NoteVisibility};
pub use engagement::{
    Engagement, EngagementType, FrameworkSelection, Participant, Timeline, MAX_FRAMEWORKS,
    MIN_FRAMEWORKS, SOC2_COMPONENTS,
};
pub use message::Message;
pub use organization::{Organization, MAX_ORG_DOMAINS};
pub use user::{
    EngagementParticipation, ProviderMetadata, RoleTier, SystemRole, User, UserStatus,
    MAX_SYSTEM_ROLES,
};
