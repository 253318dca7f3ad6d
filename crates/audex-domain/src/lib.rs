//! # audex-domain — Domain Managers
//!
//! Multi-step workflows that span more than one entity write: onboarding
//! an organization with a unique id, bootstrapping users from OAuth
//! logins, scoring compliance frameworks, steering engagements through
//! their lifecycle, and engagement messaging.
//!
//! ## Design
//!
//! Every manager is an explicit component instance constructed once at
//! process start (see [`AuditCore`]) and passed by reference to request
//! handlers — there are no module-level singletons and no lazy global
//! initialization. Managers borrow the shared [`audex_store::DocumentStore`]
//! and only catch errors they can add context to; everything else
//! propagates unchanged.

pub mod auth;
pub mod config;
pub mod engagement;
pub mod facade;
pub mod framework;
pub mod messaging;
pub mod organization;

pub use auth::{OAuthProfile, UserManager};
pub use config::AudexConfig;
pub use engagement::EngagementManager;
pub use facade::AuditCore;
pub use framework::{
    AssessmentState, Framework, FrameworkControl, FrameworkManager, GapAnalysis,
};
pub use messaging::MessagingManager;
pub use organization::{CreateOrganization, OrganizationManager};
