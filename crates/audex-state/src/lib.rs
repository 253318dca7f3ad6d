//! # audex-state — Lifecycle State Machines
//!
//! Runtime-validated state machines for every entity in Audex that has a
//! lifecycle. Each machine is an enum with a `can_transition_to()` check
//! and a `try_transition()` constructor that rejects illegal moves with a
//! [`StateTransitionError`] naming the attempted transition.
//!
//! ## State Machines
//!
//! - **Organization** (`organization.rs`):
//!   `Pending → Active ⇄ Paused → … → Archived` with `Disabled` branches.
//!   `Archived` is terminal.
//!
//! - **Engagement** (`engagement.rs`): status
//!   `Pending → Scheduled → Active → Extended → Closed` (`Closed` reachable
//!   from every state, and terminal), plus the ordered **stage** sequence
//!   `Onboarding → Fieldwork → DeliverableCreation → DeliverableReview →
//!   WrapUp` which may only move forward or stay.
//!
//! - **Control profile** (`control.rs`): evidence-collection workflow
//!   `Open → Responded → UnderReview → ActionRequired → Complete` with
//!   shortcut completion from any state. `Complete` is terminal.
//!
//! - **Role assignment** (`assignment.rs`) and **message** (`message.rs`):
//!   small machines in the same style.
//!
//! ## Design
//!
//! States are persisted as lowercase snake_case strings, so the enums are
//! the single source of truth for both the wire values and the legal
//! transition graphs. Transition validation always runs against the
//! *persisted* prior value (the store re-reads the record before accepting
//! a new state); a brand-new record may start in any state.

pub mod assignment;
pub mod control;
pub mod engagement;
pub mod message;
pub mod organization;

pub use assignment::AssignmentStatus;
pub use control::ControlStatus;
pub use engagement::{EngagementStage, EngagementStatus};
pub use message::MessageLifecycle;
pub use organization::OrgStatus;

pub use audex_core::StateTransitionError;
