//! # Route Modules
//!
//! Each module defines an Axum Router for one API surface area.
//! Routers are merged in [`crate::app`] into the application.

pub mod engagements;
pub mod frameworks;
pub mod health;
pub mod messages;
pub mod organizations;
pub mod users;
