//! Target-independent decision logic for the adaptive rendering core.
//!
//! Nothing in this crate touches the browser. Host surfaces (intersection
//! reporting, frame scheduling) are reached through the traits in
//! [`lifecycle`] so that the web crate and tests can plug in their own.

pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod lifecycle;
pub mod media;
pub mod motion;
pub mod visibility;
