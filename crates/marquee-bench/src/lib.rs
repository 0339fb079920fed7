//! Native settle-time benchmark for the gravity text world.

pub mod report;
pub mod runner;
pub mod scenes;
