//! Falling-word text effect backed by a rapier2d world.
//!
//! Coordinates are CSS pixels with y pointing down, matching the DOM. The
//! rapier world runs in meters (see `TextEffectConfig::pixels_per_meter`).

pub mod body;
pub mod config;
pub mod driver;
pub mod effect;
pub mod error;
pub mod fragment;
pub mod layout;
pub mod spawn;
pub mod world;
