//! Single source of truth for shared thresholds and margins.
//! `AdaptiveConfig::default()` is built from these values.

/// Devices reporting this much memory (GB) or less are treated as low-end.
pub const LOW_END_MEMORY_GB: f64 = 4.0;

/// Devices reporting this many logical cores or fewer are treated as low-end.
pub const LOW_END_CPU_CORES: u32 = 4;

/// Pre-trigger distance (px) for foreground media and decorative effects.
pub const FOREGROUND_MARGIN_PX: u32 = 50;

/// Pre-trigger distance (px) for background media. Must exceed the
/// foreground margin.
pub const BACKGROUND_MARGIN_PX: u32 = 100;

/// Media query string for the platform reduced-motion setting.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
