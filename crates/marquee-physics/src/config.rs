use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

/// Container width used when the host reports zero or garbage.
pub const FALLBACK_CONTAINER_WIDTH_PX: f32 = 800.0;

/// Container height used when the host reports zero or garbage.
pub const FALLBACK_CONTAINER_HEIGHT_PX: f32 = 400.0;

/// Smallest collider edge in pixels.
pub const MIN_BODY_EDGE_PX: f32 = 4.0;

/// Tuning for the gravity text effect. Omitted RON fields keep defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEffectConfig {
    /// Downward acceleration in m/s².
    pub gravity: f32,
    /// Scale between CSS pixels and world meters.
    pub pixels_per_meter: f32,
    /// Fixed simulation step in seconds.
    pub timestep: f32,
    /// Upper bound on fixed steps run for a single animation frame.
    pub max_steps_per_frame: u32,
    /// Initial tilt bound in degrees; angles are drawn from ±this.
    pub max_tilt_deg: f32,
    /// Horizontal jitter bound in pixels (clamped to half a slot).
    pub jitter_px: f32,
    /// Extra random drop height above the container top, in pixels.
    pub spawn_height_px: f32,
    pub friction_range: (f32, f32),
    pub restitution_range: (f32, f32),
    pub density_range: (f32, f32),
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Linear speed (px/s) under which a body counts as calm.
    pub settle_linear_epsilon: f32,
    /// Angular speed (rad/s) under which a body counts as calm.
    pub settle_angular_epsilon: f32,
    /// Consecutive calm steps before a body is pinned.
    pub settle_steps: u32,
    /// Steps after which every remaining body is pinned.
    pub timeout_steps: u32,
    /// Thickness of floor and walls in pixels.
    pub wall_thickness_px: f32,
    /// Horizontal/vertical gap of the static fallback layout.
    pub static_gap_px: f32,
}

impl Default for TextEffectConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            pixels_per_meter: 100.0,
            timestep: 1.0 / 60.0,
            max_steps_per_frame: 4,
            max_tilt_deg: 15.0,
            jitter_px: 24.0,
            spawn_height_px: 120.0,
            friction_range: (0.3, 0.8),
            restitution_range: (0.1, 0.4),
            density_range: (0.8, 1.5),
            linear_damping: 0.05,
            angular_damping: 0.3,
            settle_linear_epsilon: 2.0,
            settle_angular_epsilon: 0.02,
            settle_steps: 20,
            timeout_steps: 900,
            wall_thickness_px: 60.0,
            static_gap_px: 12.0,
        }
    }
}

impl TextEffectConfig {
    pub fn from_ron_str(ron_str: &str) -> Result<Self, PhysicsError> {
        let options = ron::Options::default();
        let config: TextEffectConfig = options
            .from_str(ron_str)
            .map_err(|e| PhysicsError::ConfigParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        let positive = [
            ("pixels_per_meter", self.pixels_per_meter),
            ("timestep", self.timestep),
            ("wall_thickness_px", self.wall_thickness_px),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let ranges = [
            ("friction_range", self.friction_range),
            ("restitution_range", self.restitution_range),
            ("density_range", self.density_range),
        ];
        for (name, (lo, hi)) in ranges {
            if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{name} must satisfy 0 <= lo <= hi, got ({lo}, {hi})"
                )));
            }
        }
        if !(0.0..=90.0).contains(&self.max_tilt_deg) {
            return Err(PhysicsError::InvalidConfig(format!(
                "max_tilt_deg must be within [0, 90], got {}",
                self.max_tilt_deg
            )));
        }
        if self.jitter_px < 0.0 || self.spawn_height_px < 0.0 {
            return Err(PhysicsError::InvalidConfig(
                "jitter_px and spawn_height_px must be non-negative".into(),
            ));
        }
        if self.max_steps_per_frame == 0 || self.timeout_steps == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_steps_per_frame and timeout_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Tilt bound in radians.
    pub fn max_tilt_rad(&self) -> f32 {
        self.max_tilt_deg.to_radians()
    }
}
