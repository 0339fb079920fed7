use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::device::DeviceProfile;
use crate::error::MarqueeError;

/// Site-level animation setting chosen by the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationLevel {
    #[default]
    Full,
    /// Decorative motion off, essential transitions kept.
    Reduced,
    Off,
}

impl AnimationLevel {
    /// Whether this level alone asks for reduced motion.
    pub fn restricts_motion(self) -> bool {
        match self {
            AnimationLevel::Full => false,
            AnimationLevel::Reduced | AnimationLevel::Off => true,
        }
    }
}

impl FromStr for AnimationLevel {
    type Err = MarqueeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(AnimationLevel::Full),
            "reduced" => Ok(AnimationLevel::Reduced),
            "off" | "none" => Ok(AnimationLevel::Off),
            other => Err(MarqueeError::InvalidConfig(format!(
                "unknown animation level '{other}'"
            ))),
        }
    }
}

/// Live "prefers reduced motion" gate.
///
/// Combines the platform setting (updated from the media query change
/// notification) with the site animation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionGate {
    os_reduced: bool,
    level: AnimationLevel,
}

impl MotionGate {
    pub fn new(os_reduced: bool, level: AnimationLevel) -> Self {
        Self { os_reduced, level }
    }

    /// Effective reduced-motion preference.
    pub fn prefers_reduced_motion(&self) -> bool {
        self.os_reduced || self.level.restricts_motion()
    }

    /// Record a platform setting change. Returns the new effective value if it
    /// changed, `None` otherwise so duplicate notifications can be dropped.
    pub fn set_os_preference(&mut self, reduced: bool) -> Option<bool> {
        let before = self.prefers_reduced_motion();
        self.os_reduced = reduced;
        self.changed_from(before)
    }

    /// Record a site animation level change. Same return contract as
    /// [`MotionGate::set_os_preference`].
    pub fn set_animation_level(&mut self, level: AnimationLevel) -> Option<bool> {
        let before = self.prefers_reduced_motion();
        self.level = level;
        self.changed_from(before)
    }

    /// Whether animations, autoplay and the physics effect may run at all.
    /// Reduced motion and a low-end device each disable them.
    pub fn allows_motion(&self, profile: &DeviceProfile) -> bool {
        !self.prefers_reduced_motion() && !profile.is_low_end
    }

    fn changed_from(&self, before: bool) -> Option<bool> {
        let after = self.prefers_reduced_motion();
        (after != before).then_some(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_preference_drives_gate() {
        let mut gate = MotionGate::default();
        assert!(!gate.prefers_reduced_motion());
        assert_eq!(gate.set_os_preference(true), Some(true));
        assert!(gate.prefers_reduced_motion());
        assert_eq!(gate.set_os_preference(false), Some(false));
    }

    #[test]
    fn test_duplicate_notification_dropped() {
        let mut gate = MotionGate::new(true, AnimationLevel::Full);
        assert_eq!(gate.set_os_preference(true), None);
    }

    #[test]
    fn test_animation_level_masks_os_change() {
        let mut gate = MotionGate::new(false, AnimationLevel::Off);
        assert!(gate.prefers_reduced_motion());
        // Already reduced by the site level, so the OS toggle changes nothing.
        assert_eq!(gate.set_os_preference(true), None);
        assert_eq!(gate.set_animation_level(AnimationLevel::Full), None);
        assert_eq!(gate.set_os_preference(false), Some(false));
    }

    #[test]
    fn test_animation_level_parsing() {
        let parse = |s: &str| s.parse::<AnimationLevel>().ok();
        assert_eq!(parse("full"), Some(AnimationLevel::Full));
        assert_eq!(parse(" Reduced "), Some(AnimationLevel::Reduced));
        assert_eq!(parse("none"), Some(AnimationLevel::Off));
        assert_eq!(parse("sparkly"), None);
    }

    #[test]
    fn test_low_end_blocks_motion() {
        let gate = MotionGate::default();
        let capable = DeviceProfile::default();
        let low_end = DeviceProfile {
            is_low_end: true,
            ..DeviceProfile::default()
        };
        assert!(gate.allows_motion(&capable));
        assert!(!gate.allows_motion(&low_end));
        let os_reduced = MotionGate::new(true, AnimationLevel::Full);
        assert!(!os_reduced.allows_motion(&capable));
    }
}
