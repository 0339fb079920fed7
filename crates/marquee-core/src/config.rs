use serde::{Deserialize, Serialize};

use crate::constants::{
    BACKGROUND_MARGIN_PX, FOREGROUND_MARGIN_PX, LOW_END_CPU_CORES, LOW_END_MEMORY_GB,
};
use crate::error::MarqueeError;
use crate::visibility::{MediaLayer, RootMargin};

/// Thresholds and margins shared by the probe, the observers and the media
/// controller. Loaded from RON; omitted fields take the constant defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Memory (GB) at or below which a device is low-end.
    pub low_end_memory_gb: f64,
    /// Logical core count at or below which a device is low-end.
    pub low_end_cpu_cores: u32,
    /// Root margin (px) for foreground media and effects.
    pub foreground_margin_px: u32,
    /// Root margin (px) for background media.
    pub background_margin_px: u32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            low_end_memory_gb: LOW_END_MEMORY_GB,
            low_end_cpu_cores: LOW_END_CPU_CORES,
            foreground_margin_px: FOREGROUND_MARGIN_PX,
            background_margin_px: BACKGROUND_MARGIN_PX,
        }
    }
}

impl AdaptiveConfig {
    /// Parse and validate a config from a RON string.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, MarqueeError> {
        let options = ron::Options::default();
        let config: AdaptiveConfig = options
            .from_str(ron_str)
            .map_err(|e| MarqueeError::ConfigParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Background media must pre-trigger further out than foreground media.
    pub fn validate(&self) -> Result<(), MarqueeError> {
        if self.background_margin_px <= self.foreground_margin_px {
            return Err(MarqueeError::InvalidConfig(format!(
                "background margin ({}px) must exceed foreground margin ({}px)",
                self.background_margin_px, self.foreground_margin_px
            )));
        }
        if !self.low_end_memory_gb.is_finite() || self.low_end_memory_gb < 0.0 {
            return Err(MarqueeError::InvalidConfig(format!(
                "low-end memory threshold must be a non-negative number, got {}",
                self.low_end_memory_gb
            )));
        }
        Ok(())
    }

    /// Root margin for a media layer.
    pub fn margin_for(&self, layer: MediaLayer) -> RootMargin {
        match layer {
            MediaLayer::Foreground => RootMargin(self.foreground_margin_px),
            MediaLayer::Background => RootMargin(self.background_margin_px),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_background_exceeds_foreground() {
        let config = AdaptiveConfig::default();
        let background = config.margin_for(MediaLayer::Background);
        assert!(background > config.margin_for(MediaLayer::Foreground));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = AdaptiveConfig::from_ron_str("(low_end_cpu_cores: 2)").expect("valid RON");
        assert_eq!(config.low_end_cpu_cores, 2);
        assert_eq!(config.low_end_memory_gb, LOW_END_MEMORY_GB);
        assert_eq!(config.background_margin_px, BACKGROUND_MARGIN_PX);
    }

    #[test]
    fn test_inverted_margins_rejected() {
        let result = AdaptiveConfig::from_ron_str(
            "(foreground_margin_px: 120, background_margin_px: 80)",
        );
        assert!(matches!(result, Err(MarqueeError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_ron_rejected() {
        let result = AdaptiveConfig::from_ron_str("(low_end_cpu_cores: \"many\")");
        assert!(matches!(result, Err(MarqueeError::ConfigParseError(_))));
    }
}
