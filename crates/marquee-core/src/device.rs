use std::cell::OnceCell;

use crate::config::AdaptiveConfig;

/// Raw hardware readings from the host. `None` means the host did not
/// expose the signal; it is never read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceSignals {
    /// Approximate device memory in GB.
    pub memory_gb: Option<f64>,
    /// Logical CPU core count.
    pub cpu_cores: Option<u32>,
    /// Network "reduce data usage" flag.
    pub save_data: Option<bool>,
}

/// Hardware classification for the session. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceProfile {
    pub memory_gb: Option<f64>,
    pub cpu_cores: Option<u32>,
    pub save_data: bool,
    pub is_low_end: bool,
}

impl DeviceProfile {
    /// Classify a device. Any known signal at or below its threshold marks the
    /// device low-end; unknown signals never do.
    pub fn classify(signals: &DeviceSignals, config: &AdaptiveConfig) -> Self {
        // NaN/infinite/negative readings come from broken hosts; treat as unknown.
        let memory_gb = signals
            .memory_gb
            .filter(|m| m.is_finite() && *m >= 0.0);
        let cpu_cores = signals.cpu_cores;
        let save_data = signals.save_data.unwrap_or(false);

        let low_memory = memory_gb.is_some_and(|m| m <= config.low_end_memory_gb);
        let few_cores = cpu_cores.is_some_and(|c| c <= config.low_end_cpu_cores);

        Self {
            memory_gb,
            cpu_cores,
            save_data,
            is_low_end: low_memory || few_cores || save_data,
        }
    }
}

/// Session-scoped holder that probes the host at most once.
///
/// Owned by whoever mounts the site; there is no process-wide instance.
#[derive(Debug, Default)]
pub struct SessionProfile {
    config: AdaptiveConfig,
    profile: OnceCell<DeviceProfile>,
}

impl SessionProfile {
    pub fn new(config: AdaptiveConfig) -> Self {
        Self {
            config,
            profile: OnceCell::new(),
        }
    }

    /// Return the cached profile, running `probe` only on the first call.
    pub fn get_or_probe(&self, probe: impl FnOnce() -> DeviceSignals) -> DeviceProfile {
        *self.profile.get_or_init(|| {
            let profile = DeviceProfile::classify(&probe(), &self.config);
            log::info!(
                "Device profile: memory={:?}GB cores={:?} save_data={} low_end={}",
                profile.memory_gb,
                profile.cpu_cores,
                profile.save_data,
                profile.is_low_end
            );
            profile
        })
    }

    /// The cached profile, if the probe has run.
    pub fn get(&self) -> Option<DeviceProfile> {
        self.profile.get().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn classify(
        memory_gb: Option<f64>,
        cpu_cores: Option<u32>,
        save_data: Option<bool>,
    ) -> DeviceProfile {
        DeviceProfile::classify(
            &DeviceSignals {
                memory_gb,
                cpu_cores,
                save_data,
            },
            &AdaptiveConfig::default(),
        )
    }

    #[test]
    fn test_low_memory_is_low_end() {
        for m in [0.25, 0.5, 1.0, 2.0, 3.5, 4.0] {
            assert!(classify(Some(m), None, None).is_low_end, "memory {m}");
            let profile = classify(Some(m), Some(8), Some(false));
            assert!(profile.is_low_end, "memory {m}");
        }
    }

    #[test]
    fn test_few_cores_is_low_end() {
        for c in 1..=4 {
            assert!(classify(None, Some(c), None).is_low_end, "cores {c}");
            let profile = classify(Some(8.0), Some(c), Some(false));
            assert!(profile.is_low_end, "cores {c}");
        }
    }

    #[test]
    fn test_save_data_is_low_end() {
        assert!(classify(None, None, Some(true)).is_low_end);
        assert!(classify(Some(16.0), Some(16), Some(true)).is_low_end);
    }

    #[test]
    fn test_capable_device() {
        let profile = classify(Some(6.0), Some(6), Some(false));
        assert!(!profile.is_low_end);
        assert_eq!(profile.memory_gb, Some(6.0));
        assert_eq!(profile.cpu_cores, Some(6));
    }

    #[test]
    fn test_missing_signals_are_not_low_end() {
        let profile = classify(None, None, None);
        assert_eq!(profile, DeviceProfile::default());
        assert!(!profile.is_low_end);
        assert!(profile.memory_gb.is_none());
        assert!(profile.cpu_cores.is_none());
    }

    #[test]
    fn test_unknown_signal_does_not_force_low_end() {
        assert!(!classify(None, Some(8), None).is_low_end);
        assert!(!classify(Some(8.0), None, None).is_low_end);
    }

    #[test]
    fn test_non_finite_memory_treated_as_unknown() {
        let profile = classify(Some(f64::NAN), Some(8), None);
        assert!(profile.memory_gb.is_none());
        assert!(!profile.is_low_end);
    }

    #[test]
    fn test_session_probes_once() {
        let session = SessionProfile::new(AdaptiveConfig::default());
        let calls = Cell::new(0);
        let probe = || {
            calls.set(calls.get() + 1);
            DeviceSignals {
                memory_gb: Some(2.0),
                cpu_cores: Some(8),
                save_data: None,
            }
        };
        assert!(session.get().is_none());
        let first = session.get_or_probe(probe);
        let second = session.get_or_probe(|| {
            calls.set(calls.get() + 1);
            DeviceSignals::default()
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert!(second.is_low_end);
    }
}
