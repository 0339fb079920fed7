//! Playback decisions for adaptive media.
//!
//! One reducer consumes typed events and emits the commands the host must
//! run against the media element, so attribute updates and play/pause never
//! depend on the order in which independent listeners fire.

/// Attribute state of a media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaDirectives {
    pub autoplay: bool,
    pub loop_playback: bool,
    pub show_controls: bool,
}

impl MediaDirectives {
    /// Reduced motion and a low-end device each disable autoplay and loop
    /// and force user-facing controls.
    pub fn compute(is_low_end: bool, prefers_reduced_motion: bool, is_onscreen: bool) -> Self {
        let degraded = prefers_reduced_motion || is_low_end;
        Self {
            autoplay: !degraded && is_onscreen,
            loop_playback: !degraded,
            show_controls: degraded,
        }
    }
}

/// Inputs to the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    CapabilityResolved {
        is_low_end: bool,
    },
    MotionPreferenceChanged {
        reduced: bool,
    },
    VisibilityChanged {
        onscreen: bool,
    },
    /// No viewport observer could be registered; the element counts as
    /// onscreen from now on.
    ObserverUnavailable,
    /// The element started playing (echo of our own `Play` or a user click).
    PlaybackStarted,
    /// The element paused or ended.
    PlaybackStopped,
}

/// Side effects for the host to perform, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    Apply(MediaDirectives),
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Stopped,
    Playing(Origin),
    /// Paused by us because the element left the viewport.
    SuspendedOffscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Started by this controller.
    Auto,
    /// Started from the element's own controls.
    User,
}

/// Per-element playback reducer.
#[derive(Debug, Clone)]
pub struct MediaController {
    is_low_end: bool,
    prefers_reduced_motion: bool,
    is_onscreen: bool,
    playback: Playback,
    applied: Option<MediaDirectives>,
}

impl Default for MediaController {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaController {
    /// Until capability is resolved the device is assumed capable, and the
    /// element is assumed offscreen until the first intersection report.
    pub fn new() -> Self {
        Self {
            is_low_end: false,
            prefers_reduced_motion: false,
            is_onscreen: false,
            playback: Playback::Stopped,
            applied: None,
        }
    }

    pub fn directives(&self) -> MediaDirectives {
        MediaDirectives::compute(
            self.is_low_end,
            self.prefers_reduced_motion,
            self.is_onscreen,
        )
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.playback, Playback::Playing(_))
    }

    /// Emit the current attributes if they have never been applied.
    pub fn sync(&mut self) -> Vec<MediaCommand> {
        let mut commands = Vec::new();
        self.push_directives(&mut commands);
        commands
    }

    /// Fold one event into the state and return the resulting commands.
    pub fn apply(&mut self, event: MediaEvent) -> Vec<MediaCommand> {
        let before = self.directives();
        let mut commands = Vec::new();

        match event {
            MediaEvent::CapabilityResolved { is_low_end } => self.is_low_end = is_low_end,
            MediaEvent::MotionPreferenceChanged { reduced } => {
                self.prefers_reduced_motion = reduced
            }
            MediaEvent::VisibilityChanged { onscreen } => self.is_onscreen = onscreen,
            MediaEvent::ObserverUnavailable => {
                log::debug!("Media without viewport observer, treated as onscreen");
                self.is_onscreen = true;
            }
            MediaEvent::PlaybackStarted => {
                if !self.is_playing() {
                    self.playback = Playback::Playing(Origin::User);
                }
            }
            MediaEvent::PlaybackStopped => {
                if self.is_playing() {
                    self.playback = Playback::Stopped;
                }
            }
        }

        self.push_directives(&mut commands);
        let after = self.directives();

        if matches!(event, MediaEvent::VisibilityChanged { onscreen: false }) {
            if self.is_playing() {
                commands.push(MediaCommand::Pause);
                self.playback = Playback::SuspendedOffscreen;
            }
            return commands;
        }

        match (before.autoplay, after.autoplay) {
            (false, true) if !self.is_playing() => {
                commands.push(MediaCommand::Play);
                self.playback = Playback::Playing(Origin::Auto);
            }
            (true, false) => {
                // Autoplay withdrawn while visible: stop what we started, leave
                // user-started playback alone.
                if self.playback == Playback::Playing(Origin::Auto) {
                    commands.push(MediaCommand::Pause);
                    self.playback = Playback::Stopped;
                }
            }
            _ => {}
        }

        if self.is_onscreen && self.playback == Playback::SuspendedOffscreen {
            // Back in view but autoplay is not allowed: stay paused.
            self.playback = Playback::Stopped;
        }

        commands
    }

    fn push_directives(&mut self, commands: &mut Vec<MediaCommand>) {
        let current = self.directives();
        if self.applied != Some(current) {
            self.applied = Some(current);
            commands.push(MediaCommand::Apply(current));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_capable() -> MediaController {
        let mut controller = MediaController::new();
        controller.apply(MediaEvent::CapabilityResolved { is_low_end: false });
        controller.apply(MediaEvent::VisibilityChanged { onscreen: true });
        controller
    }

    #[test]
    fn test_capable_onscreen_autoplays() {
        let d = MediaDirectives::compute(false, false, true);
        assert!(d.autoplay);
        assert!(d.loop_playback);
        assert!(!d.show_controls);
    }

    #[test]
    fn test_reduced_motion_forces_controls() {
        for low_end in [false, true] {
            for onscreen in [false, true] {
                let d = MediaDirectives::compute(low_end, true, onscreen);
                assert!(!d.autoplay);
                assert!(!d.loop_playback);
                assert!(d.show_controls);
            }
        }
    }

    #[test]
    fn test_low_end_forces_controls() {
        let d = MediaDirectives::compute(true, false, true);
        assert!(!d.autoplay);
        assert!(!d.loop_playback);
        assert!(d.show_controls);
    }

    #[test]
    fn test_offscreen_capable_loops_without_autoplay() {
        let d = MediaDirectives::compute(false, false, false);
        assert!(!d.autoplay);
        assert!(d.loop_playback);
        assert!(!d.show_controls);
    }

    #[test]
    fn test_sync_applies_once() {
        let mut controller = MediaController::new();
        let initial = MediaDirectives::compute(false, false, false);
        assert_eq!(controller.sync(), vec![MediaCommand::Apply(initial)]);
        assert!(controller.sync().is_empty());
    }

    #[test]
    fn test_entering_view_plays() {
        let mut controller = MediaController::new();
        controller.sync();
        let commands = controller.apply(MediaEvent::VisibilityChanged { onscreen: true });
        assert_eq!(
            commands,
            vec![
                MediaCommand::Apply(MediaDirectives::compute(false, false, true)),
                MediaCommand::Play,
            ]
        );
        assert!(controller.is_playing());
    }

    #[test]
    fn test_leaving_view_pauses_and_returning_resumes() {
        let mut controller = visible_capable();
        assert!(controller.is_playing());

        let commands = controller.apply(MediaEvent::VisibilityChanged { onscreen: false });
        assert!(commands.contains(&MediaCommand::Pause));
        assert!(!controller.is_playing());

        // Echo of our own pause must not lose the suspended state.
        assert!(controller.apply(MediaEvent::PlaybackStopped).is_empty());

        let commands = controller.apply(MediaEvent::VisibilityChanged { onscreen: true });
        assert!(commands.contains(&MediaCommand::Play));
        assert!(controller.is_playing());
    }

    #[test]
    fn test_unobservable_element_counts_as_onscreen() {
        let mut controller = MediaController::new();
        controller.sync();
        let commands = controller.apply(MediaEvent::ObserverUnavailable);
        assert_eq!(
            commands,
            vec![
                MediaCommand::Apply(MediaDirectives::compute(false, false, true)),
                MediaCommand::Play,
            ]
        );
        assert!(controller.is_playing());
    }

    #[test]
    fn test_unobservable_element_on_low_end_shows_controls() {
        let mut controller = MediaController::new();
        controller.apply(MediaEvent::CapabilityResolved { is_low_end: true });
        let commands = controller.apply(MediaEvent::ObserverUnavailable);
        assert!(!commands.contains(&MediaCommand::Play));
        assert!(controller.directives().show_controls);
    }

    #[test]
    fn test_reduced_motion_never_plays() {
        let mut controller = MediaController::new();
        controller.apply(MediaEvent::MotionPreferenceChanged { reduced: true });
        let commands = controller.apply(MediaEvent::VisibilityChanged { onscreen: true });
        assert!(!commands.contains(&MediaCommand::Play));
        assert!(controller.directives().show_controls);
    }

    #[test]
    fn test_reduced_motion_mid_playback_pauses_autoplay() {
        let mut controller = visible_capable();
        let commands = controller.apply(MediaEvent::MotionPreferenceChanged { reduced: true });
        assert_eq!(
            commands,
            vec![
                MediaCommand::Apply(MediaDirectives::compute(false, true, true)),
                MediaCommand::Pause,
            ]
        );
    }

    #[test]
    fn test_user_playback_survives_reduced_motion_but_not_offscreen() {
        let mut controller = MediaController::new();
        controller.apply(MediaEvent::CapabilityResolved { is_low_end: true });
        controller.apply(MediaEvent::VisibilityChanged { onscreen: true });
        assert!(!controller.is_playing());

        // Visitor presses play on the controls.
        assert!(controller.apply(MediaEvent::PlaybackStarted).is_empty());
        assert!(controller.is_playing());

        let commands = controller.apply(MediaEvent::MotionPreferenceChanged { reduced: true });
        assert!(!commands.contains(&MediaCommand::Pause));

        let commands = controller.apply(MediaEvent::VisibilityChanged { onscreen: false });
        assert!(commands.contains(&MediaCommand::Pause));

        // Low-end: no resume when scrolled back.
        let commands = controller.apply(MediaEvent::VisibilityChanged { onscreen: true });
        assert!(!commands.contains(&MediaCommand::Play));
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_duplicate_events_emit_nothing() {
        let mut controller = visible_capable();
        assert!(controller
            .apply(MediaEvent::VisibilityChanged { onscreen: true })
            .is_empty());
        assert!(controller
            .apply(MediaEvent::CapabilityResolved { is_low_end: false })
            .is_empty());
    }
}
