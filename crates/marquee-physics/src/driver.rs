use marquee_core::lifecycle::{FrameHandle, FrameScheduler};
use rand::Rng;

use crate::effect::{EffectPhase, TextEffect};
use crate::error::PhysicsError;
use crate::fragment::FragmentSize;
use crate::spawn::ContainerSize;

/// Frame gaps above this (ms) mean the tab was backgrounded; the frame is
/// skipped instead of fast-forwarding the simulation.
const MAX_FRAME_GAP_MS: f64 = 100.0;

/// Drives a [`TextEffect`] from per-frame callbacks.
///
/// Keeps at most one frame outstanding and cancels it on unmount or drop.
pub struct EffectDriver<S: FrameScheduler> {
    effect: TextEffect,
    scheduler: S,
    pending: Option<FrameHandle>,
    last_timestamp: Option<f64>,
    accumulator_ms: f64,
}

impl<S: FrameScheduler> EffectDriver<S> {
    pub fn new(effect: TextEffect, scheduler: S) -> Self {
        Self {
            effect,
            scheduler,
            pending: None,
            last_timestamp: None,
            accumulator_ms: 0.0,
        }
    }

    pub fn effect(&self) -> &TextEffect {
        &self.effect
    }

    pub fn phase(&self) -> EffectPhase {
        self.effect.phase()
    }

    /// Mount the effect and, if it is simulating, schedule the first frame.
    pub fn mount(
        &mut self,
        motion_allowed: bool,
        container: ContainerSize,
        sizes: &[FragmentSize],
        rng: &mut impl Rng,
    ) -> Result<EffectPhase, PhysicsError> {
        let phase = self.effect.mount(motion_allowed, container, sizes, rng)?;
        if phase == EffectPhase::Simulating {
            self.schedule();
        }
        Ok(phase)
    }

    /// Frame callback. Runs the fixed steps owed since the previous frame and
    /// schedules the next frame while the effect is still simulating.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> EffectPhase {
        self.pending = None;
        if self.effect.phase() != EffectPhase::Simulating {
            return self.effect.phase();
        }

        let step_ms = f64::from(self.effect.config().timestep) * 1000.0;
        let max_steps = self.effect.config().max_steps_per_frame;
        let steps = match self.last_timestamp {
            None => 1,
            Some(last) => {
                let delta = timestamp_ms - last;
                if delta > MAX_FRAME_GAP_MS || delta < 0.0 {
                    0
                } else {
                    self.accumulator_ms += delta;
                    let owed = (self.accumulator_ms / step_ms).floor() as u32;
                    if owed > max_steps {
                        self.accumulator_ms = 0.0;
                        max_steps
                    } else {
                        self.accumulator_ms -= f64::from(owed) * step_ms;
                        owed
                    }
                }
            }
        };
        self.last_timestamp = Some(timestamp_ms);

        let phase = self.effect.advance(steps);
        if phase == EffectPhase::Simulating {
            self.schedule();
        }
        phase
    }

    /// Reduced motion switched on: pin everything and stop the loop.
    pub fn freeze(&mut self) {
        self.cancel();
        self.effect.freeze();
    }

    /// Cancel the outstanding frame and dispose the effect.
    pub fn unmount(&mut self) {
        self.cancel();
        self.effect.unmount();
    }

    /// Frames requested but not yet delivered (0 or 1).
    pub fn pending_frames(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.pending = self.scheduler.request_frame();
            if self.pending.is_none() {
                log::warn!("Frame request refused; gravity text paused");
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

impl<S: FrameScheduler> Drop for EffectDriver<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
