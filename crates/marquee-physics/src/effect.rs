use rand::Rng;

use crate::body::PhysicsBody;
use crate::config::TextEffectConfig;
use crate::error::PhysicsError;
use crate::fragment::{FragmentSize, TextFragment};
use crate::layout::{static_layout, StaticPlacement};
use crate::spawn::{plan_bodies, ContainerSize};
use crate::world::TextWorld;

/// Lifecycle of one gravity text instance.
///
/// `Uninitialized → Simulating → Settled | Disposed`, or
/// `Uninitialized → Static` when motion is not allowed. Nothing returns to
/// `Simulating`; a new instance is needed for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPhase {
    Uninitialized,
    Simulating,
    Settled,
    Static,
    Disposed,
}

enum EffectState {
    Uninitialized,
    Simulating(Box<TextWorld>),
    Settled(Vec<PhysicsBody>),
    Static(Vec<StaticPlacement>),
    Disposed,
}

pub struct TextEffect {
    fragments: Vec<TextFragment>,
    config: TextEffectConfig,
    state: EffectState,
    timed_out: bool,
}

impl TextEffect {
    pub fn new(fragments: Vec<TextFragment>, config: TextEffectConfig) -> Self {
        Self {
            fragments,
            config,
            state: EffectState::Uninitialized,
            timed_out: false,
        }
    }

    pub fn config(&self) -> &TextEffectConfig {
        &self.config
    }

    pub fn phase(&self) -> EffectPhase {
        match self.state {
            EffectState::Uninitialized => EffectPhase::Uninitialized,
            EffectState::Simulating(_) => EffectPhase::Simulating,
            EffectState::Settled(_) => EffectPhase::Settled,
            EffectState::Static(_) => EffectPhase::Static,
            EffectState::Disposed => EffectPhase::Disposed,
        }
    }

    /// Create the world (motion allowed) or the static layout (not allowed).
    /// Mounting anything but an uninitialized effect leaves it unchanged.
    pub fn mount(
        &mut self,
        motion_allowed: bool,
        container: ContainerSize,
        sizes: &[FragmentSize],
        rng: &mut impl Rng,
    ) -> Result<EffectPhase, PhysicsError> {
        if !matches!(self.state, EffectState::Uninitialized) {
            log::debug!("Text effect already mounted ({:?})", self.phase());
            return Ok(self.phase());
        }
        if sizes.len() != self.fragments.len() {
            return Err(PhysicsError::SizeMismatch {
                fragments: self.fragments.len(),
                sizes: sizes.len(),
            });
        }

        if motion_allowed {
            let seeds = plan_bodies(&self.fragments, sizes, container, &self.config, rng)?;
            let world = TextWorld::new(&seeds, container, &self.config);
            log::info!("Gravity text simulating {} fragments", world.body_count());
            self.state = EffectState::Simulating(Box::new(world));
        } else {
            let placements = static_layout(sizes, container, self.config.static_gap_px);
            log::info!(
                "Gravity text in static layout ({} fragments)",
                placements.len()
            );
            self.state = EffectState::Static(placements);
        }
        Ok(self.phase())
    }

    /// Run up to `steps` fixed steps. Moves to `Settled` once every body is
    /// pinned. Returns the phase after stepping.
    pub fn advance(&mut self, steps: u32) -> EffectPhase {
        if let EffectState::Simulating(world) = &mut self.state {
            let mut settled = world.all_settled();
            for _ in 0..steps {
                if settled {
                    break;
                }
                settled = world.step();
            }
            if settled {
                self.settle();
            }
        }
        self.phase()
    }

    /// Pin all bodies immediately, e.g. when reduced motion turns on mid-run.
    pub fn freeze(&mut self) {
        if let EffectState::Simulating(world) = &mut self.state {
            world.freeze();
            self.settle();
        }
    }

    /// Stop ticking and release all bodies.
    pub fn unmount(&mut self) {
        if !matches!(self.state, EffectState::Disposed) {
            log::debug!("Text effect disposed from {:?}", self.phase());
        }
        self.state = EffectState::Disposed;
    }

    /// Current body snapshots; empty unless simulating or settled.
    pub fn bodies(&self) -> Vec<PhysicsBody> {
        match &self.state {
            EffectState::Simulating(world) => world.snapshots(),
            EffectState::Settled(bodies) => bodies.clone(),
            _ => Vec::new(),
        }
    }

    /// Visit current body snapshots without cloning.
    pub fn for_each_body(&self, mut f: impl FnMut(usize, &PhysicsBody)) {
        match &self.state {
            EffectState::Simulating(world) => world.for_each_body(f),
            EffectState::Settled(bodies) => {
                for (i, body) in bodies.iter().enumerate() {
                    f(i, body);
                }
            }
            _ => {}
        }
    }

    pub fn body_count(&self) -> usize {
        match &self.state {
            EffectState::Simulating(world) => world.body_count(),
            EffectState::Settled(bodies) => bodies.len(),
            _ => 0,
        }
    }

    pub fn static_placements(&self) -> Option<&[StaticPlacement]> {
        match &self.state {
            EffectState::Static(placements) => Some(placements),
            _ => None,
        }
    }

    /// Whether the simulation ended by timeout rather than every body
    /// coming to rest. A freeze does not count.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    fn settle(&mut self) {
        if let EffectState::Simulating(world) = &self.state {
            let bodies = world.snapshots();
            self.timed_out = world.timed_out();
            if self.timed_out {
                log::info!("Gravity text timed out after {} steps", world.steps());
            } else {
                log::info!("Gravity text settled after {} steps", world.steps());
            }
            // Dropping the world releases the rapier sets.
            self.state = EffectState::Settled(bodies);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn effect(n: usize) -> (TextEffect, Vec<FragmentSize>) {
        let fragments: Vec<TextFragment> = (0..n)
            .map(|i| TextFragment::new(format!("frag{i}")))
            .collect();
        let sizes = fragments.iter().map(|f| f.estimated_size(16.0)).collect();
        let effect = TextEffect::new(fragments, TextEffectConfig::default());
        (effect, sizes)
    }

    fn container() -> ContainerSize {
        ContainerSize {
            width: 500.0,
            height: 260.0,
        }
    }

    #[test]
    fn test_reduced_motion_uses_static_layout() {
        let (mut effect, sizes) = effect(5);
        let mut rng = StdRng::seed_from_u64(0);
        let phase = effect
            .mount(false, container(), &sizes, &mut rng)
            .expect("mounted");
        assert_eq!(phase, EffectPhase::Static);
        assert_eq!(effect.body_count(), 0);
        assert!(effect.bodies().is_empty());
        assert_eq!(effect.static_placements().map(<[_]>::len), Some(5));
        // Advancing a static effect does nothing.
        assert_eq!(effect.advance(10), EffectPhase::Static);
    }

    #[test]
    fn test_motion_creates_one_body_per_fragment() {
        let (mut effect, sizes) = effect(4);
        let mut rng = StdRng::seed_from_u64(0);
        effect
            .mount(true, container(), &sizes, &mut rng)
            .expect("mounted");
        assert_eq!(effect.phase(), EffectPhase::Simulating);
        let bodies = effect.bodies();
        assert_eq!(bodies.len(), 4);
        for (i, body) in bodies.iter().enumerate() {
            assert_eq!(body.text_content, format!("frag{i}"));
            assert!(body.angle.to_degrees().abs() <= 15.0001);
        }
        for pair in bodies.windows(2) {
            assert!(pair[0].position.x <= pair[1].position.x);
        }
    }

    #[test]
    fn test_runs_to_settled_then_stays() {
        let (mut effect, sizes) = effect(3);
        let mut rng = StdRng::seed_from_u64(5);
        effect
            .mount(true, container(), &sizes, &mut rng)
            .expect("mounted");
        let timeout = effect.config().timeout_steps;
        assert_eq!(effect.advance(timeout), EffectPhase::Settled);
        assert_eq!(effect.body_count(), 3);
        assert!(effect.bodies().iter().all(|b| b.is_settled));

        // No way back to simulating without a fresh instance.
        let phase = effect
            .mount(true, container(), &sizes, &mut rng)
            .expect("no-op");
        assert_eq!(phase, EffectPhase::Settled);
    }

    #[test]
    fn test_freeze_mid_simulation() {
        let (mut effect, sizes) = effect(3);
        let mut rng = StdRng::seed_from_u64(5);
        effect
            .mount(true, container(), &sizes, &mut rng)
            .expect("mounted");
        effect.advance(3);
        effect.freeze();
        assert_eq!(effect.phase(), EffectPhase::Settled);
        assert!(!effect.timed_out());
    }

    #[test]
    fn test_unmount_releases_bodies() {
        let (mut effect, sizes) = effect(3);
        let mut rng = StdRng::seed_from_u64(5);
        effect
            .mount(true, container(), &sizes, &mut rng)
            .expect("mounted");
        effect.unmount();
        assert_eq!(effect.phase(), EffectPhase::Disposed);
        assert_eq!(effect.body_count(), 0);
        assert_eq!(effect.advance(1), EffectPhase::Disposed);
    }

    #[test]
    fn test_size_mismatch_leaves_uninitialized() {
        let (mut effect, mut sizes) = effect(3);
        sizes.push(sizes[0]);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(effect.mount(true, container(), &sizes, &mut rng).is_err());
        assert_eq!(effect.phase(), EffectPhase::Uninitialized);
    }
}
