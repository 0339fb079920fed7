use glam::Vec2;
use rapier2d::prelude::*;

use crate::body::PhysicsBody;
use crate::config::TextEffectConfig;
use crate::spawn::{BodySeed, ContainerSize};

struct BodyEntry {
    handle: RigidBodyHandle,
    calm_steps: u32,
    snapshot: PhysicsBody,
}

/// A rapier world holding the fragment bodies plus floor and side walls.
///
/// Owned by one effect instance; dropping it releases every body.
pub struct TextWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    entries: Vec<BodyEntry>,
    pixels_per_meter: f32,
    linear_epsilon: f32,
    angular_epsilon: f32,
    settle_steps: u32,
    timeout_steps: u32,
    steps: u32,
    timed_out: bool,
}

impl TextWorld {
    pub fn new(seeds: &[BodySeed], container: ContainerSize, config: &TextEffectConfig) -> Self {
        let container = container.sanitized();
        let ppm = config.pixels_per_meter;
        let to_m = |px: f32| px / ppm;

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Walls reach above the container so bodies dropped from above cannot
        // slip around them.
        let thickness = config.wall_thickness_px;
        let tallest = seeds
            .iter()
            .map(|s| s.half_height * 2.0)
            .fold(0.0f32, f32::max);
        let top = -(config.spawn_height_px + tallest + thickness);
        let wall_half_h = (container.height - top) * 0.5;
        let wall_center_y = (container.height + top) * 0.5;

        let floor = ColliderBuilder::cuboid(
            to_m(container.width * 0.5 + thickness),
            to_m(thickness * 0.5),
        )
        .translation(vector![
            to_m(container.width * 0.5),
            to_m(container.height + thickness * 0.5)
        ])
        .build();
        let left = ColliderBuilder::cuboid(to_m(thickness * 0.5), to_m(wall_half_h))
            .translation(vector![to_m(-thickness * 0.5), to_m(wall_center_y)])
            .build();
        let right = ColliderBuilder::cuboid(to_m(thickness * 0.5), to_m(wall_half_h))
            .translation(vector![
                to_m(container.width + thickness * 0.5),
                to_m(wall_center_y)
            ])
            .build();
        colliders.insert(floor);
        colliders.insert(left);
        colliders.insert(right);

        let mut entries = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let body = RigidBodyBuilder::dynamic()
                .translation(vector![to_m(seed.x), to_m(seed.y)])
                .rotation(seed.angle)
                .linear_damping(config.linear_damping)
                .angular_damping(config.angular_damping)
                .ccd_enabled(true)
                .build();
            let handle = bodies.insert(body);
            let collider = ColliderBuilder::cuboid(to_m(seed.half_width), to_m(seed.half_height))
                .friction(seed.friction)
                .restitution(seed.restitution)
                .density(seed.density)
                .build();
            colliders.insert_with_parent(collider, handle, &mut bodies);

            entries.push(BodyEntry {
                handle,
                calm_steps: 0,
                snapshot: PhysicsBody {
                    text_content: seed.text.clone(),
                    position: Vec2::new(seed.x, seed.y),
                    angle: seed.angle,
                    velocity: Vec2::ZERO,
                    angular_velocity: 0.0,
                    is_settled: false,
                    half_extents: Vec2::new(seed.half_width, seed.half_height),
                },
            });
        }

        let params = IntegrationParameters {
            dt: config.timestep,
            ..IntegrationParameters::default()
        };

        log::debug!(
            "Text world created: {} bodies in {}x{}px",
            entries.len(),
            container.width,
            container.height
        );

        Self {
            gravity: vector![0.0, config.gravity],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            entries,
            pixels_per_meter: ppm,
            linear_epsilon: config.settle_linear_epsilon,
            angular_epsilon: config.settle_angular_epsilon,
            settle_steps: config.settle_steps.max(1),
            timeout_steps: config.timeout_steps,
            steps: 0,
            timed_out: false,
        }
    }

    /// Advance one fixed step and refresh snapshots. Bodies that stayed calm
    /// long enough, or every body once the timeout is reached, are pinned.
    /// Returns true once all bodies are settled.
    pub fn step(&mut self) -> bool {
        if self.all_settled() {
            return true;
        }

        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
        self.steps += 1;

        let timed_out = self.steps >= self.timeout_steps;
        if timed_out {
            log::debug!("Text world hit its {} step timeout", self.timeout_steps);
        }
        let ppm = self.pixels_per_meter;

        for entry in self.entries.iter_mut() {
            let Some(body) = self.bodies.get_mut(entry.handle) else {
                continue;
            };

            if !entry.snapshot.is_settled {
                let speed = body.linvel().norm() * ppm;
                let spin = body.angvel().abs();
                if speed < self.linear_epsilon && spin < self.angular_epsilon {
                    entry.calm_steps += 1;
                } else {
                    entry.calm_steps = 0;
                }
                let calm = entry.calm_steps >= self.settle_steps;
                if calm || timed_out {
                    pin(body);
                    entry.snapshot.is_settled = true;
                    self.timed_out |= !calm;
                }
            }

            let t = body.translation();
            let v = body.linvel();
            entry.snapshot.position = Vec2::new(t.x, t.y) * ppm;
            entry.snapshot.angle = body.rotation().angle();
            entry.snapshot.velocity = Vec2::new(v.x, v.y) * ppm;
            entry.snapshot.angular_velocity = body.angvel();
        }

        self.all_settled()
    }

    /// Pin every body where it is.
    pub fn freeze(&mut self) {
        for entry in self.entries.iter_mut() {
            if let Some(body) = self.bodies.get_mut(entry.handle) {
                pin(body);
            }
            entry.snapshot.is_settled = true;
            entry.snapshot.velocity = Vec2::ZERO;
            entry.snapshot.angular_velocity = 0.0;
        }
    }

    pub fn all_settled(&self) -> bool {
        self.entries.iter().all(|e| e.snapshot.is_settled)
    }

    pub fn snapshots(&self) -> Vec<PhysicsBody> {
        self.entries.iter().map(|e| e.snapshot.clone()).collect()
    }

    pub fn for_each_body(&self, mut f: impl FnMut(usize, &PhysicsBody)) {
        for (i, entry) in self.entries.iter().enumerate() {
            f(i, &entry.snapshot);
        }
    }

    pub fn body_count(&self) -> usize {
        self.entries.len()
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Whether the timeout had to pin a body that was still moving.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

/// Zero the velocity and turn the body static so nothing nudges it again.
fn pin(body: &mut RigidBody) {
    body.set_linvel(vector![0.0, 0.0], false);
    body.set_angvel(0.0, false);
    body.set_body_type(RigidBodyType::Fixed, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::TextFragment;
    use crate::spawn::plan_bodies;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world(n: usize, seed: u64) -> (TextWorld, ContainerSize) {
        world_with(n, seed, &TextEffectConfig::default())
    }

    fn world_with(n: usize, seed: u64, config: &TextEffectConfig) -> (TextWorld, ContainerSize) {
        let container = ContainerSize {
            width: 600.0,
            height: 300.0,
        };
        let fragments: Vec<TextFragment> =
            (0..n).map(|i| TextFragment::new(format!("w{i}"))).collect();
        let sizes: Vec<_> = fragments.iter().map(|f| f.estimated_size(18.0)).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let seeds =
            plan_bodies(&fragments, &sizes, container, config, &mut rng).expect("sizes match");
        (TextWorld::new(&seeds, container, config), container)
    }

    #[test]
    fn test_bodies_fall() {
        let (mut world, _) = world(3, 1);
        let before: Vec<f32> = world.snapshots().iter().map(|b| b.position.y).collect();
        for _ in 0..30 {
            world.step();
        }
        let after = world.snapshots();
        for (b, a) in before.iter().zip(&after) {
            assert!(
                a.position.y > *b,
                "body did not fall: {b} -> {}",
                a.position.y
            );
        }
    }

    #[test]
    fn test_simulation_terminates_and_stays_in_bounds() {
        let (mut world, container) = world(6, 7);
        let config = TextEffectConfig::default();
        let mut done = false;
        for _ in 0..config.timeout_steps {
            if world.step() {
                done = true;
                break;
            }
        }
        assert!(done, "world never settled");
        assert!(world.steps() <= config.timeout_steps);
        for body in world.snapshots() {
            assert!(body.is_settled);
            assert!(
                body.position.x >= 0.0 && body.position.x <= container.width,
                "x out of bounds: {}",
                body.position.x
            );
            assert!(
                body.position.y <= container.height,
                "y below floor: {}",
                body.position.y
            );
        }
    }

    #[test]
    fn test_settled_bodies_have_zero_velocity() {
        let (mut world, _) = world(4, 3);
        while !world.step() {}
        for body in world.snapshots() {
            assert_eq!(body.velocity, Vec2::ZERO);
            assert_eq!(body.angular_velocity, 0.0);
        }
        // Further steps are no-ops.
        let steps = world.steps();
        assert!(world.step());
        assert_eq!(world.steps(), steps);
    }

    #[test]
    fn test_short_timeout_pins_moving_bodies() {
        let config = TextEffectConfig {
            timeout_steps: 5,
            ..TextEffectConfig::default()
        };
        let (mut world, _) = world_with(4, 3, &config);
        let mut steps = 0;
        while !world.step() {
            steps += 1;
        }
        assert_eq!(steps + 1, 5);
        assert!(world.timed_out());
    }

    #[test]
    fn test_natural_settle_on_the_timeout_step_is_not_a_timeout() {
        let config = TextEffectConfig {
            timeout_steps: 5000,
            ..TextEffectConfig::default()
        };
        let (mut world, _) = world_with(4, 3, &config);
        while !world.step() {}
        assert!(!world.timed_out());
        let natural = world.steps();

        // Same scene with the timeout landing exactly on the settling step.
        let config = TextEffectConfig {
            timeout_steps: natural,
            ..config
        };
        let (mut world, _) = world_with(4, 3, &config);
        while !world.step() {}
        assert_eq!(world.steps(), natural);
        assert!(!world.timed_out());
    }

    #[test]
    fn test_freeze_pins_everything() {
        let (mut world, _) = world(5, 9);
        for _ in 0..5 {
            world.step();
        }
        world.freeze();
        assert!(world.all_settled());
        for body in world.snapshots() {
            assert_eq!(body.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn test_empty_world_is_settled() {
        let config = TextEffectConfig::default();
        let mut world = TextWorld::new(
            &[],
            ContainerSize {
                width: 100.0,
                height: 100.0,
            },
            &config,
        );
        assert_eq!(world.body_count(), 0);
        assert!(world.step());
    }
}
