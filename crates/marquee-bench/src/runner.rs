use std::time::Instant;

use marquee_physics::config::TextEffectConfig;
use marquee_physics::effect::{EffectPhase, TextEffect};
use marquee_physics::error::PhysicsError;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::scenes::SceneConfig;

/// Timing data for one scene, over every step of every seed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub fragments: usize,
    pub seeds: u32,
    /// Mean number of fixed steps until every body was pinned.
    pub mean_steps_to_settle: f64,
    /// Runs that hit the step timeout instead of settling naturally.
    pub timeouts: u32,
    pub step_timings: TimingSeries,
}

/// Runs the gravity text world headless, one run per seed.
pub struct BenchmarkRunner {
    config: TextEffectConfig,
    seeds: u32,
}

impl BenchmarkRunner {
    pub fn new(config: TextEffectConfig, seeds: u32) -> Self {
        Self {
            config,
            seeds: seeds.max(1),
        }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, scene: &SceneConfig) -> Result<BenchmarkResult, PhysicsError> {
        log::info!(
            "Running scene '{}' ({} fragments, {} seeds)...",
            scene.name,
            scene.fragment_count,
            self.seeds
        );

        let fragments = scene.fragments();
        let sizes = scene.sizes(&fragments);
        let mut step_times = Vec::new();
        let mut total_steps = 0u64;
        let mut timeouts = 0u32;

        for seed in 0..self.seeds {
            let mut effect = TextEffect::new(fragments.clone(), self.config.clone());
            let mut rng = StdRng::seed_from_u64(u64::from(seed));
            effect.mount(true, scene.container, &sizes, &mut rng)?;

            let mut steps = 0u32;
            while effect.phase() == EffectPhase::Simulating {
                let start = Instant::now();
                effect.advance(1);
                step_times.push(start.elapsed().as_secs_f64() * 1000.0);
                steps += 1;
            }
            if effect.timed_out() {
                timeouts += 1;
            }
            total_steps += u64::from(steps);
            log::debug!("  seed {seed}: {steps} steps");
        }

        let result = BenchmarkResult {
            scene_name: scene.name.to_string(),
            fragments: scene.fragment_count,
            seeds: self.seeds,
            mean_steps_to_settle: total_steps as f64 / f64::from(self.seeds),
            timeouts,
            step_timings: compute_timings(&step_times),
        };
        log::info!(
            "  {:.1} steps to settle, {} timeouts, {:.3} ms/step",
            result.mean_steps_to_settle,
            result.timeouts,
            result.step_timings.mean_ms
        );
        Ok(result)
    }
}

/// Compute timing statistics from a list of step times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let percentile = |p: f64| sorted[(((n as f64) * p).ceil() as usize).min(n - 1)];

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: percentile(0.95),
        p99_ms: percentile(0.99),
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::standard_scenes;

    #[test]
    fn test_compute_timings_empty() {
        let t = compute_timings(&[]);
        assert_eq!(t.mean_ms, 0.0);
        assert_eq!(t.max_ms, 0.0);
    }

    #[test]
    fn test_compute_timings_stats() {
        let t = compute_timings(&[4.0, 1.0, 3.0, 2.0]);
        assert!((t.mean_ms - 2.5).abs() < 1e-9);
        assert!((t.median_ms - 2.5).abs() < 1e-9);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 4.0);
        assert_eq!(t.p99_ms, 4.0);
    }

    #[test]
    fn test_smallest_scene_terminates() {
        let config = TextEffectConfig::default();
        let timeout = config.timeout_steps;
        let runner = BenchmarkRunner::new(config, 2);
        let scene = &standard_scenes()[0];
        let result = runner.run_scene(scene).expect("scene should mount");
        assert_eq!(result.seeds, 2);
        assert!(result.mean_steps_to_settle >= 1.0);
        assert!(result.mean_steps_to_settle <= f64::from(timeout));
    }

    #[test]
    fn test_timeouts_counted_only_when_hit() {
        let config = TextEffectConfig {
            timeout_steps: 5,
            ..TextEffectConfig::default()
        };
        let runner = BenchmarkRunner::new(config, 3);
        let result = runner
            .run_scene(&standard_scenes()[0])
            .expect("scene should mount");
        assert_eq!(result.timeouts, 3);
        assert_eq!(result.mean_steps_to_settle, 5.0);
    }
}
