use rand::Rng;

use crate::config::{
    TextEffectConfig, FALLBACK_CONTAINER_HEIGHT_PX, FALLBACK_CONTAINER_WIDTH_PX, MIN_BODY_EDGE_PX,
};
use crate::error::PhysicsError;
use crate::fragment::{FragmentSize, TextFragment};

/// Size of the element hosting the effect, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    /// Replace zero, negative or non-finite dimensions with the fallbacks.
    pub fn sanitized(self) -> Self {
        let width = if self.width.is_finite() && self.width > 0.0 {
            self.width
        } else {
            log::warn!(
                "Container width {} unusable, falling back to {}px",
                self.width,
                FALLBACK_CONTAINER_WIDTH_PX
            );
            FALLBACK_CONTAINER_WIDTH_PX
        };
        let height = if self.height.is_finite() && self.height > 0.0 {
            self.height
        } else {
            FALLBACK_CONTAINER_HEIGHT_PX
        };
        Self { width, height }
    }
}

/// Initial state of one body, in CSS pixels (center) and radians.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySeed {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub half_width: f32,
    pub half_height: f32,
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
}

fn sample(rng: &mut impl Rng, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

/// Lay out one body per fragment.
///
/// Each fragment owns an equal horizontal slot; its center is the slot
/// center plus jitter bounded by half a slot, so x never decreases with the
/// fragment index.
pub fn plan_bodies(
    fragments: &[TextFragment],
    sizes: &[FragmentSize],
    container: ContainerSize,
    config: &TextEffectConfig,
    rng: &mut impl Rng,
) -> Result<Vec<BodySeed>, PhysicsError> {
    if fragments.len() != sizes.len() {
        return Err(PhysicsError::SizeMismatch {
            fragments: fragments.len(),
            sizes: sizes.len(),
        });
    }
    if fragments.is_empty() {
        return Ok(Vec::new());
    }

    let container = container.sanitized();
    let sizes: Vec<FragmentSize> = sizes
        .iter()
        .map(|s| s.sanitized(MIN_BODY_EDGE_PX))
        .collect();

    let slot = container.width / fragments.len() as f32;
    let jitter = config.jitter_px.min(slot * 0.5);
    let tilt = config.max_tilt_rad();

    // One shared clamp band keeps the ordering intact.
    let widest = sizes.iter().map(|s| s.width * 0.5).fold(0.0f32, f32::max);
    let (min_x, max_x) = if widest * 2.0 < container.width {
        (widest, container.width - widest)
    } else {
        (container.width * 0.5, container.width * 0.5)
    };

    let mut seeds = Vec::with_capacity(fragments.len());
    let mut prev_x = f32::MIN;
    for (i, (fragment, size)) in fragments.iter().zip(&sizes).enumerate() {
        let base = (i as f32 + 0.5) * slot;
        let offset = if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };
        let x = (base + offset).clamp(min_x, max_x).max(prev_x);
        prev_x = x;

        let drop = if config.spawn_height_px > 0.0 {
            rng.gen_range(0.0..=config.spawn_height_px)
        } else {
            0.0
        };
        let angle = if tilt > 0.0 {
            rng.gen_range(-tilt..=tilt)
        } else {
            0.0
        };

        seeds.push(BodySeed {
            text: fragment.text.clone(),
            x,
            y: -size.height * 0.5 - drop,
            angle,
            half_width: size.width * 0.5,
            half_height: size.height * 0.5,
            friction: sample(rng, config.friction_range),
            restitution: sample(rng, config.restitution_range),
            density: sample(rng, config.density_range),
        });
    }
    Ok(seeds)
}
