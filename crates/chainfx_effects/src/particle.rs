//! Drifting point particles.
//!
//! A particle's velocity, radius, opacity and color are drawn once at spawn
//! and never change. Only the position moves, and it wraps instead of the
//! particle dying.

use bytemuck::{Pod, Zeroable};
use chainfx_ui::{EffectTheme, Point, Size};
use rand::Rng;

use crate::config::FieldConfig;

/// A single particle. Layout matches the instance buffer of a GPU renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Position (x, y) in logical pixels.
    pub position: [f32; 2],
    /// Velocity (vx, vy) in logical pixels per frame.
    pub velocity: [f32; 2],
    /// Radius.
    pub radius: f32,
    /// Opacity in (0, 1).
    pub opacity: f32,
    /// Index into the theme's particle palette.
    pub color: u32,
    /// 1 for hero particles, 0 otherwise.
    pub hero: u32,
}

impl Particle {
    /// Size of a particle in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Spawns a particle uniformly over `size`.
    pub fn spawn<R: Rng>(rng: &mut R, size: Size, config: &FieldConfig, theme: &EffectTheme) -> Self {
        let hero = rng.gen::<f32>() < config.hero_fraction;
        let radius = if hero {
            config.hero_radius.sample(rng)
        } else {
            config.radius.sample(rng)
        };
        let speed = config.max_speed;
        let total_weight = theme.total_weight().max(1);

        Self {
            position: [
                rng.gen::<f32>() * size.width.max(0.0),
                rng.gen::<f32>() * size.height.max(0.0),
            ],
            velocity: [
                (rng.gen::<f32>() - 0.5) * 2.0 * speed,
                (rng.gen::<f32>() - 0.5) * 2.0 * speed,
            ],
            radius,
            opacity: config.opacity.sample(rng),
            color: theme.pick(rng.gen_range(0..total_weight)) as u32,
            hero: u32::from(hero),
        }
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.position[0], self.position[1])
    }

    /// True for particles from the larger radius band.
    #[must_use]
    pub fn is_hero(&self) -> bool {
        self.hero != 0
    }

    /// Moves by one frame of velocity, then wraps around `bounds`.
    #[inline]
    pub fn step(&mut self, bounds: Size, margin: f32) {
        self.position[0] += self.velocity[0];
        self.position[1] += self.velocity[1];
        self.position[0] = wrap_axis(self.position[0], bounds.width, margin);
        self.position[1] = wrap_axis(self.position[1], bounds.height, margin);
    }
}

/// Wraps a coordinate that left `[-margin, extent + margin]` onto the
/// opposite edge.
#[inline]
#[must_use]
pub fn wrap_axis(value: f32, extent: f32, margin: f32) -> f32 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

/// Opacity of the line between two particles `distance` apart.
///
/// Linear from `max_opacity` at 0 down to 0 at `threshold` and beyond.
#[inline]
#[must_use]
pub fn connection_opacity(distance: f32, threshold: f32, max_opacity: f32) -> f32 {
    if threshold <= 0.0 || distance >= threshold {
        return 0.0;
    }
    (1.0 - distance / threshold) * max_opacity
}
