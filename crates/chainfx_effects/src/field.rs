//! Particle field: the ambient animation behind the landing page hero.
//!
//! Frame pipeline:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ 1. Clear surface                                         │
//! │ 2. Aurora blobs (optional, pure function of `now`)       │
//! │ 3. Step + wrap + draw every particle                     │
//! │ 4. Pairwise scan, line for every pair closer than D      │
//! │ 5. Request the next frame (animated mode only)           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The pairwise scan is O(n²) per frame. With tens of particles the draw
//! calls dominate; a uniform grid only pays off past a few hundred.

use chainfx_ui::{
    BackingStore, Canvas, DisplayScaleProvider, DrawCommand, DrawContext, EffectResult,
    EffectTheme, FrameHandle, FrameScheduler, ListenerId, MotionPreferenceProvider,
    ResizeEvents, Size,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::aurora::AuroraLayer;
use crate::config::{DensityTier, FieldConfig};
use crate::particle::{connection_opacity, Particle};

/// What the last rendered frame contained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Live particles.
    pub particles: u32,
    /// Connection lines drawn in the last frame.
    pub connections_drawn: u32,
    /// Aurora blobs painted in the last frame.
    pub aurora_blobs: u32,
    /// Frames rendered since mount (static frames included).
    pub frames_rendered: u64,
}

/// Clamps a reported device pixel ratio to `[?, max]`, treating garbage as 1.
#[must_use]
pub fn effective_pixel_ratio(reported: f32, max: f32) -> f32 {
    let ratio = if reported.is_finite() && reported > 0.0 {
        reported
    } else {
        1.0
    };
    ratio.min(max)
}

/// Canvas-backed field of drifting, connected particles.
pub struct ParticleField<C: Canvas> {
    canvas: C,
    config: FieldConfig,
    theme: EffectTheme,
    aurora: Option<AuroraLayer>,
    rng: ChaCha8Rng,
    particles: Vec<Particle>,
    size: Size,
    backing: Option<BackingStore>,
    reduced_motion: bool,
    mounted: bool,
    pending_frame: Option<FrameHandle>,
    resize_listener: Option<ListenerId>,
    stats: FieldStats,
}

impl<C: Canvas> ParticleField<C> {
    /// Builds an unmounted field.
    ///
    /// # Errors
    ///
    /// Returns [`chainfx_ui::EffectError::InvalidConfig`] if the config or
    /// theme fails validation.
    pub fn new(canvas: C, config: FieldConfig, theme: EffectTheme) -> EffectResult<Self> {
        config.validate()?;
        theme.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            canvas,
            aurora: AuroraLayer::new(&config.aurora, &theme),
            config,
            theme,
            rng,
            particles: Vec::new(),
            size: Size::ZERO,
            backing: None,
            reduced_motion: false,
            mounted: false,
            pending_frame: None,
            resize_listener: None,
            stats: FieldStats::default(),
        })
    }

    /// Mounts the field on a surface of `size`.
    ///
    /// Without a 2D context nothing is registered and nothing is drawn.
    /// Otherwise a resize listener is registered, the surface is sized, and
    /// either the static reduced-motion frame is drawn or the first frame is
    /// requested.
    pub fn mount<M, D, E, S>(
        &mut self,
        size: Size,
        motion: &M,
        display: &D,
        events: &mut E,
        scheduler: &mut S,
    ) where
        M: MotionPreferenceProvider + ?Sized,
        D: DisplayScaleProvider + ?Sized,
        E: ResizeEvents + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if self.mounted {
            return;
        }
        if self.canvas.context_2d().is_none() {
            tracing::debug!("no 2d context, particle field stays blank");
            return;
        }

        self.mounted = true;
        self.reduced_motion = motion.prefers_reduced_motion();
        self.resize_listener = Some(events.add_resize_listener());
        tracing::debug!(
            width = size.width,
            height = size.height,
            reduced_motion = self.reduced_motion,
            "particle field mounted"
        );
        self.resize(size, display, scheduler);
    }

    /// Re-sizes the surface and re-seeds the particles.
    ///
    /// The backing store follows the device pixel ratio (capped), any pending
    /// frame is cancelled, particles are re-seeded for the new size, and the
    /// loop restarts (or the static frame is redrawn).
    pub fn resize<D, S>(&mut self, size: Size, display: &D, scheduler: &mut S)
    where
        D: DisplayScaleProvider + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        let Some(ctx) = self.canvas.context_2d() else {
            return;
        };

        let scale = effective_pixel_ratio(display.device_pixel_ratio(), self.config.max_pixel_ratio);
        let backing = BackingStore {
            pixel_width: (size.width.max(0.0) * scale) as u32,
            pixel_height: (size.height.max(0.0) * scale) as u32,
            scale,
        };
        ctx.resize_backing(backing);
        self.backing = Some(backing);

        self.cancel_pending(scheduler);
        self.initialize(size);

        if !self.mounted {
            return;
        }
        if self.reduced_motion {
            self.reduced_motion_frame();
        } else {
            self.pending_frame = Some(scheduler.request_frame());
        }
    }

    /// Seeds the particle set for a surface of `size`.
    ///
    /// The count comes from the density tier of `size.width`.
    pub fn initialize(&mut self, size: Size) {
        if size.is_empty() {
            tracing::debug!(width = size.width, height = size.height, "seeding a zero-area surface");
        }
        self.size = size;
        let count = self.config.density.count_for(size.width);
        let config = &self.config;
        let theme = &self.theme;
        let rng = &mut self.rng;
        self.particles.clear();
        self.particles
            .extend((0..count).map(|_| Particle::spawn(rng, size, config, theme)));
        self.stats.particles = count as u32;
        tracing::debug!(count, tier = ?self.density_tier(), "particles seeded");
    }

    /// Runs the frame callback for `handle`: one tick, then the next request.
    ///
    /// Stale handles (cancelled or superseded) are ignored.
    pub fn on_frame<S: FrameScheduler + ?Sized>(
        &mut self,
        handle: FrameHandle,
        now: f64,
        scheduler: &mut S,
    ) {
        if self.pending_frame != Some(handle) {
            return;
        }
        self.pending_frame = None;
        if !self.mounted || self.reduced_motion {
            return;
        }

        self.tick(now);
        self.pending_frame = Some(scheduler.request_frame());
    }

    /// Advances and draws one animated frame.
    pub fn tick(&mut self, now: f64) -> FieldStats {
        let Some(ctx) = self.canvas.context_2d() else {
            return self.stats;
        };
        let size = self.size;

        ctx.submit(DrawCommand::Clear { area: size.to_rect() });

        let mut aurora_blobs = 0;
        if let Some(aurora) = &self.aurora {
            aurora.draw(ctx, now, size);
            aurora_blobs = aurora.len() as u32;
        }

        for particle in &mut self.particles {
            particle.step(size, self.config.wrap_margin);
            draw_particle(ctx, particle, &self.theme);
        }

        let connections = draw_connections(ctx, &self.particles, &self.config, &self.theme);

        self.stats.connections_drawn = connections;
        self.stats.aurora_blobs = aurora_blobs;
        self.stats.frames_rendered += 1;
        tracing::trace!(now, connections, "particle frame");
        self.stats
    }

    /// Paints only the aurora layer for `now`. No-op when the layer is off.
    pub fn draw_aurora_layer(&mut self, now: f64) {
        let size = self.size;
        if let (Some(aurora), Some(ctx)) = (&self.aurora, self.canvas.context_2d()) {
            aurora.draw(ctx, now, size);
        }
    }

    /// Draws one static frame: every particle once, no lines, no motion.
    ///
    /// Schedules nothing. The aurora, when enabled, is painted frozen at its
    /// resting phase.
    pub fn reduced_motion_frame(&mut self) -> FieldStats {
        let Some(ctx) = self.canvas.context_2d() else {
            return self.stats;
        };
        let size = self.size;

        ctx.submit(DrawCommand::Clear { area: size.to_rect() });
        let mut aurora_blobs = 0;
        if let Some(aurora) = &self.aurora {
            aurora.draw(ctx, 0.0, size);
            aurora_blobs = aurora.len() as u32;
        }
        for particle in &self.particles {
            draw_particle(ctx, particle, &self.theme);
        }

        self.stats.connections_drawn = 0;
        self.stats.aurora_blobs = aurora_blobs;
        self.stats.frames_rendered += 1;
        tracing::debug!(particles = self.particles.len(), "static particle frame");
        self.stats
    }

    /// Applies a change of the reduced-motion preference.
    ///
    /// Like a remount: the loop is cancelled, particles are re-seeded, then
    /// either the static frame is drawn or the loop restarts.
    pub fn set_reduced_motion<D, S>(&mut self, reduced: bool, display: &D, scheduler: &mut S)
    where
        D: DisplayScaleProvider + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if reduced == self.reduced_motion {
            return;
        }
        self.reduced_motion = reduced;
        if self.mounted {
            tracing::debug!(reduced_motion = reduced, "motion preference changed");
            self.resize(self.size, display, scheduler);
        }
    }

    /// Tears the field down: cancels the pending frame and removes the
    /// resize listener. Safe to call twice.
    pub fn unmount<E, S>(&mut self, events: &mut E, scheduler: &mut S)
    where
        E: ResizeEvents + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        self.cancel_pending(scheduler);
        if let Some(listener) = self.resize_listener.take() {
            events.remove_resize_listener(listener);
        }
        if self.mounted {
            tracing::debug!(frames = self.stats.frames_rendered, "particle field unmounted");
        }
        self.mounted = false;
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Live particles as raw instance bytes.
    #[must_use]
    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }

    /// Current logical surface size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Current backing store, once sized.
    #[must_use]
    pub fn backing(&self) -> Option<BackingStore> {
        self.backing
    }

    /// Density tier of the current surface.
    #[must_use]
    pub fn density_tier(&self) -> DensityTier {
        self.config.density.tier_for(self.size.width)
    }

    /// Frame the field is waiting for, if any.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// True while mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// True while mounted and running the animation loop.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.mounted && !self.reduced_motion
    }

    /// True while a resize listener is registered.
    #[must_use]
    pub fn has_resize_listener(&self) -> bool {
        self.resize_listener.is_some()
    }

    /// Stats of the last frame.
    #[must_use]
    pub fn stats(&self) -> FieldStats {
        self.stats
    }

    /// Field configuration.
    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The canvas.
    #[must_use]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Mutable canvas access.
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    fn cancel_pending<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.pending_frame.take() {
            scheduler.cancel_frame(handle);
        }
    }
}

fn draw_particle<X: DrawContext + ?Sized>(ctx: &mut X, particle: &Particle, theme: &EffectTheme) {
    ctx.submit(DrawCommand::Circle {
        center: particle.point(),
        radius: particle.radius,
        color: theme.particle_color(particle.color).with_alpha(particle.opacity),
    });
}

/// Draws a line for every pair closer than the connection distance and
/// returns how many were drawn.
fn draw_connections<X: DrawContext + ?Sized>(
    ctx: &mut X,
    particles: &[Particle],
    config: &FieldConfig,
    theme: &EffectTheme,
) -> u32 {
    let threshold = config.connection_distance;
    let threshold_sq = threshold * threshold;
    let mut drawn = 0;

    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let distance_sq = a.point().distance_sq(b.point());
            if distance_sq >= threshold_sq {
                continue;
            }
            let opacity = connection_opacity(distance_sq.sqrt(), threshold, config.max_line_opacity);
            ctx.submit(DrawCommand::Line {
                from: a.point(),
                to: b.point(),
                color: theme.line_color.with_alpha(opacity),
                width: config.line_width,
            });
            drawn += 1;
        }
    }

    drawn
}
