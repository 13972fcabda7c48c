//! Aurora backdrop: a few huge, faint radial gradients drifting slowly.
//!
//! Blob centers are a pure function of wall-clock time. There is no stored
//! motion state, so two layers asked about the same `now` agree exactly.

use chainfx_ui::{Color, DrawCommand, DrawContext, EffectTheme, Point, Size};

use crate::config::{AuroraConfig, BlobPath};

/// One blob as it should be painted at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuroraBlob {
    /// Gradient center.
    pub center: Point,
    /// Gradient radius.
    pub radius: f32,
    /// Color at the center.
    pub color: Color,
}

/// The aurora layer of a particle field.
#[derive(Debug, Clone)]
pub struct AuroraLayer {
    blobs: Vec<(BlobPath, Color)>,
}

impl AuroraLayer {
    /// Pairs blob paths with the theme's aurora colors, in order.
    ///
    /// Returns `None` when the layer is disabled or nothing pairs up.
    #[must_use]
    pub fn new(config: &AuroraConfig, theme: &EffectTheme) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let blobs: Vec<_> = config
            .blobs
            .iter()
            .copied()
            .zip(theme.aurora.iter().copied())
            .collect();
        if blobs.is_empty() {
            return None;
        }
        Some(Self { blobs })
    }

    /// Number of blobs painted per frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Always false; empty layers are never built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Blob geometry at `now` (milliseconds) over a surface of `size`.
    pub fn blobs_at(&self, now: f64, size: Size) -> impl Iterator<Item = AuroraBlob> + '_ {
        self.blobs.iter().map(move |(path, color)| AuroraBlob {
            center: Point::new(
                size.width * oscillate(now, path.base[0], path.amplitude[0], path.frequency[0], path.phase[0]),
                size.height * oscillate(now, path.base[1], path.amplitude[1], path.frequency[1], path.phase[1]),
            ),
            radius: path.radius * size.min_side(),
            color: *color,
        })
    }

    /// Paints every blob as a radial gradient fading to transparent.
    pub fn draw<C: DrawContext + ?Sized>(&self, ctx: &mut C, now: f64, size: Size) {
        for blob in self.blobs_at(now, size) {
            ctx.submit(DrawCommand::RadialGradient {
                center: blob.center,
                radius: blob.radius,
                inner: blob.color,
                outer: blob.color.with_alpha(0.0),
            });
        }
    }
}

#[inline]
fn oscillate(now: f64, base: f32, amplitude: f32, frequency: f32, phase: f32) -> f32 {
    // f64 keeps the phase precise for long-lived pages
    let angle = now * f64::from(frequency) + f64::from(phase);
    base + amplitude * angle.sin() as f32
}
