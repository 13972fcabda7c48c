//! # Particle Field Configuration
//!
//! Loaded once from TOML, validated before a field is built. Every field has
//! a default, so an empty document is a valid config:
//!
//! ```toml
//! connection_distance = 150.0
//!
//! [density]
//! mobile_breakpoint = 768.0
//! mobile_count = 25
//! desktop_count = 60
//!
//! [aurora]
//! enabled = true
//! ```

use std::path::Path;

use chainfx_ui::{EffectError, EffectResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONNECTION_DISTANCE, DESKTOP_PARTICLE_COUNT, HERO_FRACTION, LINE_WIDTH, MAX_LINE_OPACITY,
    MAX_PIXEL_RATIO, MAX_SPEED, MOBILE_BREAKPOINT, MOBILE_PARTICLE_COUNT, WRAP_MARGIN,
};

/// Which particle budget a surface width falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityTier {
    /// Narrow surface, fewer particles.
    Mobile,
    /// Wide surface.
    Desktop,
}

/// Width breakpoint and the two particle counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityTiers {
    /// Widths strictly below this are mobile.
    pub mobile_breakpoint: f32,
    /// Particles on mobile.
    pub mobile_count: usize,
    /// Particles on desktop.
    pub desktop_count: usize,
}

impl Default for DensityTiers {
    fn default() -> Self {
        Self {
            mobile_breakpoint: MOBILE_BREAKPOINT,
            mobile_count: MOBILE_PARTICLE_COUNT,
            desktop_count: DESKTOP_PARTICLE_COUNT,
        }
    }
}

impl DensityTiers {
    /// Tier for a surface width.
    #[must_use]
    pub fn tier_for(&self, width: f32) -> DensityTier {
        if width < self.mobile_breakpoint {
            DensityTier::Mobile
        } else {
            DensityTier::Desktop
        }
    }

    /// Particle count for a surface width.
    #[must_use]
    pub fn count_for(&self, width: f32) -> usize {
        match self.tier_for(width) {
            DensityTier::Mobile => self.mobile_count,
            DensityTier::Desktop => self.desktop_count,
        }
    }
}

/// Half-open sampling range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Inclusive lower bound.
    pub min: f32,
    /// Exclusive upper bound.
    pub max: f32,
}

impl ValueRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draws a value; a degenerate range always yields `min`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    fn validate(&self, name: &str) -> EffectResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(EffectError::InvalidConfig(format!(
                "{name} range [{}, {}) is inverted or not finite",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Sinusoidal path of one aurora blob.
///
/// Center on each axis is `size * (base + amplitude * sin(now * frequency + phase))`
/// with `now` in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobPath {
    /// Resting center as a fraction of the surface (x, y).
    pub base: [f32; 2],
    /// Swing as a fraction of the surface (x, y).
    pub amplitude: [f32; 2],
    /// Angular frequency in radians per millisecond (x, y).
    pub frequency: [f32; 2],
    /// Phase offset in radians (x, y).
    pub phase: [f32; 2],
    /// Radius as a fraction of the shorter surface side.
    pub radius: f32,
}

/// Aurora backdrop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuroraConfig {
    /// Paint the aurora layer under the particles.
    pub enabled: bool,
    /// Blob paths, paired in order with the theme's aurora colors.
    pub blobs: Vec<BlobPath>,
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            blobs: vec![
                BlobPath {
                    base: [0.15, 0.10],
                    amplitude: [0.08, 0.06],
                    frequency: [0.000_11, 0.000_07],
                    phase: [0.0, 1.3],
                    radius: 0.60,
                },
                BlobPath {
                    base: [0.85, 0.90],
                    amplitude: [0.07, 0.09],
                    frequency: [0.000_09, 0.000_13],
                    phase: [2.1, 0.4],
                    radius: 0.50,
                },
                BlobPath {
                    base: [0.40, 0.75],
                    amplitude: [0.10, 0.05],
                    frequency: [0.000_06, 0.000_10],
                    phase: [4.2, 3.0],
                    radius: 0.35,
                },
            ],
        }
    }
}

/// Everything that shapes a particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Particle budget per surface width.
    pub density: DensityTiers,
    /// Maximum distance for a connection line.
    pub connection_distance: f32,
    /// Line opacity at distance zero.
    pub max_line_opacity: f32,
    /// Line stroke width.
    pub line_width: f32,
    /// Distance past the edge before a particle wraps.
    pub wrap_margin: f32,
    /// Velocity components are drawn from `[-max_speed, max_speed)`.
    pub max_speed: f32,
    /// Radius band for ordinary particles.
    pub radius: ValueRange,
    /// Radius band for hero particles.
    pub hero_radius: ValueRange,
    /// Fraction of particles that are heroes.
    pub hero_fraction: f32,
    /// Per-particle opacity band.
    pub opacity: ValueRange,
    /// Cap on the device pixel ratio.
    pub max_pixel_ratio: f32,
    /// Aurora backdrop.
    pub aurora: AuroraConfig,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density: DensityTiers::default(),
            connection_distance: CONNECTION_DISTANCE,
            max_line_opacity: MAX_LINE_OPACITY,
            line_width: LINE_WIDTH,
            wrap_margin: WRAP_MARGIN,
            max_speed: MAX_SPEED,
            radius: ValueRange::new(0.5, 2.0),
            hero_radius: ValueRange::new(2.0, 3.5),
            hero_fraction: HERO_FRACTION,
            opacity: ValueRange::new(0.1, 0.3),
            max_pixel_ratio: MAX_PIXEL_RATIO,
            aurora: AuroraConfig::default(),
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Parses a config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::InvalidConfig`] on parse or validation failure.
    pub fn from_toml_str(text: &str) -> EffectResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EffectError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::ConfigIo`] if the file cannot be read, otherwise
    /// the errors of [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> EffectResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EffectError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Same config with a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Same config with the aurora layer switched on or off.
    #[must_use]
    pub fn with_aurora(mut self, enabled: bool) -> Self {
        self.aurora.enabled = enabled;
        self
    }

    /// Checks ranges and thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> EffectResult<()> {
        let positive = [
            ("connection_distance", self.connection_distance),
            ("max_pixel_ratio", self.max_pixel_ratio),
            ("mobile_breakpoint", self.density.mobile_breakpoint),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(EffectError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("line_width", self.line_width),
            ("wrap_margin", self.wrap_margin),
            ("max_speed", self.max_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EffectError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        let unit = [
            ("max_line_opacity", self.max_line_opacity),
            ("hero_fraction", self.hero_fraction),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(EffectError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }

        self.radius.validate("radius")?;
        self.hero_radius.validate("hero_radius")?;
        self.opacity.validate("opacity")?;
        if !(self.opacity.min > 0.0 && self.opacity.min < self.opacity.max && self.opacity.max <= 1.0) {
            return Err(EffectError::InvalidConfig(format!(
                "opacity range [{}, {}) must be non-empty and lie in (0, 1]",
                self.opacity.min, self.opacity.max
            )));
        }
        if self.aurora.blobs.len() > 3 {
            return Err(EffectError::InvalidConfig(format!(
                "at most 3 aurora blobs are supported, got {}",
                self.aurora.blobs.len()
            )));
        }
        Ok(())
    }
}
