//! Colors and the effect theme.
//!
//! Dark page, white particles with cyan and violet tints, soft aurora accents.

use serde::{Deserialize, Serialize};

use crate::error::{EffectError, EffectResult};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    #[serde(default = "opaque")]
    pub a: f32,
}

const fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Accent cyan (#00e5ff).
    pub const ACCENT_CYAN: Self = Self::rgb(0.0, 229.0 / 255.0, 1.0);
    /// Accent violet (#7c3aed).
    pub const ACCENT_VIOLET: Self = Self::rgb(124.0 / 255.0, 58.0 / 255.0, 237.0 / 255.0);
    /// Accent coral (#ff3366).
    pub const ACCENT_CORAL: Self = Self::rgb(1.0, 51.0 / 255.0, 102.0 / 255.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates an opaque color from an 8-bit RGB triple.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A palette entry with a relative pick weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedColor {
    /// The color (alpha is ignored; particles carry their own opacity).
    pub color: Color,
    /// Relative weight, must be positive.
    pub weight: u32,
}

impl WeightedColor {
    /// Creates a palette entry.
    #[must_use]
    pub const fn new(color: Color, weight: u32) -> Self {
        Self { color, weight }
    }
}

/// Colors used by the ambient effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTheme {
    /// Weighted palette particles pick from.
    pub particle_palette: Vec<WeightedColor>,
    /// Color of connection lines (alpha is replaced per line).
    pub line_color: Color,
    /// Aurora blob colors with their peak alpha.
    pub aurora: Vec<Color>,
}

impl Default for EffectTheme {
    fn default() -> Self {
        Self::agentchains()
    }
}

impl EffectTheme {
    /// The landing page theme: mostly white specks, some cyan and violet.
    #[must_use]
    pub fn agentchains() -> Self {
        Self {
            particle_palette: vec![
                WeightedColor::new(Color::WHITE, 3),
                WeightedColor::new(Color::ACCENT_CYAN, 1),
                WeightedColor::new(Color::ACCENT_VIOLET, 1),
            ],
            line_color: Color::WHITE,
            aurora: vec![
                Color::ACCENT_CYAN.with_alpha(0.12),
                Color::ACCENT_VIOLET.with_alpha(0.14),
                Color::ACCENT_CORAL.with_alpha(0.10),
            ],
        }
    }

    /// Sum of all palette weights.
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        self.particle_palette
            .iter()
            .fold(0u32, |total, c| total.saturating_add(c.weight))
    }

    /// Maps a roll in `0..total_weight()` to a palette index.
    ///
    /// Rolls past the end land on the last entry.
    #[must_use]
    pub fn pick(&self, roll: u32) -> usize {
        let mut remaining = roll;
        for (index, entry) in self.particle_palette.iter().enumerate() {
            if remaining < entry.weight {
                return index;
            }
            remaining -= entry.weight;
        }
        self.particle_palette.len().saturating_sub(1)
    }

    /// Palette color at `index`, white when out of range.
    #[must_use]
    pub fn particle_color(&self, index: u32) -> Color {
        self.particle_palette
            .get(index as usize)
            .map_or(Color::WHITE, |entry| entry.color)
    }

    /// Checks that the palette can be sampled.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::InvalidConfig`] for an empty palette, a
    /// zero-weight entry, weights whose sum overflows, or more than three
    /// aurora blobs.
    pub fn validate(&self) -> EffectResult<()> {
        if self.particle_palette.is_empty() {
            return Err(EffectError::InvalidConfig(
                "particle palette is empty".to_string(),
            ));
        }
        if let Some(entry) = self.particle_palette.iter().find(|c| c.weight == 0) {
            return Err(EffectError::InvalidConfig(format!(
                "palette entry {:?} has zero weight",
                entry.color
            )));
        }
        let total = self
            .particle_palette
            .iter()
            .try_fold(0u32, |total, c| total.checked_add(c.weight));
        if total.is_none() {
            return Err(EffectError::InvalidConfig(
                "palette weights overflow u32".to_string(),
            ));
        }
        if self.aurora.len() > 3 {
            return Err(EffectError::InvalidConfig(format!(
                "at most 3 aurora blobs are supported, got {}",
                self.aurora.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_follows_weights() {
        let theme = EffectTheme::agentchains();
        assert_eq!(theme.total_weight(), 5);
        assert_eq!(theme.pick(0), 0);
        assert_eq!(theme.pick(2), 0);
        assert_eq!(theme.pick(3), 1);
        assert_eq!(theme.pick(4), 2);
        assert_eq!(theme.pick(99), 2);
    }

    #[test]
    fn test_rgb8_matches_hex() {
        let cyan = Color::rgb8(0x00, 0xe5, 0xff);
        assert_eq!(cyan, Color::ACCENT_CYAN);
        assert!(cyan.r.abs() < f32::EPSILON);
        assert!((cyan.g - 229.0 / 255.0).abs() < 1e-6);
        assert!((cyan.b - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_rejects_empty_palette() {
        let theme = EffectTheme {
            particle_palette: Vec::new(),
            ..EffectTheme::default()
        };
        assert!(matches!(theme.validate(), Err(EffectError::InvalidConfig(_))));
        assert!(EffectTheme::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_weight_overflow() {
        let theme = EffectTheme {
            particle_palette: vec![
                WeightedColor::new(Color::WHITE, u32::MAX),
                WeightedColor::new(Color::ACCENT_CYAN, 1),
            ],
            ..EffectTheme::default()
        };
        assert!(matches!(theme.validate(), Err(EffectError::InvalidConfig(_))));
        assert_eq!(theme.total_weight(), u32::MAX);
    }
}
