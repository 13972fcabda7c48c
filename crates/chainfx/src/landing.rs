//! Landing page preset: the particle field, its theme and the stat row.
//!
//! ```toml
//! [field]
//! connection_distance = 150.0
//!
//! [[stats]]
//! label = "Tests Passing"
//! counter = { target = 2745 }
//! format = { suffix = "+" }
//!
//! [[stats]]
//! label = "Delivery Latency"
//! text = "<100ms"
//! ```

use std::path::Path;

use chainfx_effects::FieldConfig;
use chainfx_ui::{CounterConfig, CounterFormat, CounterTarget, EffectError, EffectResult, EffectTheme};
use serde::{Deserialize, Serialize};

/// One entry of the stat row.
///
/// Either animated (`counter`) or fixed text (`text`), never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    /// Caption under the number.
    pub label: String,
    /// Counting settings for an animated stat.
    #[serde(default)]
    pub counter: Option<CounterConfig>,
    /// Display formatting for an animated stat.
    #[serde(default)]
    pub format: CounterFormat,
    /// Fixed display text for a stat that does not count.
    #[serde(default)]
    pub text: Option<String>,
}

impl StatEntry {
    /// Animated stat.
    #[must_use]
    pub fn counter(label: impl Into<String>, target: i64, format: CounterFormat) -> Self {
        Self {
            label: label.into(),
            counter: Some(CounterConfig::new(target)),
            format,
            text: None,
        }
    }

    /// Fixed-text stat.
    #[must_use]
    pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            counter: None,
            format: CounterFormat::default(),
            text: Some(text.into()),
        }
    }

    fn validate(&self) -> EffectResult<()> {
        match (&self.counter, &self.text) {
            (Some(counter), None) => {
                CounterTarget::try_from(counter.target)?;
                Ok(())
            }
            (None, Some(_)) => Ok(()),
            _ => Err(EffectError::InvalidConfig(format!(
                "stat `{}` needs exactly one of `counter` or `text`",
                self.label
            ))),
        }
    }
}

fn default_stats() -> Vec<StatEntry> {
    vec![
        StatEntry::counter("API Endpoints", 82, CounterFormat::default()),
        StatEntry::counter("Tests Passing", 2745, CounterFormat::with_suffix("+")),
        StatEntry::counter("Pre-Built Agents", 5, CounterFormat::default()),
        StatEntry::text("Delivery Latency", "<100ms"),
    ]
}

/// Full landing page effects config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingConfig {
    /// Hero particle field.
    #[serde(default)]
    pub field: FieldConfig,
    /// Colors.
    #[serde(default)]
    pub theme: EffectTheme,
    /// Social proof stats, left to right.
    #[serde(default = "default_stats")]
    pub stats: Vec<StatEntry>,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            theme: EffectTheme::default(),
            stats: default_stats(),
        }
    }
}

impl LandingConfig {
    /// Parses and validates a landing config.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::InvalidConfig`] on parse or validation failure,
    /// or [`EffectError::InvalidCounterTarget`] for a bad stat target.
    pub fn from_toml_str(text: &str) -> EffectResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EffectError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a landing config file.
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
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), stats = config.stats.len(), "landing config loaded");
        Ok(config)
    }

    /// Validates the field, the theme and every stat.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> EffectResult<()> {
        self.field.validate()?;
        self.theme.validate()?;
        for stat in &self.stats {
            stat.validate()?;
        }
        Ok(())
    }
}
