//! # Effect Error Types
//!
//! Only construction and configuration can fail. Rendering never returns an
//! error: a missing drawing context degrades to drawing nothing.

use thiserror::Error;

/// Errors raised while building effects or loading their configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    /// Counter target is negative, fractional, or not finite.
    #[error("invalid counter target: {0} (must be a finite non-negative integer)")]
    InvalidCounterTarget(String),

    /// Counter duration is zero, negative, or not finite.
    #[error("invalid counter duration: {0}ms (must be finite and positive)")]
    InvalidDuration(f64),

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be read.
    #[error("failed to read config {path}: {reason}")]
    ConfigIo {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },
}

/// Result type for effect construction and configuration.
pub type EffectResult<T> = Result<T, EffectError>;
