//! # CHAINFX Effects
//!
//! The landing page's ambient particle field:
//! - `ParticleField` - drifting particles, proximity lines, resize and
//!   reduced-motion handling
//! - `AuroraLayer` - slow radial-gradient blobs under the particles
//! - `FramePump` - headless `requestAnimationFrame`
//! - `FieldConfig` - TOML-loadable tuning
//!
//! Nothing here talks to a platform directly. Sizes, pixel ratio, motion
//! preference, resize events, and frames all come in through the traits of
//! [`chainfx_ui::platform`].

#![deny(unsafe_code)]

pub mod aurora;
pub mod config;
pub mod constants;
pub mod field;
pub mod particle;
pub mod scheduler;

pub use aurora::{AuroraBlob, AuroraLayer};
pub use config::{AuroraConfig, BlobPath, DensityTier, DensityTiers, FieldConfig, ValueRange};
pub use field::{effective_pixel_ratio, FieldStats, ParticleField};
pub use particle::{connection_opacity, wrap_axis, Particle};
pub use scheduler::FramePump;
