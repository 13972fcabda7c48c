//! # Particle Field Defaults
//!
//! Values tuned for the landing page hero. Every one of them can be
//! overridden through [`crate::FieldConfig`].

// =============================================================================
// DENSITY
// =============================================================================

/// Surfaces narrower than this use the mobile particle count.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Particle count below the breakpoint.
pub const MOBILE_PARTICLE_COUNT: usize = 25;

/// Particle count at or above the breakpoint.
pub const DESKTOP_PARTICLE_COUNT: usize = 60;

// =============================================================================
// CONNECTIONS
// =============================================================================

/// Pairs closer than this (logical pixels) get a connection line.
pub const CONNECTION_DISTANCE: f32 = 150.0;

/// Line opacity at distance zero.
pub const MAX_LINE_OPACITY: f32 = 0.06;

/// Connection line stroke width.
pub const LINE_WIDTH: f32 = 0.5;

// =============================================================================
// MOTION & SHAPE
// =============================================================================

/// Off-surface margin a particle travels before wrapping.
pub const WRAP_MARGIN: f32 = 10.0;

/// Velocity components are drawn from `[-MAX_SPEED, MAX_SPEED)` px/frame.
pub const MAX_SPEED: f32 = 0.2;

/// Fraction of particles drawn from the larger radius band.
pub const HERO_FRACTION: f32 = 0.08;

// =============================================================================
// DISPLAY
// =============================================================================

/// Cap on the device pixel ratio used for the backing store.
pub const MAX_PIXEL_RATIO: f32 = 2.0;
