//! # CHAINFX UI Primitives
//!
//! Everything the ambient effects share:
//! - Colors and weighted palettes (`style`)
//! - Logical-pixel geometry (`layout`)
//! - Easing curves (`animation`)
//! - Draw commands and the drawing-context seam (`render`)
//! - Platform capabilities as injectable traits (`platform`)
//! - The visibility-gated `AnimatedCounter` (`counter`) and its display
//!   formatting (`format`)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      EFFECT PIPELINE                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  Platform signals → Effect state → DrawCommands → Context │
//! │   (traits)            (tick)        (per frame)   (host)  │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![deny(unsafe_code)]

pub mod animation;
pub mod counter;
pub mod error;
pub mod format;
pub mod layout;
pub mod platform;
pub mod render;
pub mod style;

pub use animation::Easing;
pub use counter::{AnimatedCounter, CounterConfig, CounterPhase, CounterTarget};
pub use error::{EffectError, EffectResult};
pub use format::CounterFormat;
pub use layout::{Point, Rect, Size};
pub use platform::{
    DisplayScaleProvider, ElementId, FrameHandle, FrameScheduler, IntersectionEntry,
    ListenerId, MotionPreferenceProvider, ObserverId, ResizeEvents, StaticPreferences,
    VisibilityObserver,
};
pub use render::{BackingStore, Canvas, DrawCommand, DrawContext, FrameRecorder, HeadlessCanvas};
pub use style::{Color, EffectTheme, WeightedColor};
