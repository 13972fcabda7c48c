//! # CHAINFX
//!
//! Ambient effects for the AgentChains landing page, hosted headlessly.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          CHAINFX STAGE                           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────┐  │
//! │  │  chainfx_effects │   │    chainfx_ui    │   │   chainfx    │  │
//! │  │                  │   │                  │   │              │  │
//! │  │  • ParticleField │   │  • Counter       │<──│  • Stage     │  │
//! │  │  • Aurora        │<──│  • Draw commands │   │  • FrameLoop │  │
//! │  │  • FramePump     │   │  • Platform seam │   │  • Landing   │  │
//! │  └──────────────────┘   └──────────────────┘   └──────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `stage`: mounts effects, routes resize/scroll/preference signals
//! - `frame_loop`: explicit frame loop with a cancellation flag
//! - `landing`: the landing page preset and its TOML file

#![deny(unsafe_code)]

pub mod frame_loop;
pub mod landing;
pub mod stage;

pub use chainfx_effects as effects;
pub use chainfx_ui as ui;

pub use frame_loop::{
    CancelHandle, FrameClock, FrameLoop, IntervalClock, LoopControl, LoopSummary, ManualClock,
};
pub use landing::{LandingConfig, StatEntry};
pub use stage::{FrameReport, PageHost, Stage, StatView, STAT_ROW_HEIGHT};
