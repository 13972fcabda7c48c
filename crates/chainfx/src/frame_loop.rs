//! # Frame Loop
//!
//! Drives a stage outside a browser:
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ 1. Cancellation flag set?  → stop                        │
//! │ 2. Frame limit reached?    → stop                        │
//! │ 3. Clock: wait for the next frame, read `now` (ms)       │
//! │ 4. Frame callback          → Continue / Stop             │
//! │ 5. Record timing, warn on frames over budget             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The flag is checked at the top of every iteration, so a cancel from
//! another thread or from inside the callback lands within one frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Callback time above which a frame is logged as slow.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Source of frame timestamps.
pub trait FrameClock {
    /// Blocks until the next frame is due and returns its timestamp in
    /// milliseconds since the clock started.
    fn next_frame(&mut self) -> f64;
}

/// Wall-clock pacing at a fixed frame rate.
#[derive(Debug)]
pub struct IntervalClock {
    started: Instant,
    interval: Duration,
    next_due: Instant,
}

impl IntervalClock {
    /// Clock ticking `fps` times per second. Zero is treated as 1.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        let interval = Duration::from_secs(1) / fps.max(1);
        let started = Instant::now();
        Self {
            started,
            interval,
            next_due: started,
        }
    }

    /// Time between frames.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameClock for IntervalClock {
    fn next_frame(&mut self) -> f64 {
        let now = Instant::now();
        if self.next_due > now {
            std::thread::sleep(self.next_due - now);
        }
        let due = self.next_due;
        self.next_due += self.interval;
        // Behind by more than a frame: skip ahead rather than burst
        let now = Instant::now();
        if self.next_due < now {
            self.next_due = now + self.interval;
        }
        due.duration_since(self.started).as_secs_f64() * 1000.0
    }
}

/// Deterministic clock: starts at `start` and advances by `step` per frame.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: f64,
    step: f64,
}

impl ManualClock {
    /// Clock whose first frame reads `start`.
    #[must_use]
    pub fn new(start: f64, step: f64) -> Self {
        Self { now: start, step }
    }

    /// 60 FPS starting at zero.
    #[must_use]
    pub fn sixty_fps() -> Self {
        Self::new(0.0, 1000.0 / 60.0)
    }
}

impl FrameClock for ManualClock {
    fn next_frame(&mut self) -> f64 {
        let now = self.now;
        self.now += self.step;
        now
    }
}

/// What the frame callback wants next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Run another frame.
    Continue,
    /// Stop after this frame.
    Stop,
}

/// Why a loop ended and how it went.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopSummary {
    /// Frames the callback ran.
    pub frames: u64,
    /// True if the cancellation flag ended the loop.
    pub cancelled: bool,
    /// Frames whose callback exceeded [`MAX_FRAME_TIME`].
    pub slow_frames: u64,
    /// Longest callback time in microseconds.
    pub max_frame_us: u64,
}

/// Shared cancellation flag for a running loop.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Asks the loop to stop before its next frame.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// True once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Explicit frame loop with a cancellation flag and an optional frame limit.
#[derive(Debug, Default)]
pub struct FrameLoop {
    cancel: CancelHandle,
    max_frames: Option<u64>,
}

impl FrameLoop {
    /// Unbounded loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after `frames` frames.
    #[must_use]
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Handle that cancels this loop; cloneable across threads.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Runs frames until the callback stops, the limit is hit, or the loop
    /// is cancelled.
    pub fn run<K, F>(&mut self, clock: &mut K, mut frame: F) -> LoopSummary
    where
        K: FrameClock + ?Sized,
        F: FnMut(f64) -> LoopControl,
    {
        let mut summary = LoopSummary::default();

        loop {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            if self.max_frames.is_some_and(|max| summary.frames >= max) {
                break;
            }

            let now = clock.next_frame();
            let started = Instant::now();
            let control = frame(now);
            let elapsed = started.elapsed();

            summary.frames += 1;
            let elapsed_us = elapsed.as_micros() as u64;
            summary.max_frame_us = summary.max_frame_us.max(elapsed_us);
            if elapsed > MAX_FRAME_TIME {
                summary.slow_frames += 1;
                tracing::warn!(
                    frame = summary.frames,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    budget_ms = TARGET_FRAME_TIME.as_secs_f64() * 1000.0,
                    "frame exceeded budget"
                );
            }

            if control == LoopControl::Stop {
                break;
            }
        }

        tracing::debug!(frames = summary.frames, cancelled = summary.cancelled, "frame loop ended");
        summary
    }
}
