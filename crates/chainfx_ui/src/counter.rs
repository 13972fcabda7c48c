//! Visibility-gated animated counter.
//!
//! ```text
//! NotStarted ──(visible ≥ threshold, or mount without gating)──▶ Counting
//! Counting   ──(progress reaches 1)─────────────────────────────▶ Settled
//! ```
//!
//! Both transitions happen once. `Settled` is terminal; a remount builds a
//! fresh counter.

use serde::{Deserialize, Serialize};

use crate::animation::Easing;
use crate::error::{EffectError, EffectResult};
use crate::platform::{
    ElementId, FrameHandle, FrameScheduler, IntersectionEntry, ObserverId, VisibilityObserver,
};

/// Default counting duration in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 2000.0;

/// Default visible fraction that starts the count.
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.3;

/// A validated counter target: a finite, non-negative integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CounterTarget(u64);

impl CounterTarget {
    /// Target value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CounterTarget {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for CounterTarget {
    type Error = EffectError;

    fn try_from(value: i64) -> EffectResult<Self> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| EffectError::InvalidCounterTarget(value.to_string()))
    }
}

impl TryFrom<f64> for CounterTarget {
    type Error = EffectError;

    fn try_from(value: f64) -> EffectResult<Self> {
        // 2^53: beyond this f64 no longer represents every integer
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > MAX_EXACT {
            return Err(EffectError::InvalidCounterTarget(value.to_string()));
        }
        Ok(Self(value as u64))
    }
}

const fn default_duration() -> f64 {
    DEFAULT_DURATION_MS
}

const fn default_start_on_view() -> bool {
    true
}

const fn default_threshold() -> f32 {
    DEFAULT_VISIBILITY_THRESHOLD
}

/// Configuration for one counting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Value the counter ends on. Validated at construction.
    pub target: i64,
    /// Counting duration in milliseconds.
    #[serde(default = "default_duration")]
    pub duration_ms: f64,
    /// Wait for the element to scroll into view before counting.
    #[serde(default = "default_start_on_view")]
    pub start_on_view: bool,
    /// Visible fraction that counts as "in view".
    #[serde(default = "default_threshold")]
    pub visibility_threshold: f32,
    /// Easing curve.
    #[serde(default)]
    pub easing: Easing,
}

impl CounterConfig {
    /// Config with the default duration, gated on visibility.
    #[must_use]
    pub fn new(target: i64) -> Self {
        Self {
            target,
            duration_ms: DEFAULT_DURATION_MS,
            start_on_view: true,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            easing: Easing::CubicOut,
        }
    }

    /// Overrides the duration.
    #[must_use]
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Overrides visibility gating.
    #[must_use]
    pub fn with_start_on_view(mut self, start_on_view: bool) -> Self {
        self.start_on_view = start_on_view;
        self
    }
}

/// Counter lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CounterPhase {
    /// Waiting for visibility (or for mount).
    NotStarted,
    /// Counting since `start_time` (milliseconds).
    Counting {
        /// Timestamp captured when counting began.
        start_time: f64,
    },
    /// Frozen at the target.
    Settled,
}

/// Integer that animates from 0 to its target once.
#[derive(Debug, Clone)]
pub struct AnimatedCounter {
    target: u64,
    duration_ms: f64,
    start_on_view: bool,
    threshold: f32,
    easing: Easing,
    phase: CounterPhase,
    value: u64,
    element: Option<ElementId>,
    observer: Option<ObserverId>,
    pending_frame: Option<FrameHandle>,
}

impl AnimatedCounter {
    /// Builds a counter from a config.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::InvalidCounterTarget`] for a negative target and
    /// [`EffectError::InvalidDuration`] for a duration that is not a finite
    /// positive number.
    pub fn new(config: &CounterConfig) -> EffectResult<Self> {
        let target = CounterTarget::try_from(config.target)?;
        Self::with_target(target, config)
    }

    /// Builds a counter with an already validated target, taking the timing
    /// settings from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::InvalidDuration`] for a bad duration and
    /// [`EffectError::InvalidConfig`] for a threshold outside `[0, 1]`.
    pub fn with_target(target: CounterTarget, config: &CounterConfig) -> EffectResult<Self> {
        if !config.duration_ms.is_finite() || config.duration_ms <= 0.0 {
            return Err(EffectError::InvalidDuration(config.duration_ms));
        }
        if !(0.0..=1.0).contains(&config.visibility_threshold) {
            return Err(EffectError::InvalidConfig(format!(
                "visibility threshold {} outside [0, 1]",
                config.visibility_threshold
            )));
        }

        Ok(Self {
            target: target.get(),
            duration_ms: config.duration_ms,
            start_on_view: config.start_on_view,
            threshold: config.visibility_threshold,
            easing: config.easing,
            phase: CounterPhase::NotStarted,
            value: 0,
            element: None,
            observer: None,
            pending_frame: None,
        })
    }

    /// Target value.
    #[must_use]
    pub fn target(&self) -> u64 {
        self.target
    }

    /// Currently displayed value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CounterPhase {
        self.phase
    }

    /// True once counting has begun. Never reverts.
    #[must_use]
    pub fn has_started(&self) -> bool {
        !matches!(self.phase, CounterPhase::NotStarted)
    }

    /// True once the value is frozen at the target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, CounterPhase::Settled)
    }

    /// Frame this counter is waiting for, if any.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// True while a visibility observation is registered.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    /// Mounts the counter. Without visibility gating counting starts at `now`.
    pub fn mount<S: FrameScheduler + ?Sized>(&mut self, now: f64, scheduler: &mut S) {
        if !self.start_on_view {
            self.begin(now, scheduler);
        }
    }

    /// Registers the one-shot visibility observation on `element`.
    ///
    /// Ignored when gating is disabled, when already observing, or when the
    /// counter has started.
    pub fn observe<V: VisibilityObserver + ?Sized>(&mut self, observer: &mut V, element: ElementId) {
        if !self.start_on_view || self.observer.is_some() || self.has_started() {
            return;
        }
        self.element = Some(element);
        self.observer = Some(observer.observe(element, self.threshold));
    }

    /// Feeds a visibility report. Returns true if it started the count.
    ///
    /// The first report at or above the threshold starts counting at `now`
    /// and disconnects the observer; every later report is ignored.
    pub fn on_intersection<V, S>(
        &mut self,
        entry: IntersectionEntry,
        now: f64,
        observer: &mut V,
        scheduler: &mut S,
    ) -> bool
    where
        V: VisibilityObserver + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        let Some(id) = self.observer else {
            return false;
        };
        if self.element != Some(entry.target) || self.has_started() {
            return false;
        }
        if !entry.is_intersecting || entry.intersection_ratio < self.threshold {
            return false;
        }

        observer.disconnect(id);
        self.observer = None;
        self.begin(now, scheduler);
        true
    }

    /// Runs the frame callback for `handle`. Stale handles are ignored.
    pub fn on_frame<S: FrameScheduler + ?Sized>(
        &mut self,
        handle: FrameHandle,
        now: f64,
        scheduler: &mut S,
    ) -> u64 {
        if self.pending_frame != Some(handle) {
            return self.value;
        }
        self.pending_frame = None;
        self.advance(now, scheduler)
    }

    /// Advances the count to `now` and schedules the next frame while
    /// progress is below 1.
    ///
    /// A frame still pending from an earlier request is cancelled first, so
    /// the counter never holds more than one.
    pub fn tick<S: FrameScheduler + ?Sized>(&mut self, now: f64, scheduler: &mut S) -> u64 {
        if let Some(handle) = self.pending_frame.take() {
            scheduler.cancel_frame(handle);
        }
        self.advance(now, scheduler)
    }

    fn advance<S: FrameScheduler + ?Sized>(&mut self, now: f64, scheduler: &mut S) -> u64 {
        let CounterPhase::Counting { start_time } = self.phase else {
            return self.value;
        };

        let elapsed = (now - start_time).max(0.0);
        let progress = (elapsed / self.duration_ms).min(1.0);
        let eased = self.easing.apply(progress);
        let next = ((eased * self.target as f64).round() as u64).min(self.target);
        // Timestamps can arrive out of order; the value never goes down
        self.value = self.value.max(next);

        if progress < 1.0 {
            self.pending_frame = Some(scheduler.request_frame());
        } else {
            self.value = self.target;
            self.phase = CounterPhase::Settled;
            tracing::debug!(goal = self.target, "counter settled");
        }

        self.value
    }

    /// Tears the counter down: disconnects any observer and cancels any
    /// pending frame.
    pub fn unmount<V, S>(&mut self, observer: &mut V, scheduler: &mut S)
    where
        V: VisibilityObserver + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if let Some(id) = self.observer.take() {
            observer.disconnect(id);
        }
        if let Some(handle) = self.pending_frame.take() {
            scheduler.cancel_frame(handle);
        }
    }

    fn begin<S: FrameScheduler + ?Sized>(&mut self, now: f64, scheduler: &mut S) {
        if self.has_started() {
            return;
        }
        tracing::debug!(goal = self.target, start_time = now, "counter started");
        self.phase = CounterPhase::Counting { start_time: now };
        self.pending_frame = Some(scheduler.request_frame());
    }
}
