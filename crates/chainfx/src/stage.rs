//! # Stage
//!
//! The page the effects live on. Owns the frame pump and the registry of
//! resize listeners and visibility observations, and routes every platform
//! signal to the mounted effects:
//!
//! ```text
//! ┌──────────────┐  resize / scroll / prefs   ┌─────────────────────┐
//! │    Stage     │ ─────────────────────────> │ ParticleField       │
//! │              │                            │ StatCounter × N     │
//! │  FramePump   │ <── request / cancel ───── │                     │
//! │  PageHost    │ <── listen / observe ───── │                     │
//! └──────────────┘                            └─────────────────────┘
//! ```
//!
//! After [`Stage::unmount`] the pump has nothing pending and the host has
//! nothing registered.

use std::collections::{BTreeMap, BTreeSet};

use chainfx_effects::{FieldStats, FramePump, ParticleField};
use chainfx_ui::{
    AnimatedCounter, Canvas, CounterFormat, CounterPhase, ElementId, EffectResult,
    IntersectionEntry, ListenerId, ObserverId, Rect, ResizeEvents, Size, StaticPreferences,
    VisibilityObserver,
};

use crate::landing::LandingConfig;

/// Height of the stat row in logical pixels.
pub const STAT_ROW_HEIGHT: f32 = 160.0;

/// Resize listeners and visibility observations registered on the page.
#[derive(Debug, Default)]
pub struct PageHost {
    next_id: u64,
    listeners: BTreeSet<ListenerId>,
    observations: BTreeMap<ObserverId, (ElementId, f32)>,
}

impl PageHost {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered resize listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Live visibility observations.
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// True if `element` is observed.
    #[must_use]
    pub fn is_observed(&self, element: ElementId) -> bool {
        self.observations.values().any(|(e, _)| *e == element)
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl ResizeEvents for PageHost {
    fn add_resize_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next());
        self.listeners.insert(id);
        id
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

impl VisibilityObserver for PageHost {
    fn observe(&mut self, element: ElementId, threshold: f32) -> ObserverId {
        let id = ObserverId(self.next());
        self.observations.insert(id, (element, threshold));
        id
    }

    fn disconnect(&mut self, id: ObserverId) {
        self.observations.remove(&id);
    }
}

enum StatValue {
    Animated {
        counter: AnimatedCounter,
        /// Unstarted copy every mount starts from.
        fresh: AnimatedCounter,
        format: CounterFormat,
    },
    Fixed(String),
}

/// One stat of the row, placed on the page.
struct StatSlot {
    label: String,
    element: ElementId,
    rect: Rect,
    value: StatValue,
}

/// What a stat currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatView {
    /// Caption.
    pub label: String,
    /// Formatted value.
    pub display: String,
    /// False while an animated stat is still counting or waiting.
    pub settled: bool,
}

/// What one pumped frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Callbacks that fired this frame.
    pub callbacks: usize,
    /// Field stats after the frame.
    pub field: FieldStats,
}

/// The landing page: a hero particle field above a row of stat counters.
pub struct Stage<C: Canvas> {
    pump: FramePump,
    host: PageHost,
    prefs: StaticPreferences,
    viewport: Rect,
    field: ParticleField<C>,
    stats: Vec<StatSlot>,
    mounted: bool,
}

impl<C: Canvas> Stage<C> {
    /// Builds an unmounted stage for a viewport of `viewport` size.
    ///
    /// The hero fills the first screen; the stat row sits right below it.
    ///
    /// # Errors
    ///
    /// Returns the field, theme or counter validation error.
    pub fn new(
        canvas: C,
        config: &LandingConfig,
        viewport: Size,
        prefs: StaticPreferences,
    ) -> EffectResult<Self> {
        config.validate()?;
        let field = ParticleField::new(canvas, config.field.clone(), config.theme.clone())?;

        let mut stats = Vec::with_capacity(config.stats.len());
        for (i, entry) in config.stats.iter().enumerate() {
            let value = match (&entry.counter, &entry.text) {
                (Some(counter), _) => {
                    let fresh = AnimatedCounter::new(counter)?;
                    StatValue::Animated {
                        counter: fresh.clone(),
                        fresh,
                        format: entry.format.clone(),
                    }
                }
                (None, text) => StatValue::Fixed(text.clone().unwrap_or_default()),
            };
            stats.push(StatSlot {
                label: entry.label.clone(),
                element: ElementId(i as u64 + 1),
                rect: Rect::default(),
                value,
            });
        }

        let mut stage = Self {
            pump: FramePump::new(),
            host: PageHost::new(),
            prefs,
            viewport: viewport.to_rect(),
            field,
            stats,
            mounted: false,
        };
        stage.layout();
        Ok(stage)
    }

    /// Mounts every effect at `now` and delivers the initial visibility
    /// report, like an observer's first callback.
    ///
    /// Each mount gets unstarted counters, so a page mounted again after
    /// [`Self::unmount`] counts from zero.
    pub fn mount(&mut self, now: f64) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        let size = self.viewport_size();
        self.field
            .mount(size, &self.prefs, &self.prefs, &mut self.host, &mut self.pump);

        for slot in &mut self.stats {
            if let StatValue::Animated { counter, fresh, .. } = &mut slot.value {
                *counter = fresh.clone();
                counter.mount(now, &mut self.pump);
                counter.observe(&mut self.host, slot.element);
            }
        }

        tracing::info!(
            width = size.width,
            height = size.height,
            stats = self.stats.len(),
            reduced_motion = self.prefs.reduced_motion,
            "stage mounted"
        );
        self.report_visibility(now);
    }

    /// Runs one display frame: every due callback fires once, in request
    /// order, and may request the next frame.
    pub fn frame(&mut self, now: f64) -> FrameReport {
        let handles = self.pump.begin_frame();
        for &handle in &handles {
            self.field.on_frame(handle, now, &mut self.pump);
            for slot in &mut self.stats {
                if let StatValue::Animated { counter, .. } = &mut slot.value {
                    counter.on_frame(handle, now, &mut self.pump);
                }
            }
        }
        tracing::trace!(now, callbacks = handles.len(), "stage frame");
        FrameReport {
            callbacks: handles.len(),
            field: self.field.stats(),
        }
    }

    /// Scrolls the viewport so its top edge is at `offset_y`.
    pub fn scroll_to(&mut self, offset_y: f32, now: f64) {
        self.viewport.y = offset_y.max(0.0);
        if self.mounted {
            self.report_visibility(now);
        }
    }

    /// Scrolls the stat row fully into view.
    pub fn scroll_to_stats(&mut self, now: f64) {
        let row_top = self.stats.first().map_or(0.0, |slot| slot.rect.y);
        let offset = row_top + STAT_ROW_HEIGHT - self.viewport.height;
        self.scroll_to(offset, now);
    }

    /// The browser window changed size.
    ///
    /// The viewport and the stat row always follow. The field only hears
    /// about it through its resize listener.
    pub fn resize(&mut self, size: Size, now: f64) {
        self.viewport.width = size.width;
        self.viewport.height = size.height;
        self.layout();

        if self.host.listener_count() > 0 {
            self.field.resize(size, &self.prefs, &mut self.pump);
        } else {
            tracing::debug!(width = size.width, height = size.height, "resize with no field listener");
        }
        if self.mounted {
            self.report_visibility(now);
        }
    }

    /// The reduced-motion preference changed.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.prefs.reduced_motion = reduced;
        self.field.set_reduced_motion(reduced, &self.prefs, &mut self.pump);
    }

    /// The device pixel ratio changed (window moved to another display).
    pub fn set_device_pixel_ratio(&mut self, ratio: f32) {
        self.prefs.device_pixel_ratio = ratio;
        if self.mounted {
            let size = self.field.size();
            self.field.resize(size, &self.prefs, &mut self.pump);
        }
    }

    /// Tears every effect down. Safe to call twice.
    pub fn unmount(&mut self) {
        self.field.unmount(&mut self.host, &mut self.pump);
        for slot in &mut self.stats {
            if let StatValue::Animated { counter, .. } = &mut slot.value {
                counter.unmount(&mut self.host, &mut self.pump);
            }
        }
        if self.mounted {
            tracing::info!(frames = self.field.stats().frames_rendered, "stage unmounted");
        }
        self.mounted = false;
    }

    /// Current stat row.
    #[must_use]
    pub fn stats(&self) -> Vec<StatView> {
        self.stats
            .iter()
            .map(|slot| match &slot.value {
                StatValue::Animated { counter, format, .. } => StatView {
                    label: slot.label.clone(),
                    display: format.format(counter.value()),
                    settled: counter.is_settled(),
                },
                StatValue::Fixed(text) => StatView {
                    label: slot.label.clone(),
                    display: text.clone(),
                    settled: true,
                },
            })
            .collect()
    }

    /// Phase of the animated stat labelled `label`.
    #[must_use]
    pub fn counter_phase(&self, label: &str) -> Option<CounterPhase> {
        self.stats.iter().find(|s| s.label == label).and_then(|s| match &s.value {
            StatValue::Animated { counter, .. } => Some(counter.phase()),
            StatValue::Fixed(_) => None,
        })
    }

    /// True once nothing is pending and every stat has settled.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pump.pending_count() == 0 && self.stats().iter().all(|s| s.settled)
    }

    /// The particle field.
    #[must_use]
    pub fn field(&self) -> &ParticleField<C> {
        &self.field
    }

    /// The frame pump.
    #[must_use]
    pub fn pump(&self) -> &FramePump {
        &self.pump
    }

    /// The listener/observer registry.
    #[must_use]
    pub fn host(&self) -> &PageHost {
        &self.host
    }

    /// Current viewport in page coordinates.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// True while mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn viewport_size(&self) -> Size {
        Size::new(self.viewport.width, self.viewport.height)
    }

    /// Hero takes the first screen; stats split the row below it evenly.
    fn layout(&mut self) {
        let count = self.stats.len().max(1) as f32;
        let width = self.viewport.width / count;
        let top = self.viewport.height;
        for (i, slot) in self.stats.iter_mut().enumerate() {
            slot.rect = Rect::new(i as f32 * width, top, width, STAT_ROW_HEIGHT);
        }
    }

    fn report_visibility(&mut self, now: f64) {
        let viewport = self.viewport;
        for slot in &mut self.stats {
            if !self.host.is_observed(slot.element) {
                continue;
            }
            let entry = IntersectionEntry::from_rects(slot.element, slot.rect, viewport);
            if let StatValue::Animated { counter, .. } = &mut slot.value {
                if counter.on_intersection(entry, now, &mut self.host, &mut self.pump) {
                    tracing::debug!(label = %slot.label, ratio = entry.intersection_ratio, "stat in view");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainfx_ui::HeadlessCanvas;

    fn stage() -> Stage<HeadlessCanvas> {
        let mut config = LandingConfig::default();
        config.field.seed = Some(11);
        Stage::new(
            HeadlessCanvas::new(),
            &config,
            Size::new(1280.0, 720.0),
            StaticPreferences::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_page_host_registry() {
        let mut host = PageHost::new();
        let listener = host.add_resize_listener();
        let observer = host.observe(ElementId(3), 0.3);
        assert_eq!(host.listener_count(), 1);
        assert!(host.is_observed(ElementId(3)));

        host.remove_resize_listener(listener);
        host.disconnect(observer);
        host.disconnect(observer);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.observation_count(), 0);
    }

    #[test]
    fn test_stats_below_the_fold_wait() {
        let mut stage = stage();
        stage.mount(0.0);
        assert_eq!(stage.host().observation_count(), 3);
        for frame in 0..10 {
            stage.frame(f64::from(frame) * 16.0);
        }
        assert_eq!(stage.counter_phase("Tests Passing"), Some(CounterPhase::NotStarted));
        assert_eq!(stage.stats()[1].display, "0+");
        assert_eq!(stage.stats()[3].display, "<100ms");
    }

    #[test]
    fn test_scroll_starts_counters() {
        let mut stage = stage();
        stage.mount(0.0);
        stage.scroll_to_stats(100.0);
        assert_eq!(stage.host().observation_count(), 0);

        let mut now = 100.0;
        while now <= 2_200.0 {
            stage.frame(now);
            now += 16.0;
        }
        let displays: Vec<_> = stage.stats().into_iter().map(|s| s.display).collect();
        assert_eq!(displays, ["82", "2,745+", "5", "<100ms"]);
    }

    #[test]
    fn test_resize_relayouts_stats() {
        let mut stage = stage();
        stage.mount(0.0);
        stage.resize(Size::new(600.0, 900.0), 50.0);
        assert_eq!(stage.field().particles().len(), 25);
        assert_eq!(stage.pump().pending_count(), 1);
        assert!((stage.viewport().width - 600.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unmount_leaves_nothing_registered() {
        let mut stage = stage();
        stage.mount(0.0);
        stage.frame(16.0);
        stage.unmount();
        assert_eq!(stage.pump().pending_count(), 0);
        assert_eq!(stage.host().listener_count(), 0);
        assert_eq!(stage.host().observation_count(), 0);
        stage.unmount();
        assert!(!stage.is_mounted());
    }
}
