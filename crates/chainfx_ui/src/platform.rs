//! Platform capabilities as injectable traits.
//!
//! A browser answers these through `matchMedia`, `devicePixelRatio`,
//! `IntersectionObserver`, resize events, and `requestAnimationFrame`. Effects
//! only ever see the traits, so hosts and tests can supply their own.

use crate::layout::Rect;

/// Handle of a requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Handle of a registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Identifies an element that can be observed for visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Handle of a registered visibility observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

/// Per-frame callback scheduling.
///
/// A requested frame fires once, on the next display refresh. Cancelling a
/// handle that already fired or was already cancelled is a no-op.
pub trait FrameScheduler {
    /// Requests one callback on the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a pending callback.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Window-level resize notifications.
///
/// Removing a listener that is not registered is a no-op.
pub trait ResizeEvents {
    /// Registers a listener.
    fn add_resize_listener(&mut self) -> ListenerId;

    /// Deregisters a listener.
    fn remove_resize_listener(&mut self, id: ListenerId);
}

/// The platform's reduced-motion accessibility preference.
pub trait MotionPreferenceProvider {
    /// True when the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;
}

/// Device pixel density.
pub trait DisplayScaleProvider {
    /// Device pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f32;
}

/// Viewport intersection observation.
///
/// Disconnecting an unknown or already-disconnected observer is a no-op.
pub trait VisibilityObserver {
    /// Starts observing `element`; reports are delivered whenever its visible
    /// fraction crosses `threshold`.
    fn observe(&mut self, element: ElementId, threshold: f32) -> ObserverId;

    /// Stops an observation.
    fn disconnect(&mut self, id: ObserverId);
}

/// A single intersection report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// The observed element.
    pub target: ElementId,
    /// Visible fraction of the element's area, in `[0, 1]`.
    pub intersection_ratio: f32,
    /// True when any part of the element is visible.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Computes the report for `element` against `viewport`.
    #[must_use]
    pub fn from_rects(target: ElementId, element: Rect, viewport: Rect) -> Self {
        let area = element.area();
        let overlap = element.overlap_area(&viewport);
        let intersection_ratio = if area > 0.0 {
            (overlap / area).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            target,
            intersection_ratio,
            is_intersecting: overlap > 0.0,
        }
    }
}

/// Fixed answers for hosts without live platform signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticPreferences {
    /// Reduced-motion preference.
    pub reduced_motion: bool,
    /// Device pixel ratio.
    pub device_pixel_ratio: f32,
}

impl Default for StaticPreferences {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            device_pixel_ratio: 1.0,
        }
    }
}

impl MotionPreferenceProvider for StaticPreferences {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

impl DisplayScaleProvider for StaticPreferences {
    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_ratio() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let element = Rect::new(0.0, 700.0, 200.0, 200.0);
        let entry = IntersectionEntry::from_rects(ElementId(1), element, viewport);
        assert!((entry.intersection_ratio - 0.5).abs() < 1e-6);
        assert!(entry.is_intersecting);

        let below = Rect::new(0.0, 900.0, 200.0, 200.0);
        let entry = IntersectionEntry::from_rects(ElementId(1), below, viewport);
        assert!(entry.intersection_ratio.abs() < f32::EPSILON);
        assert!(!entry.is_intersecting);
    }
}
