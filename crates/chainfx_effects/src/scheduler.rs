//! Headless frame scheduler.
//!
//! Behaves like `requestAnimationFrame`: a frame requested while frame N runs
//! fires in frame N+1, once. The host calls [`FramePump::begin_frame`] per
//! display refresh and dispatches the fired handles.

use std::collections::BTreeSet;

use chainfx_ui::{FrameHandle, FrameScheduler};

/// Pending frame callbacks for one page.
#[derive(Debug, Default)]
pub struct FramePump {
    next_handle: u64,
    pending: BTreeSet<FrameHandle>,
}

impl FramePump {
    /// Creates an empty pump.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a frame: returns every handle due now, in request order.
    ///
    /// Requests made while dispatching these handles land in the next frame.
    pub fn begin_frame(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Number of callbacks waiting for the next frame.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// True if `handle` is still waiting.
    #[must_use]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }
}

impl FrameScheduler for FramePump {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        self.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.remove(&handle);
    }
}
