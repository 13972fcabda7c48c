//! Drawing seam between effects and whatever actually paints pixels.
//!
//! Effects emit [`DrawCommand`]s into a [`DrawContext`]. A [`Canvas`] hands
//! out that context, or `None` when no 2D context can be acquired, in which
//! case effects draw nothing.

use crate::layout::{Point, Rect};
use crate::style::Color;

/// Resolution of the backing store behind a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackingStore {
    /// Width in device pixels.
    pub pixel_width: u32,
    /// Height in device pixels.
    pub pixel_height: u32,
    /// Logical-to-device scale applied to every command.
    pub scale: f32,
}

/// A single drawing operation in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear an area to transparent.
    Clear {
        /// Area to clear.
        area: Rect,
    },
    /// Filled circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f32,
        /// Fill color (alpha included).
        color: Color,
    },
    /// Stroked line segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke color (alpha included).
        color: Color,
        /// Stroke width.
        width: f32,
    },
    /// Circle filled with a radial gradient from `inner` at the center to
    /// `outer` at `radius`.
    RadialGradient {
        /// Gradient center.
        center: Point,
        /// Gradient radius.
        radius: f32,
        /// Color at the center.
        inner: Color,
        /// Color at the rim.
        outer: Color,
    },
}

impl DrawCommand {
    /// Short name for logs and tallies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Clear { .. } => "clear",
            Self::Circle { .. } => "circle",
            Self::Line { .. } => "line",
            Self::RadialGradient { .. } => "radial_gradient",
        }
    }
}

/// A 2D drawing context.
pub trait DrawContext {
    /// Resizes the backing store and resets the transform to `scale`.
    fn resize_backing(&mut self, backing: BackingStore);

    /// Executes a drawing command.
    fn submit(&mut self, command: DrawCommand);
}

/// A drawing surface that may or may not provide a 2D context.
pub trait Canvas {
    /// Context type handed out by this canvas.
    type Context: DrawContext;

    /// Acquires the 2D context, `None` when unavailable.
    fn context_2d(&mut self) -> Option<&mut Self::Context>;
}

/// Draw context that records commands instead of painting.
///
/// Used headless and in tests to inspect exactly what an effect drew. A
/// `Clear` starts a new frame and drops everything recorded before it, so a
/// long-running page holds one frame of commands at most.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
    backing: Option<BackingStore>,
}

impl FrameRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(4096),
            backing: None,
        }
    }

    /// Commands of the current frame, or everything since the last
    /// [`Self::reset`] if nothing cleared.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands of the given kind.
    #[must_use]
    pub fn count(&self, kind: &str) -> usize {
        self.commands.iter().filter(|c| c.kind() == kind).count()
    }

    /// Commands recorded after the most recent clear (the current frame).
    #[must_use]
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear { .. }))
            .unwrap_or(0);
        &self.commands[start..]
    }

    /// Current backing store, if one was set.
    #[must_use]
    pub fn backing(&self) -> Option<BackingStore> {
        self.backing
    }

    /// Drops recorded commands, keeping the backing store.
    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl DrawContext for FrameRecorder {
    fn resize_backing(&mut self, backing: BackingStore) {
        self.backing = Some(backing);
    }

    fn submit(&mut self, command: DrawCommand) {
        if matches!(command, DrawCommand::Clear { .. }) {
            self.commands.clear();
        }
        self.commands.push(command);
    }
}

/// Offscreen canvas backed by a [`FrameRecorder`].
#[derive(Debug, Default)]
pub struct HeadlessCanvas {
    context: Option<FrameRecorder>,
}

impl HeadlessCanvas {
    /// Canvas with a working context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            context: Some(FrameRecorder::new()),
        }
    }

    /// Canvas whose context can never be acquired.
    #[must_use]
    pub fn without_context() -> Self {
        Self { context: None }
    }

    /// The recorder, if the canvas has a context.
    #[must_use]
    pub fn recorder(&self) -> Option<&FrameRecorder> {
        self.context.as_ref()
    }

    /// Mutable recorder access.
    pub fn recorder_mut(&mut self) -> Option<&mut FrameRecorder> {
        self.context.as_mut()
    }
}

impl Canvas for HeadlessCanvas {
    type Context = FrameRecorder;

    fn context_2d(&mut self) -> Option<&mut FrameRecorder> {
        self.context.as_mut()
    }
}
