//! Debug visualization side channel.
//!
//! Geometric tests report what they probed through a [`DebugSink`]. Sinks
//! only observe: nothing they do feeds back into detection or movement.

use glam::Vec3;

/// Colour hint for a debug primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugColor {
    Red,
    Green,
    Blue,
    Orange,
    Yellow,
    Cyan,
    White,
}

/// A shape to visualize.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugPrimitive {
    Line { start: Vec3, end: Vec3, color: DebugColor },
    Point { position: Vec3, size: f32, color: DebugColor },
    Sphere { center: Vec3, radius: f32, color: DebugColor },
    Box { center: Vec3, half_extents: Vec3, color: DebugColor },
    Text { position: Vec3, text: String, color: DebugColor },
}

impl DebugPrimitive {
    pub fn color(&self) -> DebugColor {
        match self {
            Self::Line { color, .. }
            | Self::Point { color, .. }
            | Self::Sphere { color, .. }
            | Self::Box { color, .. }
            | Self::Text { color, .. } => *color,
        }
    }
}

/// Receiver for debug primitives.
pub trait DebugSink {
    fn record(&mut self, primitive: DebugPrimitive);

    fn line(&mut self, start: Vec3, end: Vec3, color: DebugColor) {
        self.record(DebugPrimitive::Line { start, end, color });
    }

    fn point(&mut self, position: Vec3, color: DebugColor) {
        self.record(DebugPrimitive::Point { position, size: 10.0, color });
    }

    fn sphere(&mut self, center: Vec3, radius: f32, color: DebugColor) {
        self.record(DebugPrimitive::Sphere { center, radius, color });
    }

    fn cube(&mut self, center: Vec3, half_extents: Vec3, color: DebugColor) {
        self.record(DebugPrimitive::Box { center, half_extents, color });
    }

    fn text(&mut self, position: Vec3, text: String, color: DebugColor) {
        self.record(DebugPrimitive::Text { position, text, color });
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn record(&mut self, _primitive: DebugPrimitive) {}
}

/// Forwards every primitive to the `log` facade at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn record(&mut self, primitive: DebugPrimitive) {
        log::trace!("debug draw: {:?}", primitive);
    }
}

/// Stores primitives until the host drains them (e.g. once per rendered frame).
#[derive(Debug, Clone, Default)]
pub struct DebugRecorder {
    primitives: Vec<DebugPrimitive>,
}

impl DebugRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[DebugPrimitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Take all recorded primitives, leaving the recorder empty.
    pub fn drain(&mut self) -> Vec<DebugPrimitive> {
        std::mem::take(&mut self.primitives)
    }
}

impl DebugSink for DebugRecorder {
    fn record(&mut self, primitive: DebugPrimitive) {
        self.primitives.push(primitive);
    }
}
