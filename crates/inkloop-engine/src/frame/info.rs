use std::time::Duration;

use crate::input::TouchPoint;

/// Read-only frame context handed to the drawing callback.
///
/// Sizes are logical pixels: the surface's device size divided by the
/// platform's pixel density.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInfo {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) timestamp: Duration,
    pub(crate) frame_index: u64,
    pub(crate) dt: f32,
    pub(crate) touches: Vec<TouchPoint>,
}

impl FrameInfo {
    /// Logical width.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Logical height.
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Time since the view was created.
    #[inline]
    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    /// Number of frames drawn before this one.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Seconds since the previous drawn frame (clamped).
    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Touches delivered since the last frame that ran the callback.
    #[inline]
    pub fn touches(&self) -> &[TouchPoint] {
        &self.touches
    }
}
