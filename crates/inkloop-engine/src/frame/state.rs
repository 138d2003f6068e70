use crate::input::{TouchBuffer, TouchPoint};
use crate::time::{FrameClock, FrameTime};

use super::FrameInfo;

/// Mutable frame bookkeeping owned by a view.
///
/// Lifecycle per drawn frame: `begin_draw_operation` stamps size and time and
/// consumes pending touches; the callback reads the returned snapshot;
/// `end_draw_operation` clears the per-frame fields. A frame abandoned without
/// `end_draw_operation` is simply overwritten by the next one.
#[derive(Debug, Default)]
pub(crate) struct FrameState {
    clock: FrameClock,
    touches: TouchBuffer,
    current: FrameInfo,
}

impl FrameState {
    /// Stamps the frame and returns the snapshot for the callback.
    pub(crate) fn begin_draw_operation(&mut self, width: f32, height: f32) -> FrameInfo {
        let time = self.clock.tick();
        self.begin_with_time(width, height, time)
    }

    pub(crate) fn begin_with_time(&mut self, width: f32, height: f32, time: FrameTime) -> FrameInfo {
        self.current = FrameInfo {
            width,
            height,
            timestamp: time.elapsed,
            frame_index: time.frame_index,
            dt: time.dt,
            touches: self.touches.take(),
        };
        self.current.clone()
    }

    /// Replaces the pending touch batch. Visible to the next `begin_draw_operation`.
    pub(crate) fn update_touches(&mut self, points: Vec<TouchPoint>) {
        self.touches.update(points);
    }

    /// Marks the frame's transient state as consumed.
    pub(crate) fn end_draw_operation(&mut self) {
        self.current.touches.clear();
    }

    #[cfg(test)]
    pub(crate) fn pending_touches(&self) -> &[TouchPoint] {
        self.touches.pending()
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> &FrameInfo {
        &self.current
    }

    /// Snapshot for drawing outside the loop (e.g. image snapshots).
    ///
    /// Leaves the clock and pending touches untouched.
    pub(crate) fn detached(&self, width: f32, height: f32) -> FrameInfo {
        FrameInfo {
            width,
            height,
            timestamp: self.clock.elapsed(),
            frame_index: self.clock.frame_index(),
            dt: 0.0,
            touches: Vec::new(),
        }
    }
}
