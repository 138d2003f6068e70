use std::sync::Arc;

use crate::canvas::Canvas;
use crate::coords::Rect;
use crate::scene::{DrawCmd, DrawList};

/// Immutable, replayable recording of drawing commands.
///
/// Cloning is an `Arc` bump, so a picture can be recorded on one thread and
/// replayed on another without copying the command stream.
#[derive(Debug, Clone)]
pub struct Picture {
    cmds: Arc<[DrawCmd]>,
    cull_rect: Rect,
}

impl Picture {
    /// Bounds passed to [`PictureRecorder::begin_recording`].
    #[inline]
    pub fn cull_rect(&self) -> Rect {
        self.cull_rect
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Replays every command onto `canvas`, isolated in its own save/restore.
    pub fn playback(&self, canvas: &mut dyn Canvas) {
        canvas.draw_picture(self);
    }
}

/// Records canvas calls into a [`Picture`].
///
/// ```text
/// let canvas = recorder.begin_recording(bounds);
/// canvas.scale(density, density);
/// // ... draw ...
/// let picture = recorder.finish_recording();
/// ```
#[derive(Debug, Default)]
pub struct PictureRecorder {
    list: DrawList,
    bounds: Rect,
}

impl PictureRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh recording. Anything recorded but not finished is discarded.
    pub fn begin_recording(&mut self, bounds: Rect) -> &mut DrawList {
        self.list.reset();
        self.bounds = bounds;
        self.list.push(DrawCmd::ClipRect(bounds));
        &mut self.list
    }

    /// Freezes the recording, closing any saves the drawing code left open.
    pub fn finish_recording(&mut self) -> Picture {
        Picture {
            cmds: self.list.take_balanced(),
            cull_rect: self.bounds,
        }
    }
}
