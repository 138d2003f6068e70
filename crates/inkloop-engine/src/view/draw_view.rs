use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::canvas::{Canvas, RasterSurface, Surface};
use crate::coords::Rect;
use crate::frame::FrameInfo;
use crate::input::TouchPoint;
use crate::platform::{PlatformContext, ViewId};
use crate::time::TimingStats;

use super::inner::ViewInner;
use super::{DrawingMode, ViewConfig};

/// User drawing callback.
///
/// Called with a canvas already scaled to logical pixels and the frame's
/// [`FrameInfo`]. Errors end the frame and are reported by the platform.
pub type DrawCallback = dyn Fn(&mut dyn Canvas, &FrameInfo) -> Result<()> + Send + Sync + 'static;

/// Owner handle of a drawing view.
///
/// Work dispatched to the platform only holds weak references to the view;
/// dropping the handle ends the draw loop and turns still-queued work into
/// no-ops.
pub struct DrawView {
    inner: Arc<ViewInner>,
}

impl std::fmt::Debug for DrawView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawView")
            .field("view_id", &self.view_id())
            .field("mode", &self.drawing_mode())
            .field("loop_active", &self.is_drawing_loop_active())
            .field("pending_redraws", &self.pending_redraws())
            .finish_non_exhaustive()
    }
}

impl DrawView {
    pub fn new(platform: Arc<dyn PlatformContext>) -> Self {
        Self::with_config(platform, ViewConfig::default())
    }

    pub fn with_config(platform: Arc<dyn PlatformContext>, config: ViewConfig) -> Self {
        Self {
            inner: Arc::new(ViewInner::new(platform, config)),
        }
    }

    /// Installs or removes the drawing callback.
    ///
    /// `None` ends the draw loop. A callback resets both timing trackers,
    /// requests a redraw and restarts the loop if a view id is assigned.
    pub fn set_draw_callback(&self, callback: Option<Arc<DrawCallback>>) {
        let installing = callback.is_some();
        *self.inner.callback.write() = callback;

        if !installing {
            self.end_drawing_loop();
            return;
        }

        self.inner.js_timing.lock().reset();
        self.inner.gpu_timing.lock().reset();
        self.request_redraw();
        if !self.is_drawing_loop_active() {
            self.inner.begin_loop();
        }
    }

    /// Installs `f` as the drawing callback.
    pub fn on_draw<F>(&self, f: F)
    where
        F: Fn(&mut dyn Canvas, &FrameInfo) -> Result<()> + Send + Sync + 'static,
    {
        self.set_draw_callback(Some(Arc::new(f)));
    }

    /// Assigns the view identity and starts the draw loop.
    ///
    /// Re-assigning the same id is a no-op. A different id moves the loop.
    pub fn set_view_id(&self, view_id: ViewId) {
        let previous = self.inner.view_id.lock().replace(view_id);
        match previous {
            Some(prev) if prev == view_id && self.is_drawing_loop_active() => return,
            Some(prev) if prev != view_id => self.inner.end_loop_for(prev),
            _ => {}
        }
        self.inner.begin_loop();
    }

    pub fn view_id(&self) -> Option<ViewId> {
        *self.inner.view_id.lock()
    }

    /// Unregisters the draw loop. Idempotent. Work already queued still runs.
    pub fn end_drawing_loop(&self) {
        let view_id = self.view_id();
        if let Some(view_id) = view_id {
            self.inner.end_loop_for(view_id);
        }
    }

    pub fn is_drawing_loop_active(&self) -> bool {
        self.inner.loop_handle.lock().is_some()
    }

    pub fn set_drawing_mode(&self, mode: DrawingMode) {
        self.inner.continuous.store(mode == DrawingMode::Continuous, Ordering::Release);
    }

    pub fn drawing_mode(&self) -> DrawingMode {
        if self.inner.continuous.load(Ordering::Acquire) {
            DrawingMode::Continuous
        } else {
            DrawingMode::Default
        }
    }

    pub fn set_show_debug_overlay(&self, show: bool) {
        self.inner.show_overlay.store(show, Ordering::Release);
    }

    pub fn show_debug_overlay(&self) -> bool {
        self.inner.show_overlay.load(Ordering::Acquire)
    }

    /// Asks for one more frame. Requests made before the next tick coalesce.
    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    pub fn pending_redraws(&self) -> usize {
        self.inner.redraws.load(Ordering::Acquire)
    }

    /// Replaces the pending touch batch and requests a redraw.
    ///
    /// The batch is handed to the next frame that runs the callback.
    pub fn update_touches(&self, points: Vec<TouchPoint>) {
        self.inner.frame.lock().update_touches(points);
        self.request_redraw();
    }

    /// Attaches (or detaches with `None`) the target surface.
    ///
    /// Never waits on the render thread: while a replay holds the current
    /// surface, the new one is parked and swapped in by the next replay (or
    /// the next `with_surface`). The size used for recording changes at once.
    pub fn set_surface(&self, surface: Option<Box<dyn Surface>>) {
        let size = surface.as_ref().map_or((0, 0), |s| (s.width(), s.height()));
        *self.inner.surface_size.lock() = size;

        match self.inner.surface.try_lock() {
            Some(mut slot) => {
                self.inner.pending_surface.lock().take();
                *slot = surface;
                log::debug!("surface set to {}x{}", size.0, size.1);
            }
            None => {
                *self.inner.pending_surface.lock() = Some(surface);
                log::debug!("surface busy; {}x{} surface parked", size.0, size.1);
            }
        }
        self.request_redraw();
    }

    /// Runs `f` on the attached surface, if any.
    ///
    /// Waits for a replay in progress.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut dyn Surface) -> R) -> Option<R> {
        let mut slot = self.inner.surface.lock();
        self.inner.install_pending_surface(&mut slot);
        slot.as_mut().map(|s| f(&mut **s))
    }

    /// Device size of the attached surface; `(0, 0)` when detached.
    pub fn surface_size(&self) -> (u32, u32) {
        *self.inner.surface_size.lock()
    }

    /// Draws the current callback straight into a fresh raster image.
    ///
    /// The image has the attached surface's device size. `crop` is in device
    /// pixels. Runs on the calling thread outside the lock protocol and leaves
    /// pending touches for the loop.
    pub fn make_image_snapshot(&self, crop: Option<Rect>) -> Result<RgbaImage> {
        let (width, height) = self.surface_size();
        let mut raster = RasterSurface::new(width, height);
        raster.set_fonts(self.inner.config.snapshot_fonts.clone());

        if let Some(callback) = self.inner.callback() {
            let density = self.inner.density();
            let info = self
                .inner
                .frame
                .lock()
                .detached(width as f32 / density, height as f32 / density);
            self.inner
                .draw_frame(raster.canvas(), callback.as_ref(), &info, density)
                .context("drawing callback failed during snapshot")?;
        }

        raster.flush();
        raster.snapshot(crop).context("failed to read snapshot pixels")
    }

    /// JS-stage timing: recording plus callback.
    pub fn js_timing(&self) -> TimingStats {
        self.inner.js_timing.lock().stats()
    }

    /// Render-stage timing: replay plus flush.
    pub fn gpu_timing(&self) -> TimingStats {
        self.inner.gpu_timing.lock().stats()
    }
}

impl Drop for DrawView {
    fn drop(&mut self) {
        self.end_drawing_loop();
    }
}
