use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::{Mutex, RwLock};

use crate::canvas::{Canvas, Surface};
use crate::coords::Rect;
use crate::frame::{FrameInfo, FrameState};
use crate::platform::{DrawLoopHandle, PlatformContext, TickFn, ViewId};
use crate::scene::{Picture, PictureRecorder};
use crate::time::TimingInfo;

use super::lock::{StageGuard, StageLock, StageTimer};
use super::overlay::draw_overlay;
use super::{DrawCallback, DrawingMode, ViewConfig};

/// State shared between the owner handle and dispatched work.
pub(super) struct ViewInner {
    platform: Arc<dyn PlatformContext>,
    pub(super) config: ViewConfig,

    pub(super) callback: RwLock<Option<Arc<DrawCallback>>>,
    pub(super) continuous: AtomicBool,
    pub(super) show_overlay: AtomicBool,
    pub(super) redraws: AtomicUsize,

    js_lock: StageLock,
    render_lock: StageLock,

    pub(super) frame: Mutex<FrameState>,
    recorder: Mutex<PictureRecorder>,
    pub(super) js_timing: Mutex<TimingInfo>,
    pub(super) gpu_timing: Mutex<TimingInfo>,

    pub(super) surface: Mutex<Option<Box<dyn Surface>>>,
    /// Surface handed over while `surface` was busy; `Some(None)` detaches.
    pub(super) pending_surface: Mutex<Option<Option<Box<dyn Surface>>>>,
    /// Device size of `surface`, readable without waiting on a replay.
    pub(super) surface_size: Mutex<(u32, u32)>,

    pub(super) view_id: Mutex<Option<ViewId>>,
    pub(super) loop_handle: Mutex<Option<DrawLoopHandle>>,
}

impl ViewInner {
    pub(super) fn new(platform: Arc<dyn PlatformContext>, config: ViewConfig) -> Self {
        let window = config.timing_window;
        Self {
            platform,
            continuous: AtomicBool::new(config.drawing_mode == DrawingMode::Continuous),
            show_overlay: AtomicBool::new(config.show_debug_overlay),
            config,
            callback: RwLock::new(None),
            redraws: AtomicUsize::new(0),
            js_lock: StageLock::new(),
            render_lock: StageLock::new(),
            frame: Mutex::new(FrameState::default()),
            recorder: Mutex::new(PictureRecorder::new()),
            js_timing: Mutex::new(TimingInfo::with_window(window)),
            gpu_timing: Mutex::new(TimingInfo::with_window(window)),
            surface: Mutex::new(None),
            pending_surface: Mutex::new(None),
            surface_size: Mutex::new((0, 0)),
            view_id: Mutex::new(None),
            loop_handle: Mutex::new(None),
        }
    }

    pub(super) fn callback(&self) -> Option<Arc<DrawCallback>> {
        self.callback.read().clone()
    }

    pub(super) fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::AcqRel);
    }

    /// Platform density, falling back to 1 for unusable values.
    pub(super) fn density(&self) -> f32 {
        let d = self.platform.pixel_density();
        if d.is_finite() && d > 0.0 { d } else { 1.0 }
    }

    /// Registers the tick callback if a view id is assigned. No-op otherwise.
    pub(super) fn begin_loop(self: &Arc<Self>) {
        let Some(view_id) = *self.view_id.lock() else {
            return;
        };

        let weak = Arc::downgrade(self);
        let on_tick: TickFn = Arc::new(move |invalidated| {
            if let Some(inner) = weak.upgrade() {
                inner.on_tick(invalidated);
            }
        });

        let handle = self.platform.begin_draw_loop(view_id, on_tick);
        match handle {
            Some(h) => log::debug!("{view_id}: draw loop started (handle {})", h.get()),
            None => log::warn!("{view_id}: platform refused the draw loop"),
        }
        *self.loop_handle.lock() = handle;
    }

    pub(super) fn end_loop_for(&self, view_id: ViewId) {
        if self.loop_handle.lock().take().is_some() {
            self.platform.end_draw_loop(view_id);
            log::debug!("{view_id}: draw loop ended");
        }
    }

    fn on_tick(self: &Arc<Self>, invalidated: bool) {
        if invalidated {
            self.request_redraw();
        }

        let requested = self.redraws.swap(0, Ordering::AcqRel) > 0;
        if !requested && !self.continuous.load(Ordering::Acquire) {
            return;
        }

        let Some(js_guard) = self.js_lock.try_lock() else {
            self.js_timing.lock().mark_skipped();
            self.request_redraw();
            log::trace!("JS stage busy; frame skipped");
            return;
        };

        let weak = Arc::downgrade(self);
        self.platform.run_on_js_thread(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            inner.perform_draw(js_guard)
        }));
    }

    /// JS-thread body: record the callback into a picture and hand it to the
    /// render thread. `js_guard` is released on every exit path.
    fn perform_draw(self: &Arc<Self>, js_guard: StageGuard) -> Result<()> {
        let Some(callback) = self.callback() else {
            return Ok(());
        };

        let (width, height) = *self.surface_size.lock();
        let density = self.density();

        let recorded = {
            let _timer = StageTimer::start(&self.js_timing);
            let mut recorder = self.recorder.lock();
            let canvas = recorder.begin_recording(Rect::from_size(width as f32, height as f32));
            let info = self
                .frame
                .lock()
                .begin_draw_operation(width as f32 / density, height as f32 / density);
            let drawn = self.draw_frame(canvas, callback.as_ref(), &info, density);
            self.frame.lock().end_draw_operation();
            drawn.map(|()| recorder.finish_recording())
        };

        let picture = recorded.context("drawing callback failed")?;

        match self.render_lock.try_lock() {
            Some(render_guard) => {
                let weak = Arc::downgrade(self);
                self.platform.run_on_render_thread(Box::new(move || {
                    let _render_guard = render_guard;
                    if let Some(inner) = weak.upgrade() {
                        inner.replay(&picture);
                    }
                }));
            }
            None => {
                self.gpu_timing.lock().mark_skipped();
                self.request_redraw();
                log::trace!("render stage busy; picture dropped");
            }
        }

        drop(js_guard);
        Ok(())
    }

    /// Moves a surface parked by `set_surface` into `slot`, the locked surface.
    pub(super) fn install_pending_surface(&self, slot: &mut Option<Box<dyn Surface>>) {
        if let Some(next) = self.pending_surface.lock().take() {
            *slot = next;
        }
    }

    /// Render-thread body. Without a surface there is nothing to replay onto.
    fn replay(&self, picture: &Picture) {
        let mut slot = self.surface.lock();
        self.install_pending_surface(&mut slot);
        let Some(surface) = slot.as_deref_mut() else {
            return;
        };

        let _timer = StageTimer::start(&self.gpu_timing);
        picture.playback(surface.canvas());
        surface.flush();
    }

    /// Runs the callback in logical coordinates, then the overlay if enabled.
    ///
    /// The canvas is restored to its entry depth even if the callback fails or
    /// leaves saves open.
    pub(super) fn draw_frame(
        &self,
        canvas: &mut dyn Canvas,
        callback: &DrawCallback,
        info: &FrameInfo,
        density: f32,
    ) -> Result<()> {
        let depth = canvas.save_depth();
        canvas.save();
        canvas.scale(density, density);

        let result = callback(&mut *canvas, info);
        if result.is_ok() && self.show_overlay.load(Ordering::Acquire) {
            let js = self.js_timing.lock().stats();
            let gpu = self.gpu_timing.lock().stats();
            draw_overlay(&mut *canvas, &self.config, &js, &gpu);
        }

        while canvas.save_depth() > depth {
            canvas.restore();
        }
        result
    }
}
