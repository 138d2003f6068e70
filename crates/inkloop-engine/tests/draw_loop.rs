use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::bail;
use parking_lot::Mutex;

use image::RgbaImage;

use inkloop_engine::canvas::{Canvas, RasterSurface, SnapshotError, Surface};
use inkloop_engine::coords::Rect;
use inkloop_engine::input::{TouchKind, TouchPoint};
use inkloop_engine::paint::Color;
use inkloop_engine::platform::{ManualPlatform, PlatformContext, ViewId};
use inkloop_engine::scene::{DrawCmd, DrawList};
use inkloop_engine::{DrawView, DrawingMode};

const RED: [u8; 4] = [255, 0, 0, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn setup(density: f32) -> (Arc<ManualPlatform>, DrawView) {
    let platform = Arc::new(ManualPlatform::new(density));
    let view = DrawView::new(Arc::clone(&platform) as Arc<dyn PlatformContext>);
    (platform, view)
}

fn counting_callback(view: &DrawView) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    view.on_draw(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    calls
}

fn red() -> Color {
    Color::from_srgb_u8(255, 0, 0, 255)
}

/// Surface that keeps the commands of its last flushed frame.
struct CapturingSurface {
    list: DrawList,
    flushed: Arc<Mutex<Vec<DrawCmd>>>,
}

impl CapturingSurface {
    fn new() -> (Self, Arc<Mutex<Vec<DrawCmd>>>) {
        let flushed = Arc::new(Mutex::new(Vec::new()));
        let surface = Self { list: DrawList::new(), flushed: Arc::clone(&flushed) };
        (surface, flushed)
    }
}

impl Surface for CapturingSurface {
    fn width(&self) -> u32 {
        100
    }

    fn height(&self) -> u32 {
        50
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.list
    }

    fn flush(&mut self) {
        *self.flushed.lock() = self.list.items().to_vec();
        self.list.reset();
    }

    fn snapshot(&self, _crop: Option<Rect>) -> Result<RgbaImage, SnapshotError> {
        Err(SnapshotError::EmptySurface)
    }
}

fn overlay_lines(cmds: &[DrawCmd]) -> Vec<String> {
    cmds.iter()
        .filter_map(|cmd| match cmd {
            DrawCmd::Text(t) => Some(t.text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn continuous_mode_draws_once_per_tick() {
    let (platform, view) = setup(1.0);
    let calls = counting_callback(&view);
    view.set_drawing_mode(DrawingMode::Continuous);
    view.set_view_id(ViewId(1));

    for _ in 0..5 {
        let report = platform.frame();
        assert_eq!(report.ticked, 1);
        assert!(report.js_results.iter().all(|r| r.is_ok()));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(platform.js_dispatched(), 5);
    assert_eq!(platform.render_dispatched(), 5);
}

#[test]
fn default_mode_draws_once_after_install() {
    let (platform, view) = setup(1.0);
    let calls = counting_callback(&view);
    view.set_view_id(ViewId(1));

    for _ in 0..10 {
        platform.frame();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(platform.js_dispatched(), 1);

    view.request_redraw();
    view.request_redraw();
    for _ in 0..3 {
        platform.frame();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn default_mode_idle_tick_dispatches_nothing() {
    let (platform, view) = setup(1.0);
    counting_callback(&view);
    view.set_view_id(ViewId(1));
    platform.frame();

    assert_eq!(view.pending_redraws(), 0);
    platform.tick();
    assert_eq!(platform.pending_js(), 0);
    assert_eq!(platform.js_dispatched(), 1);
}

#[test]
fn at_most_one_js_task_in_flight() {
    let (platform, view) = setup(1.0);
    counting_callback(&view);
    view.set_drawing_mode(DrawingMode::Continuous);
    view.set_view_id(ViewId(1));

    for _ in 0..4 {
        platform.tick();
    }
    assert_eq!(platform.pending_js(), 1);
}

#[test]
fn busy_js_stage_counts_skips_without_dispatching() {
    let (platform, view) = setup(1.0);
    counting_callback(&view);
    view.set_drawing_mode(DrawingMode::Continuous);
    view.set_view_id(ViewId(1));

    platform.tick();
    let dispatched = platform.js_dispatched();
    let skipped = view.js_timing().skipped;

    const M: u64 = 7;
    for _ in 0..M {
        platform.tick();
    }
    assert!(view.js_timing().skipped >= skipped + M);
    assert_eq!(platform.js_dispatched(), dispatched);
}

#[test]
fn redraw_requests_survive_contention() {
    let (platform, view) = setup(1.0);
    let calls = counting_callback(&view);
    view.set_view_id(ViewId(1));

    // Hold the JS stage with the install-time frame.
    platform.tick();
    for _ in 0..3 {
        view.request_redraw();
        platform.tick();
    }
    assert_eq!(platform.js_dispatched(), 1);
    assert!(view.pending_redraws() > 0);

    platform.run_js_tasks();
    platform.run_render_tasks();
    platform.frame();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn failing_callback_does_not_leak_the_js_stage() {
    let (platform, view) = setup(1.0);
    view.on_draw(|_, _| bail!("nothing to draw"));
    view.set_drawing_mode(DrawingMode::Continuous);
    view.set_view_id(ViewId(1));

    let report = platform.frame();
    assert_eq!(report.js_results.len(), 1);
    let err = report.js_results[0].as_ref().unwrap_err();
    assert!(format!("{err:#}").contains("nothing to draw"));
    assert_eq!(report.render_ran, 0);

    platform.tick();
    assert_eq!(platform.pending_js(), 1);
    assert_eq!(platform.render_dispatched(), 0);
}

#[test]
fn panicking_callback_still_records_timing_and_releases_the_stage() {
    let (platform, view) = setup(1.0);
    view.on_draw(|_, _| panic!("callback blew up"));
    view.set_drawing_mode(DrawingMode::Continuous);
    view.set_view_id(ViewId(1));

    platform.tick();
    let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| platform.run_js_tasks()));
    assert!(unwound.is_err());

    let js = view.js_timing();
    assert_eq!(js.samples, 1);
    assert_eq!(platform.render_dispatched(), 0);

    platform.tick();
    assert_eq!(platform.pending_js(), 1);
}

#[test]
fn dropped_js_work_releases_the_stage() {
    let (platform, view) = setup(1.0);
    let calls = counting_callback(&view);
    view.set_view_id(ViewId(1));

    platform.tick();
    assert_eq!(platform.drop_pending_js(), 1);

    view.request_redraw();
    platform.frame();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn busy_render_stage_drops_the_picture_and_asks_again() {
    let (platform, view) = setup(1.0);
    counting_callback(&view);
    view.set_surface(Some(Box::new(RasterSurface::new(8, 8))));
    view.set_view_id(ViewId(1));

    platform.tick();
    platform.run_js_tasks();
    assert_eq!(platform.pending_render(), 1);

    view.request_redraw();
    platform.tick();
    platform.run_js_tasks();
    assert_eq!(platform.pending_render(), 1);
    assert_eq!(view.gpu_timing().skipped, 1);
    assert_eq!(view.pending_redraws(), 1);

    assert_eq!(platform.run_render_tasks(), 1);
    assert_eq!(view.gpu_timing().samples, 1);

    let report = platform.frame();
    assert_eq!(report.render_ran, 1);
}

#[test]
fn callback_sees_logical_size_and_lands_on_device_pixels() {
    let (platform, view) = setup(2.0);
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    view.on_draw(move |canvas: &mut dyn Canvas, info| {
        *sink.lock() = Some((info.width(), info.height()));
        canvas.fill_rect(Rect::new(5.0, 5.0, 2.0, 2.0), red());
        Ok(())
    });
    view.set_surface(Some(Box::new(RasterSurface::new(40, 20))));
    view.set_view_id(ViewId(1));
    platform.frame();

    assert_eq!(*seen.lock(), Some((20.0, 10.0)));

    let image = view.with_surface(|s| s.snapshot(None)).unwrap().unwrap();
    assert_eq!(image.get_pixel(9, 9).0, CLEAR);
    assert_eq!(image.get_pixel(10, 10).0, RED);
    assert_eq!(image.get_pixel(13, 13).0, RED);
    assert_eq!(image.get_pixel(14, 14).0, CLEAR);

    assert_eq!(view.gpu_timing().samples, 1);
}

#[test]
fn debug_overlay_is_replayed_only_while_enabled() {
    let (platform, view) = setup(1.0);
    let (surface, flushed) = CapturingSurface::new();
    view.set_surface(Some(Box::new(surface)));
    view.on_draw(|canvas, _| {
        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), red());
        Ok(())
    });
    view.set_show_debug_overlay(true);
    view.set_view_id(ViewId(1));

    platform.frame();
    let lines = overlay_lines(&flushed.lock());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("js: "), "{lines:?}");
    assert!(lines[0].contains("gpu: ") && lines[0].contains("total: "), "{lines:?}");

    view.set_show_debug_overlay(false);
    view.request_redraw();
    platform.frame();
    let cmds = flushed.lock().clone();
    assert!(!cmds.is_empty());
    assert!(overlay_lines(&cmds).is_empty());
}

#[test]
fn snapshot_matches_replayed_surface() {
    let (platform, view) = setup(2.0);
    view.on_draw(|canvas, info| {
        canvas.clear(Color::white());
        canvas.fill_circle(
            inkloop_engine::coords::Vec2::new(info.width() / 2.0, info.height() / 2.0),
            4.0,
            red(),
        );
        Ok(())
    });
    view.set_surface(Some(Box::new(RasterSurface::new(32, 32))));
    view.set_view_id(ViewId(1));
    platform.frame();

    let replayed = view.with_surface(|s| s.snapshot(None)).unwrap().unwrap();
    let direct = view.make_image_snapshot(None).unwrap();
    assert_eq!(replayed.as_raw(), direct.as_raw());

    let cropped = view.make_image_snapshot(Some(Rect::new(8.0, 8.0, 16.0, 16.0))).unwrap();
    assert_eq!(cropped.dimensions(), (16, 16));
    assert_eq!(cropped.get_pixel(8, 8).0, RED);
}

#[test]
fn snapshot_leaves_touches_for_the_loop() {
    let (platform, view) = setup(1.0);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    view.on_draw(move |_, info| {
        sink.lock().push(info.touches().len());
        Ok(())
    });
    view.set_surface(Some(Box::new(RasterSurface::new(4, 4))));
    view.set_view_id(ViewId(1));
    platform.frame();

    view.update_touches(vec![TouchPoint::new(1, 1.0, 1.0, TouchKind::Start)]);
    view.make_image_snapshot(None).unwrap();
    platform.frame();

    assert_eq!(*seen.lock(), vec![0, 0, 1]);
}

#[test]
fn touches_are_held_over_a_skipped_frame() {
    let (platform, view) = setup(1.0);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    view.on_draw(move |_, info| {
        sink.lock().push(info.touches().to_vec());
        Ok(())
    });
    view.set_view_id(ViewId(1));

    // Frame in flight; the touch arrives after it was scheduled.
    platform.tick();
    view.update_touches(vec![TouchPoint::new(3, 2.0, 2.0, TouchKind::Active)]);
    platform.tick();
    assert_eq!(view.js_timing().skipped, 1);

    // The scheduled frame never runs; the touch must reach the next one.
    assert_eq!(platform.drop_pending_js(), 1);
    platform.frame();
    view.request_redraw();
    platform.frame();

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].len(), 1);
    assert_eq!(seen[0][0].id, 3);
    assert!(seen[1].is_empty());
}

#[test]
fn removing_the_callback_stops_ticking() {
    let (platform, view) = setup(1.0);
    counting_callback(&view);
    view.set_view_id(ViewId(5));
    platform.frame();

    view.set_draw_callback(None);
    assert!(!platform.is_registered(ViewId(5)));
    view.request_redraw();
    assert_eq!(platform.frame().ticked, 0);

    view.end_drawing_loop();
    view.end_drawing_loop();
}
