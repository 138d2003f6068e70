use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;

use inkloop_engine::canvas::{Canvas, RasterSurface};
use inkloop_engine::coords::{Rect, Vec2};
use inkloop_engine::frame::FrameInfo;
use inkloop_engine::input::{TouchKind, TouchPoint};
use inkloop_engine::logging::{init_logging, LoggingConfig};
use inkloop_engine::paint::{Color, ColorStop, LinearGradient, Paint, SpreadMode};
use inkloop_engine::platform::{PlatformConfig, PlatformContext, ThreadedPlatform, ViewId};
use inkloop_engine::scene::{Border, CircleCmd, RectCmd};
use inkloop_engine::text::FontSystem;
use inkloop_engine::{DrawView, DrawingMode, ViewConfig};

/// Renders an animated scene through the threaded draw loop and writes the
/// last frame as a PNG.
#[derive(Debug, Parser)]
#[command(name = "inkloop-studio", version)]
struct Args {
    /// Where to write the final frame.
    #[arg(default_value = "inkloop.png")]
    output: PathBuf,

    /// Number of drawn frames before the snapshot is taken.
    #[arg(default_value_t = 120)]
    frames: u64,

    /// Surface width in device pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Surface height in device pixels.
    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Device pixels per logical unit.
    #[arg(long, default_value_t = 2.0)]
    density: f32,

    /// Hide the timing overlay.
    #[arg(long)]
    no_overlay: bool,
}

/// Studio run settings.
#[derive(Debug, Clone)]
struct StudioConfig {
    width: u32,
    height: u32,
    frames: u64,
    output: PathBuf,
    show_debug_overlay: bool,
    platform: PlatformConfig,
    logging: LoggingConfig,
}

impl From<Args> for StudioConfig {
    fn from(args: Args) -> Self {
        Self {
            width: args.width,
            height: args.height,
            frames: args.frames,
            output: args.output,
            show_debug_overlay: !args.no_overlay,
            platform: PlatformConfig {
                pixel_density: args.density,
                ..PlatformConfig::default()
            },
            logging: LoggingConfig::default(),
        }
    }
}

fn main() -> Result<()> {
    let config = StudioConfig::from(Args::parse());
    init_logging(config.logging.clone());

    println!();
    println!("  inkloop studio  ·  {}x{} @{}x", config.width, config.height, config.platform.pixel_density);
    println!();

    let fonts = load_fonts();
    let platform = Arc::new(ThreadedPlatform::new(config.platform.clone()).context("failed to start platform")?);

    let view = DrawView::with_config(
        Arc::clone(&platform) as Arc<dyn PlatformContext>,
        ViewConfig {
            drawing_mode: DrawingMode::Continuous,
            show_debug_overlay: config.show_debug_overlay,
            snapshot_fonts: fonts.clone(),
            ..ViewConfig::default()
        },
    );

    let mut surface = RasterSurface::new(config.width, config.height);
    surface.set_fonts(fonts);
    view.set_surface(Some(Box::new(surface)));

    let drawn = Arc::new(AtomicU64::new(0));
    {
        let drawn = Arc::clone(&drawn);
        view.on_draw(move |canvas, info| {
            draw_scene(canvas, info);
            drawn.fetch_add(1, Ordering::Relaxed);
            Ok(())
        });
    }
    view.set_view_id(ViewId(1));

    // Synthetic finger sweeping across the view.
    let deadline = Instant::now() + Duration::from_secs(30);
    let logical_w = config.width as f32 / config.platform.pixel_density;
    let logical_h = config.height as f32 / config.platform.pixel_density;
    let mut step = 0u32;
    while drawn.load(Ordering::Relaxed) < config.frames {
        if Instant::now() > deadline {
            bail!("timed out after {} of {} frames", drawn.load(Ordering::Relaxed), config.frames);
        }
        let t = (step % 60) as f32 / 59.0;
        let kind = match step % 60 {
            0 => TouchKind::Start,
            59 => TouchKind::End,
            _ => TouchKind::Active,
        };
        view.update_touches(vec![TouchPoint::new(1, t * logical_w, logical_h * 0.75, kind)]);
        step += 1;
        thread::sleep(config.platform.frame_interval);
    }

    let image = view.make_image_snapshot(None).context("snapshot failed")?;
    image
        .save(&config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    let js = view.js_timing();
    let gpu = view.gpu_timing();
    log::info!(
        "{} frames; js {:.2}ms avg ({} skipped); gpu {:.2}ms avg ({} skipped)",
        drawn.load(Ordering::Relaxed),
        js.average_ms(),
        js.skipped,
        gpu.average_ms(),
        gpu.skipped
    );
    println!("  wrote {}", config.output.display());

    drop(view);
    platform.shutdown();
    Ok(())
}

fn draw_scene(canvas: &mut dyn Canvas, info: &FrameInfo) {
    let (w, h) = (info.width(), info.height());
    let t = info.timestamp().as_secs_f32();

    let sky = LinearGradient::new(
        Vec2::zero(),
        Vec2::new(0.0, h),
        vec![
            ColorStop::new(0.0, Color::from_srgb_u8(18, 24, 48, 255)),
            ColorStop::new(1.0, Color::from_srgb_u8(64, 32, 96, 255)),
        ],
        SpreadMode::Pad,
    );
    canvas.draw_rect(&RectCmd::new(Rect::from_size(w, h), Paint::LinearGradient(sky)));

    let center = Vec2::new(w * 0.5, h * 0.5);
    let orbit = h.min(w) * 0.3;
    for i in 0..6 {
        let phase = t * 1.5 + i as f32 * std::f32::consts::TAU / 6.0;
        let p = Vec2::new(center.x + orbit * phase.cos(), center.y + orbit * phase.sin());
        let shade = 120 + (i * 20) as u8;
        canvas.draw_circle(&CircleCmd::new(
            p,
            8.0 + i as f32,
            Paint::Solid(Color::from_srgb_u8(shade, 200, 255, 230)),
            Some(Border::new(1.5, Color::white())),
        ));
    }

    for touch in info.touches().iter().filter(|p| p.is_active()) {
        canvas.fill_circle(Vec2::new(touch.x, touch.y), 14.0 * touch.force.max(0.5), Color::from_srgb_u8(255, 180, 40, 200));
    }

    canvas.save();
    canvas.translate(center.x, center.y);
    canvas.fill_rounded_rect(Rect::new(-24.0, -24.0, 48.0, 48.0), 10.0, Color::from_srgb_u8(240, 240, 255, 255));
    canvas.restore();
}

/// Loads the first system font found into a shared font system.
fn load_fonts() -> Option<Arc<FontSystem>> {
    let bytes = [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())?;

    let mut fonts = FontSystem::new();
    match fonts.load_font(&bytes) {
        Ok(_) => Some(Arc::new(fonts)),
        Err(e) => {
            log::warn!("no overlay font: {e}");
            None
        }
    }
}
