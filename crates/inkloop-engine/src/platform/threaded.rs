use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use parking_lot::Mutex;

use super::{DrawLoopHandle, JsWork, LoopRegistry, PlatformContext, RenderWork, TickFn, ViewId};

/// Threaded platform configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Device pixels per logical pixel.
    pub pixel_density: f32,
    /// Period of the tick driver.
    pub frame_interval: Duration,
    pub js_thread_name: String,
    pub render_thread_name: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            pixel_density: 1.0,
            frame_interval: Duration::from_nanos(16_666_667),
            js_thread_name: "inkloop-js".to_string(),
            render_thread_name: "inkloop-render".to_string(),
        }
    }
}

/// Platform backed by real threads.
///
/// - one JS worker and one render worker, each draining its own channel in order
/// - one ticker calling every registered draw loop once per `frame_interval`
///
/// Failed or panicking work is logged and the worker keeps going. Dropping
/// the platform stops the ticker, lets the workers drain their queues and
/// joins all threads.
pub struct ThreadedPlatform {
    config: PlatformConfig,
    js_tx: Mutex<Option<Sender<JsWork>>>,
    render_tx: Mutex<Option<Sender<RenderWork>>>,
    loops: Arc<Mutex<LoopRegistry>>,
    invalidated: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl fmt::Debug for ThreadedPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadedPlatform")
            .field("config", &self.config)
            .field("running", &self.running.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl ThreadedPlatform {
    /// Spawns the worker and ticker threads.
    pub fn new(config: PlatformConfig) -> Result<Self> {
        let (js_tx, js_rx) = mpsc::channel::<JsWork>();
        let (render_tx, render_rx) = mpsc::channel::<RenderWork>();
        let loops = Arc::new(Mutex::new(LoopRegistry::default()));
        let invalidated = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        let js = thread::Builder::new()
            .name(config.js_thread_name.clone())
            .spawn(move || js_worker(js_rx))
            .context("failed to spawn JS thread")?;

        let render = thread::Builder::new()
            .name(config.render_thread_name.clone())
            .spawn(move || render_worker(render_rx))
            .context("failed to spawn render thread")?;

        let ticker = {
            let loops = Arc::clone(&loops);
            let invalidated = Arc::clone(&invalidated);
            let running = Arc::clone(&running);
            let interval = config.frame_interval.max(Duration::from_micros(100));
            thread::Builder::new()
                .name("inkloop-ticker".to_string())
                .spawn(move || ticker(interval, loops, invalidated, running))
                .context("failed to spawn ticker thread")?
        };

        log::debug!(
            "threaded platform started (density {}, interval {:?})",
            config.pixel_density,
            config.frame_interval
        );

        Ok(Self {
            config,
            js_tx: Mutex::new(Some(js_tx)),
            render_tx: Mutex::new(Some(render_tx)),
            loops,
            invalidated,
            running,
            threads: Mutex::new(vec![js, render, ticker]),
        })
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Reports `invalidated = true` to every loop on the next tick.
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::Release);
    }

    pub fn active_loops(&self) -> usize {
        self.loops.lock().len()
    }

    /// Stops ticking, drains both queues and joins the threads. Idempotent.
    pub fn shutdown(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        drop(self.js_tx.lock().take());
        drop(self.render_tx.lock().take());

        let me = thread::current().id();
        for handle in self.threads.lock().drain(..) {
            if handle.thread().id() == me {
                continue;
            }
            let name = handle.thread().name().unwrap_or("<unnamed>").to_string();
            if handle.join().is_err() {
                log::error!("platform thread {name} panicked");
            }
        }
        log::debug!("threaded platform stopped");
    }
}

impl Drop for ThreadedPlatform {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl PlatformContext for ThreadedPlatform {
    fn run_on_js_thread(&self, work: JsWork) {
        match self.js_tx.lock().as_ref() {
            Some(tx) if tx.send(work).is_ok() => {}
            _ => log::warn!("JS thread gone; dropping work"),
        }
    }

    fn run_on_render_thread(&self, work: RenderWork) {
        match self.render_tx.lock().as_ref() {
            Some(tx) if tx.send(work).is_ok() => {}
            _ => log::warn!("render thread gone; dropping work"),
        }
    }

    fn pixel_density(&self) -> f32 {
        self.config.pixel_density
    }

    fn begin_draw_loop(&self, view_id: ViewId, on_tick: TickFn) -> Option<DrawLoopHandle> {
        if !self.running.load(Ordering::Acquire) {
            return None;
        }
        self.loops.lock().register(view_id, on_tick)
    }

    fn end_draw_loop(&self, view_id: ViewId) {
        self.loops.lock().unregister(view_id);
    }
}

fn js_worker(rx: Receiver<JsWork>) {
    for work in rx {
        match catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::error!("JS work failed: {e:#}"),
            Err(_) => log::error!("JS work panicked"),
        }
    }
}

fn render_worker(rx: Receiver<RenderWork>) {
    for work in rx {
        if catch_unwind(AssertUnwindSafe(work)).is_err() {
            log::error!("render work panicked");
        }
    }
}

fn ticker(
    interval: Duration,
    loops: Arc<Mutex<LoopRegistry>>,
    invalidated: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
) {
    let mut next = Instant::now() + interval;
    while running.load(Ordering::Acquire) {
        let now = Instant::now();
        if now < next {
            thread::sleep(next - now);
        }
        next += interval;
        // Fell behind by more than a frame: realign instead of bursting.
        let now = Instant::now();
        if next < now {
            next = now + interval;
        }

        let was_invalidated = invalidated.swap(false, Ordering::AcqRel);
        let callbacks = loops.lock().callbacks();
        for tick in callbacks {
            tick(was_invalidated);
        }
    }
}
