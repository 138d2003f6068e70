use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{DrawLoopHandle, JsWork, LoopRegistry, PlatformContext, RenderWork, TickFn, ViewId};

/// What one [`ManualPlatform::frame`] did.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Number of loops ticked.
    pub ticked: usize,
    /// One entry per JS task that ran, in order.
    pub js_results: Vec<anyhow::Result<()>>,
    /// Number of render tasks that ran.
    pub render_ran: usize,
}

/// Deterministic platform driven by the caller.
///
/// Nothing runs until asked: `tick` calls the registered loops, `run_js_tasks`
/// and `run_render_tasks` drain the two queues on the calling thread. Work
/// enqueued while a queue is draining runs in the same drain.
pub struct ManualPlatform {
    density: f32,
    js: Mutex<VecDeque<JsWork>>,
    render: Mutex<VecDeque<RenderWork>>,
    loops: Mutex<LoopRegistry>,
    js_dispatched: AtomicUsize,
    render_dispatched: AtomicUsize,
}

impl Default for ManualPlatform {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ManualPlatform {
    pub fn new(density: f32) -> Self {
        Self {
            density,
            js: Mutex::new(VecDeque::new()),
            render: Mutex::new(VecDeque::new()),
            loops: Mutex::new(LoopRegistry::default()),
            js_dispatched: AtomicUsize::new(0),
            render_dispatched: AtomicUsize::new(0),
        }
    }

    /// Ticks every registered loop once with `invalidated = false`.
    pub fn tick(&self) -> usize {
        self.tick_with(false)
    }

    /// Ticks every registered loop once with `invalidated = true`.
    pub fn tick_invalidated(&self) -> usize {
        self.tick_with(true)
    }

    fn tick_with(&self, invalidated: bool) -> usize {
        let callbacks = self.loops.lock().callbacks();
        for tick in &callbacks {
            tick(invalidated);
        }
        callbacks.len()
    }

    /// Runs queued JS work until the queue is empty.
    pub fn run_js_tasks(&self) -> Vec<anyhow::Result<()>> {
        let mut results = Vec::new();
        // Pop one at a time with the lock released: work may enqueue more work.
        loop {
            let next = self.js.lock().pop_front();
            let Some(work) = next else { break };
            results.push(work());
        }
        results
    }

    /// Runs queued render work until the queue is empty.
    pub fn run_render_tasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.render.lock().pop_front();
            let Some(work) = next else { break };
            work();
            ran += 1;
        }
        ran
    }

    /// One full frame: tick, then JS, then render.
    pub fn frame(&self) -> FrameReport {
        let ticked = self.tick();
        let js_results = self.run_js_tasks();
        let render_ran = self.run_render_tasks();
        FrameReport { ticked, js_results, render_ran }
    }

    /// Discards queued JS work without running it.
    pub fn drop_pending_js(&self) -> usize {
        let dropped: Vec<JsWork> = self.js.lock().drain(..).collect();
        dropped.len()
    }

    pub fn pending_js(&self) -> usize {
        self.js.lock().len()
    }

    pub fn pending_render(&self) -> usize {
        self.render.lock().len()
    }

    /// Total JS work ever enqueued.
    pub fn js_dispatched(&self) -> usize {
        self.js_dispatched.load(Ordering::Relaxed)
    }

    /// Total render work ever enqueued.
    pub fn render_dispatched(&self) -> usize {
        self.render_dispatched.load(Ordering::Relaxed)
    }

    pub fn is_registered(&self, view_id: ViewId) -> bool {
        self.loops.lock().contains(view_id)
    }

    pub fn active_loops(&self) -> usize {
        self.loops.lock().len()
    }
}

impl PlatformContext for ManualPlatform {
    fn run_on_js_thread(&self, work: JsWork) {
        self.js_dispatched.fetch_add(1, Ordering::Relaxed);
        self.js.lock().push_back(work);
    }

    fn run_on_render_thread(&self, work: RenderWork) {
        self.render_dispatched.fetch_add(1, Ordering::Relaxed);
        self.render.lock().push_back(work);
    }

    fn pixel_density(&self) -> f32 {
        self.density
    }

    fn begin_draw_loop(&self, view_id: ViewId, on_tick: TickFn) -> Option<DrawLoopHandle> {
        self.loops.lock().register(view_id, on_tick)
    }

    fn end_draw_loop(&self, view_id: ViewId) {
        self.loops.lock().unregister(view_id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn nothing_runs_until_drained() {
        let platform = Arc::new(ManualPlatform::default());
        let log = Arc::new(Mutex::new(Vec::new()));

        let l = Arc::clone(&log);
        platform.run_on_js_thread(Box::new(move || {
            l.lock().push("js");
            Ok(())
        }));
        let l = Arc::clone(&log);
        platform.run_on_render_thread(Box::new(move || l.lock().push("render")));

        assert!(log.lock().is_empty());
        assert_eq!(platform.pending_js(), 1);

        assert_eq!(platform.run_render_tasks(), 1);
        assert_eq!(platform.run_js_tasks().len(), 1);
        assert_eq!(*log.lock(), vec!["render", "js"]);
    }

    #[test]
    fn js_work_can_chain_render_work() {
        let platform = Arc::new(ManualPlatform::default());
        let p = Arc::clone(&platform);
        platform.run_on_js_thread(Box::new(move || {
            p.run_on_render_thread(Box::new(|| {}));
            Ok(())
        }));

        let report = platform.frame();
        assert_eq!(report.ticked, 0);
        assert_eq!(report.js_results.len(), 1);
        assert_eq!(report.render_ran, 1);
        assert_eq!(platform.render_dispatched(), 1);
    }

    #[test]
    fn tick_reports_invalidation() {
        let platform = ManualPlatform::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        platform.begin_draw_loop(ViewId(1), Arc::new(move |inv| s.lock().push(inv)));

        platform.tick();
        platform.tick_invalidated();
        assert_eq!(*seen.lock(), vec![false, true]);

        platform.end_draw_loop(ViewId(1));
        assert_eq!(platform.tick(), 0);
    }
}
