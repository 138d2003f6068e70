//! Host platform contract.
//!
//! The view never creates threads. Everything it needs from the host goes
//! through [`PlatformContext`]:
//!
//! ```text
//!   tick driver ──► TickFn(view) ──► run_on_js_thread(record)
//!                                          │
//!                                          ▼
//!                                 run_on_render_thread(replay)
//! ```
//!
//! Two implementations ship with the crate: [`ThreadedPlatform`] (real worker
//! threads and a ticker) and [`ManualPlatform`] (deterministic, driven by the
//! caller; meant for tests).

mod manual;
mod registry;
mod threaded;

use std::fmt;
use std::num::NonZeroU64;
use std::sync::Arc;

pub use manual::{FrameReport, ManualPlatform};
pub use threaded::{PlatformConfig, ThreadedPlatform};

pub(crate) use registry::LoopRegistry;

/// Work queued on the logical JS thread.
///
/// Errors are the drawing callback's own failures; the platform decides how to
/// report them.
pub type JsWork = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

/// Work queued on the logical render thread.
pub type RenderWork = Box<dyn FnOnce() + Send + 'static>;

/// Per-frame callback. The flag reports whether the host invalidated the view
/// since the previous tick.
pub type TickFn = Arc<dyn Fn(bool) + Send + Sync + 'static>;

/// Identity correlating a view with its host-side counterpart.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Registration of a draw loop. Never zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DrawLoopHandle(NonZeroU64);

impl DrawLoopHandle {
    /// `None` for the reserved value 0 ("not registered").
    #[inline]
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Services a host supplies to drawing views.
pub trait PlatformContext: Send + Sync {
    /// Enqueues `work` on the logical JS thread.
    fn run_on_js_thread(&self, work: JsWork);

    /// Enqueues `work` on the logical render thread.
    fn run_on_render_thread(&self, work: RenderWork);

    /// Device pixels per logical pixel.
    fn pixel_density(&self) -> f32;

    /// Registers `on_tick` to be called once per display frame for `view_id`.
    ///
    /// Returns `None` when the host refuses the registration.
    fn begin_draw_loop(&self, view_id: ViewId, on_tick: TickFn) -> Option<DrawLoopHandle>;

    /// Unregisters the loop for `view_id`. Unknown ids are ignored.
    fn end_draw_loop(&self, view_id: ViewId);
}
