//! Time subsystem.
//!
//! - [`FrameClock`] stamps each frame with a monotonic timestamp and clamped delta.
//! - [`TimingInfo`] tracks how long the recording (JS) and replay (GPU) stages take.

mod frame_clock;
mod timing_info;

pub use frame_clock::{FrameClock, FrameTime};
pub use timing_info::{TimingInfo, TimingStats};
