//! Per-frame state exposed to drawing callbacks.
//!
//! The view owns a [`FrameState`]; callbacks only ever see a [`FrameInfo`]
//! snapshot, so user code cannot reach the view's bookkeeping.

mod info;
mod state;

pub use info::FrameInfo;
pub(crate) use state::FrameState;
