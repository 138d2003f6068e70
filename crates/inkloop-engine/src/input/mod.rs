//! Touch ingestion.
//!
//! Hosts translate their native pointer/touch events into [`TouchPoint`]s and
//! push them through [`DrawView::update_touches`](crate::view::DrawView::update_touches).
//! The [`TouchBuffer`] keeps the latest batch until a frame that actually runs
//! the drawing callback consumes it.

mod state;
mod types;

pub use state::TouchBuffer;
pub use types::{TouchKind, TouchPoint};
