//! Drawing-loop coordinator.
//!
//! A [`DrawView`] turns platform ticks into frames:
//!
//! ```text
//!   tick ──► try JS lock ──► [JS thread]  record callback into a Picture
//!                                  │
//!                                  └─► try render lock ──► [render thread] replay onto the surface
//! ```
//!
//! Both locks are try-locks. A busy stage turns the frame into a skip plus a
//! redraw request, so slow work lowers the frame rate instead of queueing.

mod config;
mod draw_view;
mod inner;
mod lock;
mod overlay;

pub use config::{DrawingMode, ViewConfig};
pub use draw_view::{DrawCallback, DrawView};
