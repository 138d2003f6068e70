//! Geometry shared by the recorder, the canvases and the view.
//!
//! Two spaces are in play:
//! - logical pixels: what drawing callbacks see (device pixels / pixel density)
//! - device pixels: what surfaces store
//!
//! Both use a top-left origin with +X right and +Y down. The recorder scales
//! logical into device space with a `Scale` command, so geometry types stay
//! unit-agnostic.

mod corner_radii;
mod rect;
mod vec2;

pub use corner_radii::CornerRadii;
pub use rect::{PixelBounds, Rect};
pub use vec2::Vec2;
