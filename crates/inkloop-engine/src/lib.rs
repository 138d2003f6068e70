//! Inkloop engine crate.
//!
//! A drawing-loop coordinator that records user drawing on a JS thread and
//! replays it on a render thread, plus the canvas, scene and platform pieces
//! it runs on.

pub mod canvas;
pub mod coords;
pub mod frame;
pub mod input;
pub mod logging;
pub mod paint;
pub mod platform;
pub mod scene;
pub mod text;
pub mod time;
pub mod view;

pub use view::{DrawCallback, DrawView, DrawingMode, ViewConfig};
