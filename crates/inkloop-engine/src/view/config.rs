use std::sync::Arc;

use crate::paint::Color;
use crate::text::{FontId, FontSystem};
use crate::time::TimingInfo;

/// When the loop draws.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DrawingMode {
    /// Only after a redraw request.
    #[default]
    Default,
    /// On every tick.
    Continuous,
}

/// View configuration.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub drawing_mode: DrawingMode,
    pub show_debug_overlay: bool,
    /// Font for the debug overlay. Looked up in the fonts of the target surface.
    pub overlay_font: FontId,
    /// Overlay text size in logical pixels.
    pub overlay_size: f32,
    pub overlay_color: Color,
    /// Samples kept by each timing tracker.
    pub timing_window: usize,
    /// Fonts given to the raster target of image snapshots.
    pub snapshot_fonts: Option<Arc<FontSystem>>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            drawing_mode: DrawingMode::Default,
            show_debug_overlay: false,
            overlay_font: FontId::DEFAULT,
            overlay_size: 12.0,
            overlay_color: Color::from_srgb_u8(255, 0, 0, 255),
            timing_window: TimingInfo::DEFAULT_WINDOW,
            snapshot_fonts: None,
        }
    }
}
