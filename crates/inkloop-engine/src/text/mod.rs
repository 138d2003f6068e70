//! Font loading and glyph coverage for the raster canvas.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem, GlyphCoverage};
