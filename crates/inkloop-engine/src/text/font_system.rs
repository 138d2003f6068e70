use std::fmt;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

impl FontId {
    /// The first font loaded into a system. Debug overlays use it unless configured otherwise.
    pub const DEFAULT: FontId = FontId(0);
}

/// Coverage bitmap for one positioned glyph, in the pixel space it was laid out in.
#[derive(Debug, Clone)]
pub struct GlyphCoverage {
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
    /// Row-major, one byte per pixel.
    pub coverage: Vec<u8>,
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading, so a system is shared between threads
/// behind an `Arc` and handed to every raster surface that draws text.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl fmt::Debug for FontSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSystem").field("fonts", &self.fonts.len()).finish()
    }
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        log::debug!("loaded font {:?}", id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    fn layout(&self, font: &fontdue::Font, text: &str, px: f32, max_width: Option<f32>) -> Layout<()> {
        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings { max_width, ..LayoutSettings::default() });
        layout.append(&[font], &TextStyle::new(text, px, 0));
        layout
    }

    /// Lays out and rasterizes `text` at `size * scale` pixels.
    ///
    /// Positions are relative to the text origin, already multiplied by
    /// `scale`. Returns an empty list when the font is unknown.
    pub fn rasterize(
        &self,
        text: &str,
        id: FontId,
        size: f32,
        max_width: Option<f32>,
        scale: f32,
    ) -> Vec<GlyphCoverage> {
        let Some(font) = self.get(id) else {
            return Vec::new();
        };

        let scale = scale.max(0.01);
        let layout = self.layout(font, text, size * scale, max_width.map(|w| w * scale));
        layout
            .glyphs()
            .iter()
            .filter(|g| g.width > 0 && g.height > 0)
            .map(|g| {
                let (_, coverage) = font.rasterize_indexed(g.key.glyph_index, g.key.px);
                GlyphCoverage {
                    x: g.x,
                    y: g.y,
                    width: g.width,
                    height: g.height,
                    coverage,
                }
            })
            .collect()
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_font_rasterizes_nothing() {
        let fonts = FontSystem::new();
        assert!(fonts.rasterize("hello", FontId::DEFAULT, 10.0, None, 2.0).is_empty());
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"not a font").is_err());
        assert!(fonts.is_empty());
    }
}
