use crate::coords::Vec2;
use crate::paint::Color;
use crate::text::FontId;

/// Text draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub font: FontId,
    /// Font size in the recording space.
    pub size: f32,
    pub color: Color,
    /// Top-left of the text block.
    pub origin: Vec2,
    /// Wrapping width. `None` = no wrapping.
    pub max_width: Option<f32>,
}

impl TextCmd {
    pub fn new(text: impl Into<String>, font: FontId, size: f32, color: Color, origin: Vec2) -> Self {
        Self {
            text: text.into(),
            font,
            size,
            color,
            origin,
            max_width: None,
        }
    }
}
