use crate::coords::{CornerRadii, Rect};
use crate::paint::{Color, Paint};

use super::Border;

/// Rounded rectangle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRectCmd {
    pub rect: Rect,
    pub radii: CornerRadii,
    pub paint: Paint,
    pub border: Option<Border>,
}

impl RoundedRectCmd {
    #[inline]
    pub fn new(rect: Rect, radii: CornerRadii, paint: Paint, border: Option<Border>) -> Self {
        Self { rect, radii, paint, border }
    }

    /// Solid rounded rectangle with a uniform corner radius.
    #[inline]
    pub fn solid(rect: Rect, radius: f32, color: Color) -> Self {
        Self::new(rect, CornerRadii::all(radius), Paint::Solid(color), None)
    }
}
