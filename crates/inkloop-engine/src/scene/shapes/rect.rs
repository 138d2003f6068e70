use crate::coords::Rect;
use crate::paint::{Color, Paint};

/// Rectangle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub paint: Paint,
}

impl RectCmd {
    #[inline]
    pub fn new(rect: Rect, paint: Paint) -> Self {
        Self { rect, paint }
    }

    #[inline]
    pub fn solid(rect: Rect, color: Color) -> Self {
        Self::new(rect, Paint::Solid(color))
    }
}
