use crate::coords::{Rect, Vec2};
use crate::paint::{Color, Paint};

use super::Border;

/// Circle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub paint: Paint,
    pub border: Option<Border>,
}

impl CircleCmd {
    #[inline]
    pub fn new(center: Vec2, radius: f32, paint: Paint, border: Option<Border>) -> Self {
        Self { center, radius, paint, border }
    }

    #[inline]
    pub fn solid(center: Vec2, radius: f32, color: Color) -> Self {
        Self::new(center, radius, Paint::Solid(color), None)
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        let r = self.radius.max(0.0);
        Rect::new(self.center.x - r, self.center.y - r, r * 2.0, r * 2.0)
    }
}
