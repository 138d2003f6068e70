/// Per-corner radii for a rounded rectangle.
///
/// Corners follow CSS convention: top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    #[inline]
    pub const fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self { top_left, top_right, bottom_right, bottom_left }
    }

    /// Uniform radius on all four corners.
    #[inline]
    pub const fn all(r: f32) -> Self {
        Self { top_left: r, top_right: r, bottom_right: r, bottom_left: r }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    /// Multiplies every radius, used when the recorder scale reaches the rasterizer.
    #[inline]
    pub fn scaled(self, s: f32) -> Self {
        Self::new(self.top_left * s, self.top_right * s, self.bottom_right * s, self.bottom_left * s)
    }

    /// Radii with negatives treated as zero and each clamped to half the shorter side.
    #[inline]
    pub fn clamped(self, width: f32, height: f32) -> Self {
        let max = (width.min(height) * 0.5).max(0.0);
        let c = |r: f32| r.clamp(0.0, max);
        Self::new(c(self.top_left), c(self.top_right), c(self.bottom_right), c(self.bottom_left))
    }
}
