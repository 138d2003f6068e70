use crate::coords::Vec2;

use super::Color;

/// Gradient spread behavior outside [0, 1] range.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    Pad,
    /// Repeat the gradient pattern.
    Repeat,
    /// Mirror-repeat the gradient pattern.
    Reflect,
}

impl SpreadMode {
    fn apply(self, t: f32) -> f32 {
        match self {
            SpreadMode::Pad => t.clamp(0.0, 1.0),
            SpreadMode::Repeat => t - t.floor(),
            SpreadMode::Reflect => {
                let m = t.rem_euclid(2.0);
                if m > 1.0 { 2.0 - m } else { m }
            }
        }
    }
}

/// A single gradient stop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient between two points.
///
/// `start`/`end` live in the same coordinate space as the geometry they fill,
/// so a gradient recorded in logical pixels scales with the shape. Stops are
/// sorted by `t` on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, mut stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        stops.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { start, end, stops, spread }
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && self.stops.len() >= 2
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }

    /// Evaluates the gradient at parameter `t` after applying the spread mode.
    pub fn sample(&self, t: f32) -> Color {
        let Some(first) = self.stops.first() else {
            return Color::transparent();
        };
        let t = self.spread.apply(t);
        if t <= first.t {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.t) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }

    /// Projects `p` onto the start→end axis and samples there.
    pub fn color_at(&self, p: Vec2) -> Color {
        let axis = self.end - self.start;
        let len2 = axis.dot(axis);
        if len2 <= f32::EPSILON {
            return self.sample(0.0);
        }
        self.sample((p - self.start).dot(axis) / len2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw(spread: SpreadMode) -> LinearGradient {
        LinearGradient::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            vec![ColorStop::new(1.0, Color::white()), ColorStop::new(0.0, Color::black())],
            spread,
        )
    }

    #[test]
    fn stops_are_sorted() {
        let g = bw(SpreadMode::Pad);
        assert_eq!(g.stops[0].t, 0.0);
        assert!(g.is_valid());
    }

    #[test]
    fn midpoint_is_interpolated() {
        let c = bw(SpreadMode::Pad).color_at(Vec2::new(5.0, 3.0));
        assert!((c.r - 0.5).abs() < 1e-5, "got {c:?}");
    }

    #[test]
    fn spread_modes_outside_range() {
        assert_eq!(bw(SpreadMode::Pad).sample(1.5), Color::white());
        assert!((bw(SpreadMode::Repeat).sample(1.25).r - 0.25).abs() < 1e-5);
        assert!((bw(SpreadMode::Reflect).sample(1.25).r - 0.75).abs() < 1e-5);
    }
}
