use std::fmt;
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::canvas::{Canvas, SnapshotError, Surface};
use crate::coords::{CornerRadii, PixelBounds, Rect, Vec2};
use crate::paint::{Color, Paint};
use crate::scene::{CircleCmd, RectCmd, RoundedRectCmd, TextCmd};
use crate::text::FontSystem;

/// Transform + clip in effect between `save`/`restore` pairs.
///
/// Device point = local point * `scale` + `offset`.
#[derive(Debug, Copy, Clone, PartialEq)]
struct CanvasState {
    scale: Vec2,
    offset: Vec2,
    clip: PixelBounds,
}

impl CanvasState {
    fn identity(clip: PixelBounds) -> Self {
        Self { scale: Vec2::new(1.0, 1.0), offset: Vec2::zero(), clip }
    }

    #[inline]
    fn to_device(&self, p: Vec2) -> Vec2 {
        p.scale(self.scale.x, self.scale.y) + self.offset
    }

    #[inline]
    fn to_local(&self, p: Vec2) -> Vec2 {
        let d = p - self.offset;
        Vec2::new(d.x / self.scale.x, d.y / self.scale.y)
    }

    #[inline]
    fn device_rect(&self, r: Rect) -> Rect {
        r.transformed(self.scale, self.offset)
    }

    #[inline]
    fn uniform_scale(&self) -> f32 {
        (self.scale.x.abs() + self.scale.y.abs()) * 0.5
    }
}

/// Pixels whose centers fall inside `r`.
fn center_bounds(r: Rect) -> PixelBounds {
    let r = r.normalized();
    let max = r.max();
    PixelBounds {
        x0: (r.origin.x - 0.5).ceil() as i32,
        y0: (r.origin.y - 0.5).ceil() as i32,
        x1: (max.x - 0.5).ceil() as i32,
        y1: (max.y - 0.5).ceil() as i32,
    }
}

fn circle_coverage(p: Vec2, center: Vec2, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    (radius - (p - center).length() + 0.5).clamp(0.0, 1.0)
}

fn rounded_rect_coverage(p: Vec2, rect: Rect, radii: CornerRadii) -> f32 {
    let (min, max) = (rect.min(), rect.max());
    if rect.is_empty() || p.x < min.x || p.y < min.y || p.x >= max.x || p.y >= max.y {
        return 0.0;
    }
    let radii = radii.clamped(rect.width(), rect.height());
    let corner = |cx: f32, cy: f32, r: f32| circle_coverage(p, Vec2::new(cx, cy), r);

    let (tl, tr, br, bl) = (radii.top_left, radii.top_right, radii.bottom_right, radii.bottom_left);
    if tl > 0.0 && p.x < min.x + tl && p.y < min.y + tl {
        corner(min.x + tl, min.y + tl, tl)
    } else if tr > 0.0 && p.x > max.x - tr && p.y < min.y + tr {
        corner(max.x - tr, min.y + tr, tr)
    } else if br > 0.0 && p.x > max.x - br && p.y > max.y - br {
        corner(max.x - br, max.y - br, br)
    } else if bl > 0.0 && p.x < min.x + bl && p.y > max.y - bl {
        corner(min.x + bl, max.y - bl, bl)
    } else {
        1.0
    }
}

/// CPU surface backed by an RGBA8 image (straight alpha).
///
/// Geometry uses pixel-center sampling: a pixel is covered by a rectangle when
/// its center lies inside it. Circles and rounded corners get a one-pixel
/// coverage ramp.
pub struct RasterSurface {
    pixels: RgbaImage,
    state: CanvasState,
    stack: Vec<CanvasState>,
    fonts: Option<Arc<FontSystem>>,
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("save_depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl RasterSurface {
    /// Creates a transparent surface of `width` x `height` device pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            state: CanvasState::identity(PixelBounds::from_size(width, height)),
            stack: Vec::new(),
            fonts: None,
        }
    }

    pub fn set_fonts(&mut self, fonts: Option<Arc<FontSystem>>) {
        self.fonts = fonts;
    }

    #[inline]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Straight-alpha bytes at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.pixels.width() && y < self.pixels.height()).then(|| self.pixels.get_pixel(x, y).0)
    }

    fn bounds(&self) -> PixelBounds {
        PixelBounds::from_size(self.pixels.width(), self.pixels.height())
    }

    fn blend(&mut self, x: i32, y: i32, color: Color) {
        if color.a <= 0.0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return;
        }
        let px = self.pixels.get_pixel_mut(x, y);
        let dst = Color::from_rgba8(px.0);
        *px = Rgba(color.over(dst).to_rgba8());
    }

    /// Paints every pixel in `area` (clipped) with `paint` weighted by `coverage`.
    fn fill_area<F>(&mut self, area: PixelBounds, paint: &Paint, coverage: F)
    where
        F: Fn(Vec2) -> f32,
    {
        let state = self.state;
        let Some(area) = area.intersect(state.clip) else {
            return;
        };
        for y in area.y0..area.y1 {
            for x in area.x0..area.x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let cov = coverage(p);
                if cov <= 0.0 {
                    continue;
                }
                let color = paint.color_at(state.to_local(p));
                self.blend(x, y, color.scaled(cov));
            }
        }
    }
}

impl Canvas for RasterSurface {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(prev) = self.stack.pop() {
            self.state = prev;
        }
    }

    fn save_depth(&self) -> usize {
        self.stack.len()
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.scale = self.state.scale.scale(sx, sy);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        let s = self.state.scale;
        self.state.offset = self.state.offset + Vec2::new(dx * s.x, dy * s.y);
    }

    fn clip_rect(&mut self, rect: Rect) {
        let device = center_bounds(self.state.device_rect(rect));
        self.state.clip = self.state.clip.intersect(device).unwrap_or_default();
    }

    fn clear(&mut self, color: Color) {
        let Some(area) = self.state.clip.intersect(self.bounds()) else {
            return;
        };
        let value = Rgba(color.to_rgba8());
        for y in area.y0..area.y1 {
            for x in area.x0..area.x1 {
                self.pixels.put_pixel(x as u32, y as u32, value);
            }
        }
    }

    fn draw_rect(&mut self, cmd: &RectCmd) {
        let device = self.state.device_rect(cmd.rect);
        self.fill_area(center_bounds(device), &cmd.paint, |_| 1.0);
    }

    fn draw_rounded_rect(&mut self, cmd: &RoundedRectCmd) {
        let device = self.state.device_rect(cmd.rect);
        let radii = cmd.radii.scaled(self.state.uniform_scale());
        let area = device.round_out();
        self.fill_area(area, &cmd.paint, |p| rounded_rect_coverage(p, device, radii));

        if let Some(border) = cmd.border {
            let w = border.width * self.state.uniform_scale();
            let inner = Rect::new(device.origin.x + w, device.origin.y + w, device.width() - 2.0 * w, device.height() - 2.0 * w);
            let inner_radii = CornerRadii::new(
                (radii.top_left - w).max(0.0),
                (radii.top_right - w).max(0.0),
                (radii.bottom_right - w).max(0.0),
                (radii.bottom_left - w).max(0.0),
            );
            self.fill_area(area, &Paint::Solid(border.color), |p| {
                rounded_rect_coverage(p, device, radii) * (1.0 - rounded_rect_coverage(p, inner, inner_radii))
            });
        }
    }

    fn draw_circle(&mut self, cmd: &CircleCmd) {
        let center = self.state.to_device(cmd.center);
        let radius = cmd.radius * self.state.uniform_scale();
        let area = Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0).round_out();
        self.fill_area(area, &cmd.paint, |p| circle_coverage(p, center, radius));

        if let Some(border) = cmd.border {
            let inner = radius - border.width * self.state.uniform_scale();
            self.fill_area(area, &Paint::Solid(border.color), |p| {
                circle_coverage(p, center, radius) * (1.0 - circle_coverage(p, center, inner))
            });
        }
    }

    fn draw_text(&mut self, cmd: &TextCmd) {
        let Some(fonts) = self.fonts.clone() else {
            return;
        };
        let state = self.state;
        let origin = state.to_device(cmd.origin);
        let glyphs = fonts.rasterize(&cmd.text, cmd.font, cmd.size, cmd.max_width, state.uniform_scale());
        for g in glyphs {
            let gx = (origin.x + g.x).round() as i32;
            let gy = (origin.y + g.y).round() as i32;
            for row in 0..g.height {
                for col in 0..g.width {
                    let a = g.coverage[row * g.width + col];
                    if a == 0 {
                        continue;
                    }
                    let (x, y) = (gx + col as i32, gy + row as i32);
                    let c = state.clip;
                    if x < c.x0 || x >= c.x1 || y < c.y0 || y >= c.y1 {
                        continue;
                    }
                    self.blend(x, y, cmd.color.scaled(a as f32 / 255.0));
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        self
    }

    fn snapshot(&self, crop: Option<Rect>) -> Result<RgbaImage, SnapshotError> {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return Err(SnapshotError::EmptySurface);
        }
        let area = match crop {
            None => bounds,
            Some(r) => r
                .round_out()
                .intersect(bounds)
                .ok_or(SnapshotError::CropOutsideSurface(r))?,
        };
        Ok(image::imageops::crop_imm(&self.pixels, area.x0 as u32, area.y0 as u32, area.width(), area.height()).to_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PictureRecorder;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn red() -> Color {
        Color::from_srgb_u8(255, 0, 0, 255)
    }

    #[test]
    fn scaled_rect_lands_on_device_pixels() {
        let mut s = RasterSurface::new(64, 64);
        s.save();
        s.scale(2.0, 2.0);
        s.fill_rect(Rect::new(10.0, 10.0, 5.0, 5.0), red());
        s.restore();

        assert_eq!(s.pixel(19, 19), Some(CLEAR));
        assert_eq!(s.pixel(20, 20), Some(RED));
        assert_eq!(s.pixel(29, 29), Some(RED));
        assert_eq!(s.pixel(30, 30), Some(CLEAR));
    }

    #[test]
    fn clip_limits_fill_and_restore_lifts_it() {
        let mut s = RasterSurface::new(10, 10);
        s.save();
        s.clip_rect(Rect::new(0.0, 0.0, 5.0, 10.0));
        s.fill_rect(Rect::from_size(10.0, 10.0), red());
        s.restore();
        assert_eq!(s.pixel(4, 0), Some(RED));
        assert_eq!(s.pixel(5, 0), Some(CLEAR));

        s.fill_rect(Rect::from_size(10.0, 10.0), red());
        assert_eq!(s.pixel(9, 9), Some(RED));
    }

    #[test]
    fn translate_respects_current_scale() {
        let mut s = RasterSurface::new(20, 20);
        s.scale(2.0, 2.0);
        s.translate(3.0, 0.0);
        s.fill_rect(Rect::from_size(1.0, 1.0), red());
        assert_eq!(s.pixel(6, 0), Some(RED));
        assert_eq!(s.pixel(5, 0), Some(CLEAR));
    }

    #[test]
    fn circle_covers_center_not_corners() {
        let mut s = RasterSurface::new(20, 20);
        s.fill_circle(Vec2::new(10.0, 10.0), 5.0, red());
        assert_eq!(s.pixel(10, 10), Some(RED));
        assert_eq!(s.pixel(0, 0), Some(CLEAR));
        assert_eq!(s.pixel(14, 14), Some(CLEAR));
    }

    #[test]
    fn rounded_corner_is_cut() {
        let mut s = RasterSurface::new(20, 20);
        s.fill_rounded_rect(Rect::from_size(20.0, 20.0), 8.0, red());
        assert_eq!(s.pixel(0, 0), Some(CLEAR));
        assert_eq!(s.pixel(10, 10), Some(RED));
        assert_eq!(s.pixel(10, 0), Some(RED));
    }

    #[test]
    fn replayed_picture_matches_direct_drawing() {
        let draw = |c: &mut dyn Canvas| {
            c.clear(Color::white());
            c.scale(3.0, 3.0);
            c.fill_circle(Vec2::new(4.0, 4.0), 3.0, red());
            c.fill_rect(Rect::new(1.0, 6.0, 5.0, 2.0), Color::black());
        };

        let mut direct = RasterSurface::new(30, 30);
        draw(&mut direct);

        let mut rec = PictureRecorder::new();
        draw(rec.begin_recording(Rect::from_size(30.0, 30.0)));
        let picture = rec.finish_recording();
        let mut replayed = RasterSurface::new(30, 30);
        replayed.draw_picture(&picture);

        assert_eq!(direct.pixels(), replayed.pixels());
        assert_eq!(replayed.save_depth(), 0);
    }

    #[test]
    fn snapshot_crops_to_device_rect() {
        let mut s = RasterSurface::new(10, 10);
        s.fill_rect(Rect::new(2.0, 2.0, 2.0, 2.0), red());
        let img = s.snapshot(Some(Rect::new(2.0, 2.0, 4.0, 3.0))).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
        assert_eq!(img.get_pixel(0, 0).0, RED);
        assert_eq!(img.get_pixel(3, 2).0, CLEAR);
    }

    #[test]
    fn snapshot_errors() {
        let s = RasterSurface::new(10, 10);
        let outside = Rect::new(20.0, 20.0, 5.0, 5.0);
        assert_eq!(s.snapshot(Some(outside)), Err(SnapshotError::CropOutsideSurface(outside)));
        assert_eq!(RasterSurface::new(0, 4).snapshot(None), Err(SnapshotError::EmptySurface));
    }
}
