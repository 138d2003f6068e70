//! Canvas and surface abstraction.
//!
//! A [`Canvas`] receives drawing calls. Two implementations ship with the crate:
//! - [`DrawList`](crate::scene::DrawList) records calls for later replay
//! - [`RasterSurface`] rasterizes them into an RGBA image on the CPU
//!
//! A [`Surface`] is a canvas with backing pixels: it knows its device size,
//! can be flushed and can produce snapshots. GPU-backed surfaces live outside
//! this crate and plug in through the same trait.

mod raster;
mod recording;

use std::fmt;

use image::RgbaImage;

use crate::coords::{CornerRadii, Rect, Vec2};
use crate::paint::{Color, Paint};
use crate::scene::{CircleCmd, DrawCmd, Picture, RectCmd, RoundedRectCmd, TextCmd};

pub use raster::RasterSurface;

/// Drawing target.
///
/// Coordinates are interpreted through the current transform, which starts as
/// identity and is changed with [`scale`](Canvas::scale) and
/// [`translate`](Canvas::translate). `save`/`restore` bracket transform and
/// clip changes.
pub trait Canvas {
    fn save(&mut self);
    /// Pops the most recent `save`. Extra restores are ignored.
    fn restore(&mut self);
    /// Number of `save`s not yet restored.
    fn save_depth(&self) -> usize;

    fn scale(&mut self, sx: f32, sy: f32);
    fn translate(&mut self, dx: f32, dy: f32);
    /// Intersects the clip with `rect` in current coordinates.
    fn clip_rect(&mut self, rect: Rect);

    /// Replaces every pixel inside the clip with `color`.
    fn clear(&mut self, color: Color);
    fn draw_rect(&mut self, cmd: &RectCmd);
    fn draw_rounded_rect(&mut self, cmd: &RoundedRectCmd);
    fn draw_circle(&mut self, cmd: &CircleCmd);
    fn draw_text(&mut self, cmd: &TextCmd);

    /// Dispatches one recorded command.
    fn apply(&mut self, cmd: &DrawCmd) {
        match cmd {
            DrawCmd::Save => self.save(),
            DrawCmd::Restore => self.restore(),
            DrawCmd::Scale { sx, sy } => self.scale(*sx, *sy),
            DrawCmd::Translate { dx, dy } => self.translate(*dx, *dy),
            DrawCmd::ClipRect(rect) => self.clip_rect(*rect),
            DrawCmd::Clear(color) => self.clear(*color),
            DrawCmd::Rect(c) => self.draw_rect(c),
            DrawCmd::RoundedRect(c) => self.draw_rounded_rect(c),
            DrawCmd::Circle(c) => self.draw_circle(c),
            DrawCmd::Text(c) => self.draw_text(c),
        }
    }

    /// Replays `picture` inside its own save/restore.
    fn draw_picture(&mut self, picture: &Picture) {
        let depth = self.save_depth();
        self.save();
        for cmd in picture.commands() {
            self.apply(cmd);
        }
        while self.save_depth() > depth {
            self.restore();
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.draw_rect(&RectCmd::solid(rect, color));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.draw_rounded_rect(&RoundedRectCmd::new(rect, CornerRadii::all(radius), Paint::Solid(color), None));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.draw_circle(&CircleCmd::solid(center, radius, color));
    }
}

/// A canvas with backing pixels in device space.
pub trait Surface: Send {
    /// Width in device pixels.
    fn width(&self) -> u32;
    /// Height in device pixels.
    fn height(&self) -> u32;
    fn canvas(&mut self) -> &mut dyn Canvas;
    /// Pushes pending work to the backing store. Raster surfaces have none.
    fn flush(&mut self) {}
    /// Copies the current pixels, optionally cropped to `crop` (device pixels).
    fn snapshot(&self, crop: Option<Rect>) -> Result<RgbaImage, SnapshotError>;
}

/// Error returned when a surface cannot produce an image.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// The surface has zero width or height.
    EmptySurface,
    /// The crop rectangle does not overlap the surface.
    CropOutsideSurface(Rect),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::EmptySurface => write!(f, "snapshot of an empty surface"),
            SnapshotError::CropOutsideSurface(r) => write!(
                f,
                "crop rect ({}, {}, {}x{}) lies outside the surface",
                r.origin.x, r.origin.y, r.size.x, r.size.y
            ),
        }
    }
}

impl std::error::Error for SnapshotError {}
