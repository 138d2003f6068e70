use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::shapes::{CircleCmd, RectCmd, RoundedRectCmd, TextCmd};

/// Renderer-agnostic draw command stream.
///
/// State commands (`Save`, `Restore`, `Scale`, `Translate`, `ClipRect`) are
/// recorded inline so playback reproduces the transform the recorder saw.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here
/// - add the matching method on `canvas::Canvas` and its raster implementation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Save,
    Restore,
    Scale { sx: f32, sy: f32 },
    Translate { dx: f32, dy: f32 },
    ClipRect(Rect),
    Clear(Color),
    Rect(RectCmd),
    RoundedRect(RoundedRectCmd),
    Circle(CircleCmd),
    Text(TextCmd),
}

impl DrawCmd {
    /// True for commands that change canvas state rather than pixels.
    #[inline]
    pub fn is_state(&self) -> bool {
        matches!(
            self,
            DrawCmd::Save | DrawCmd::Restore | DrawCmd::Scale { .. } | DrawCmd::Translate { .. } | DrawCmd::ClipRect(_)
        )
    }
}
