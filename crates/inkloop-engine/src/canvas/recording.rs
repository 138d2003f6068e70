use crate::canvas::Canvas;
use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{CircleCmd, DrawCmd, DrawList, RectCmd, RoundedRectCmd, TextCmd};

/// Recording canvas: every call becomes a command.
impl Canvas for DrawList {
    fn save(&mut self) {
        self.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCmd::Restore);
    }

    fn save_depth(&self) -> usize {
        DrawList::save_depth(self)
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.push(DrawCmd::Scale { sx, sy });
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.push(DrawCmd::Translate { dx, dy });
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.push(DrawCmd::ClipRect(rect));
    }

    fn clear(&mut self, color: Color) {
        self.push(DrawCmd::Clear(color));
    }

    fn draw_rect(&mut self, cmd: &RectCmd) {
        self.push(DrawCmd::Rect(cmd.clone()));
    }

    fn draw_rounded_rect(&mut self, cmd: &RoundedRectCmd) {
        self.push(DrawCmd::RoundedRect(cmd.clone()));
    }

    fn draw_circle(&mut self, cmd: &CircleCmd) {
        self.push(DrawCmd::Circle(cmd.clone()));
    }

    fn draw_text(&mut self, cmd: &TextCmd) {
        self.push(DrawCmd::Text(cmd.clone()));
    }
}
