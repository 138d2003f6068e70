use crate::canvas::Canvas;
use crate::coords::Vec2;
use crate::scene::TextCmd;
use crate::time::TimingStats;

use super::ViewConfig;

/// Overlay line: last JS and GPU averages and their sum.
pub(crate) fn overlay_text(js: &TimingStats, gpu: &TimingStats) -> String {
    let js_ms = js.average_ms();
    let gpu_ms = gpu.average_ms();
    format!("js: {js_ms:.1}ms gpu: {gpu_ms:.1}ms total: {:.1}ms", js_ms + gpu_ms)
}

/// Draws the overlay in logical coordinates at the top-left corner.
pub(crate) fn draw_overlay(canvas: &mut dyn Canvas, config: &ViewConfig, js: &TimingStats, gpu: &TimingStats) {
    let size = config.overlay_size;
    canvas.draw_text(&TextCmd::new(
        overlay_text(js, gpu),
        config.overlay_font,
        size,
        config.overlay_color,
        Vec2::new(size * 0.5, size * 0.5),
    ));
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn text_reports_sum() {
        let js = TimingStats {
            average: Duration::from_micros(1500),
            ..TimingStats::default()
        };
        let gpu = TimingStats {
            average: Duration::from_micros(2500),
            ..TimingStats::default()
        };
        assert_eq!(overlay_text(&js, &gpu), "js: 1.5ms gpu: 2.5ms total: 4.0ms");
    }
}
