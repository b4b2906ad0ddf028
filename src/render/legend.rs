use crate::foundation::core::Point;
use crate::foundation::error::TrackmapResult;
use crate::render::canvas::Canvas;
use crate::render::text::{TextLayoutEngine, TextStyle};

/// Gap between the legend and the right and bottom canvas edges.
pub const LEGEND_INSET: f64 = 10.0;

/// Anchor of the legend for a canvas of the given size.
pub fn legend_anchor(width: u32, height: u32) -> Point {
    Point::new(
        f64::from(width) - LEGEND_INSET,
        f64::from(height) - LEGEND_INSET,
    )
}

/// Draw attribution text against the bottom-right corner of `canvas` as it is now.
///
/// The anchor is the end of the text baseline, so descenders can reach into the inset.
/// Call this on the final, already cropped canvas.
pub fn draw_legend(
    canvas: &mut Canvas,
    text: &str,
    engine: &mut TextLayoutEngine,
    style: &TextStyle,
) -> TrackmapResult<()> {
    let anchor = legend_anchor(canvas.width(), canvas.height());
    engine.draw_text(canvas, text, anchor, style)
}

#[cfg(test)]
#[path = "../../tests/unit/render/legend.rs"]
mod tests;
