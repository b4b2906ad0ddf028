use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::core::Point;
use crate::foundation::error::TrackmapResult;
use crate::render::canvas::Canvas;
use crate::render::text::{TextLayoutEngine, TextStyle};

/// Horizontal distance from a POI anchor to the start of its label.
pub const LABEL_OFFSET_X: i64 = 10;
/// Vertical distance from a POI anchor to its label baseline.
pub const LABEL_OFFSET_Y: i64 = 2;

/// A marker image plus label pinned to a pre-projected pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointOfInterest {
    pub x: i64,
    pub y: i64,
    /// Encoded marker image (any format `image` can sniff).
    pub marker: Vec<u8>,
    pub label: String,
}

impl PointOfInterest {
    pub fn new(x: i64, y: i64, marker: Vec<u8>, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            marker,
            label: label.into(),
        }
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    /// Top-left corner that centres a `width` x `height` marker on the anchor.
    pub fn centered_origin(&self, width: u32, height: u32) -> (i64, i64) {
        (
            self.x.saturating_sub(i64::from(width / 2)),
            self.y.saturating_sub(i64::from(height / 2)),
        )
    }

    pub fn label_anchor(&self) -> Point {
        Point::new(
            self.x.saturating_add(LABEL_OFFSET_X) as f64,
            self.y.saturating_add(LABEL_OFFSET_Y) as f64,
        )
    }
}

/// Draw every marker, then every label.
///
/// Markers go down in sequence order, so a later marker covers an earlier one where
/// they overlap. Labels are drawn only after the last marker, so no marker ever covers a
/// label. All markers are decoded before the canvas is touched.
#[tracing::instrument(skip_all, fields(points = points.len()))]
pub fn draw_points(
    canvas: &mut Canvas,
    points: &[PointOfInterest],
    text: &mut TextLayoutEngine,
    style: &TextStyle,
) -> TrackmapResult<()> {
    let markers = points
        .iter()
        .map(|p| decode_image(&p.marker))
        .collect::<TrackmapResult<Vec<DecodedImage>>>()?;

    for (p, marker) in points.iter().zip(&markers) {
        let (x, y) = p.centered_origin(marker.width, marker.height);
        canvas.composite_image(marker, x, y)?;
    }

    for p in points {
        text.draw_text(canvas, &format!("{} ", p.label), p.label_anchor(), style)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
