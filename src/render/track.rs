use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::core::Point;
use crate::foundation::error::{TrackmapError, TrackmapResult};
use crate::render::canvas::Canvas;
use crate::render::raster::{layer_paint, point_to_cpu, rasterize_layer};

/// How the GPS track polyline is stroked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrokeStyle {
    /// Stroke colour (default `#FF0000`).
    pub color: Color,
    /// Stroke width in pixels (default 3).
    pub width: f64,
    /// Smooth stroke edges (default off).
    pub antialias: bool,
    /// Opacity of the whole track layer, `0..=1` (default 1).
    pub opacity: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0xff, 0x00, 0x00),
            width: 3.0,
            antialias: false,
            opacity: 1.0,
        }
    }
}

impl StrokeStyle {
    pub fn validate(&self) -> TrackmapResult<()> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(TrackmapError::invalid_config(format!(
                "stroke width must be finite and >= 0, got {}",
                self.width
            )));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(TrackmapError::invalid_config(format!(
                "stroke opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

/// One straight piece of the track, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Queues track segments and paints them all in one batch.
///
/// Segments are stroked in insertion order into a single layer, which is then
/// source-over composited at the style's opacity.
#[derive(Clone, Debug)]
pub struct TrackRenderer {
    style: StrokeStyle,
    segments: Vec<Segment>,
}

impl TrackRenderer {
    pub fn new(style: StrokeStyle) -> TrackmapResult<Self> {
        style.validate()?;
        Ok(Self {
            style,
            segments: Vec::new(),
        })
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn line(&mut self, xa: f64, ya: f64, xb: f64, yb: f64) {
        self.segments.push(Segment {
            from: Point::new(xa, ya),
            to: Point::new(xb, yb),
        });
    }

    /// Queue a segment between each pair of consecutive points.
    pub fn add_polyline<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Point>,
    {
        let mut prev: Option<Point> = None;
        for p in points {
            if let Some(a) = prev {
                self.segments.push(Segment { from: a, to: p });
            }
            prev = Some(p);
        }
    }

    /// Every segment endpoint, in queue order.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments.iter().flat_map(|s| [s.from, s.to])
    }

    #[tracing::instrument(skip_all, fields(segments = self.segments.len()))]
    pub fn draw(&self, canvas: &mut Canvas) -> TrackmapResult<()> {
        if self.segments.is_empty() || self.style.width <= 0.0 || self.style.opacity <= 0.0 {
            return Ok(());
        }

        let (paint, alpha) = layer_paint(self.style.color, self.style.antialias);
        let layer = rasterize_layer(canvas.width(), canvas.height(), self.style.antialias, |ctx| {
            ctx.set_paint(paint);
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(self.style.width));
            for seg in &self.segments {
                let mut path = vello_cpu::kurbo::BezPath::new();
                path.move_to(point_to_cpu(seg.from));
                path.line_to(point_to_cpu(seg.to));
                ctx.stroke_path(&path);
            }
            Ok(())
        })?;
        canvas.composite_layer(&layer, self.style.opacity * alpha)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/track.rs"]
mod tests;
