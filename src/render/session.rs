use std::path::Path;

use crate::config::RenderConfig;
use crate::encode::output::{OutputFormat, encode_canvas, save_canvas};
use crate::foundation::core::{PixelBounds, Point};
use crate::foundation::error::{TrackmapError, TrackmapResult};
use crate::render::canvas::Canvas;
use crate::render::crop::CropPlan;
use crate::render::legend::draw_legend;
use crate::render::overlay::{PointOfInterest, draw_points};
use crate::render::text::TextLayoutEngine;
use crate::render::tiles::{blank_tile, composite_tile};
use crate::render::track::TrackRenderer;

enum SessionState {
    Composing(Canvas),
    Rendered(Canvas),
}

/// Drives one output image from blank canvas to encoded bytes.
///
/// Tiles are composited as they are added. Everything else is queued and drawn by
/// [`RenderSession::render`] in a fixed order: track, POI markers, POI labels, crop,
/// legend. Rendering happens once; later output calls reuse the result, and any
/// further drawing call fails.
pub struct RenderSession {
    config: RenderConfig,
    text: TextLayoutEngine,
    track: TrackRenderer,
    points: Vec<PointOfInterest>,
    crop: CropPlan,
    license: String,
    state: SessionState,
}

impl RenderSession {
    /// Validate `config` and allocate a `width` x `height` canvas filled with its background.
    pub fn new(width: u32, height: u32, config: RenderConfig) -> TrackmapResult<Self> {
        config.validate()?;
        let canvas = Canvas::filled(width, height, config.background.to_rgba8_premul())?;
        Ok(Self {
            track: TrackRenderer::new(config.stroke.clone())?,
            crop: CropPlan::new(config.crop),
            config,
            text: TextLayoutEngine::new(),
            points: Vec::new(),
            license: String::new(),
            state: SessionState::Composing(canvas),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Current canvas size; shrinks once a crop has been rendered.
    pub fn dimensions(&self) -> (u32, u32) {
        match &self.state {
            SessionState::Composing(c) | SessionState::Rendered(c) => c.dimensions(),
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self.state, SessionState::Rendered(_))
    }

    /// The final canvas, once [`RenderSession::render`] has succeeded.
    pub fn rendered_canvas(&self) -> Option<&Canvas> {
        match &self.state {
            SessionState::Rendered(c) => Some(c),
            SessionState::Composing(_) => None,
        }
    }

    pub fn crop_plan(&self) -> &CropPlan {
        &self.crop
    }

    fn composing_canvas(&mut self) -> TrackmapResult<&mut Canvas> {
        match &mut self.state {
            SessionState::Composing(c) => Ok(c),
            SessionState::Rendered(_) => Err(TrackmapError::invalid_config(
                "session is already rendered; start a new session to draw more",
            )),
        }
    }

    fn ensure_composing(&self) -> TrackmapResult<()> {
        match self.state {
            SessionState::Composing(_) => Ok(()),
            SessionState::Rendered(_) => Err(TrackmapError::invalid_config(
                "session is already rendered; start a new session to draw more",
            )),
        }
    }

    /// Register a font so label and legend styles can name its family.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> TrackmapResult<String> {
        self.text.register_font(font_bytes)
    }

    pub fn add_tile(&mut self, tile_bytes: &[u8], x: i64, y: i64) -> TrackmapResult<()> {
        composite_tile(self.composing_canvas()?, tile_bytes, x, y)
    }

    /// Composite a grey placeholder tile, for tiles that could not be fetched.
    pub fn add_blank_tile(
        &mut self,
        width: u32,
        height: u32,
        index: u64,
        x: i64,
        y: i64,
    ) -> TrackmapResult<()> {
        let bytes = blank_tile(width, height, index)?;
        self.add_tile(&bytes, x, y)
    }

    pub fn line(&mut self, xa: f64, ya: f64, xb: f64, yb: f64) -> TrackmapResult<()> {
        self.ensure_composing()?;
        self.track.line(xa, ya, xb, yb);
        Ok(())
    }

    pub fn add_polyline<I>(&mut self, points: I) -> TrackmapResult<()>
    where
        I: IntoIterator<Item = Point>,
    {
        self.ensure_composing()?;
        self.track.add_polyline(points);
        Ok(())
    }

    /// Queue a POI; sequence order is draw order.
    pub fn add_poi(&mut self, poi: PointOfInterest) -> TrackmapResult<()> {
        self.ensure_composing()?;
        self.points.push(poi);
        Ok(())
    }

    pub fn set_license(&mut self, text: impl Into<String>) -> TrackmapResult<()> {
        self.ensure_composing()?;
        self.license = text.into();
        Ok(())
    }

    /// Explicit-bounds crop: keep `bounds` plus the configured margin.
    pub fn set_crop(&mut self, bounds: PixelBounds) -> TrackmapResult<()> {
        self.ensure_composing()?;
        let (w, h) = self.dimensions();
        self.crop.set_bounds(w, h, bounds);
        Ok(())
    }

    /// Fixed-size crop around a centre; enables cropping and zeroes the margin.
    pub fn set_crop_fixed(
        &mut self,
        x_center: i64,
        y_center: i64,
        width: u32,
        height: u32,
    ) -> TrackmapResult<()> {
        self.ensure_composing()?;
        let (w, h) = self.dimensions();
        self.crop
            .set_fixed(w, h, (x_center, y_center), width, height);
        Ok(())
    }

    /// Bounds of every queued track vertex and POI anchor.
    pub fn content_bounds(&self) -> Option<PixelBounds> {
        PixelBounds::enclosing(
            self.track
                .vertices()
                .chain(self.points.iter().map(PointOfInterest::anchor)),
        )
    }

    /// Crop to the queued content plus margin.
    pub fn crop_to_content(&mut self) -> TrackmapResult<()> {
        match self.content_bounds() {
            Some(bounds) => self.set_crop(bounds),
            None => Ok(()),
        }
    }

    /// Run the draw pipeline if it has not run yet and return the final canvas.
    ///
    /// On error the session stays in the composing state and nothing is output.
    #[tracing::instrument(skip(self))]
    pub fn render(&mut self) -> TrackmapResult<&Canvas> {
        if let SessionState::Composing(base) = &self.state {
            let mut canvas = base.clone();
            self.track.draw(&mut canvas)?;
            draw_points(&mut canvas, &self.points, &mut self.text, &self.config.labels)?;
            let mut canvas = self.crop.apply(canvas)?;
            draw_legend(&mut canvas, &self.license, &mut self.text, &self.config.legend)?;
            tracing::debug!(
                w = canvas.width(),
                h = canvas.height(),
                points = self.points.len(),
                "rendered"
            );
            self.state = SessionState::Rendered(canvas);
        }
        match &self.state {
            SessionState::Rendered(c) => Ok(c),
            SessionState::Composing(_) => Err(TrackmapError::Other(anyhow::anyhow!(
                "internal error: render did not complete"
            ))),
        }
    }

    pub fn to_bytes(&mut self, format: OutputFormat) -> TrackmapResult<Vec<u8>> {
        encode_canvas(self.render()?, format)
    }

    pub fn to_png(&mut self) -> TrackmapResult<Vec<u8>> {
        self.to_bytes(OutputFormat::Png)
    }

    /// Render and write to `path`; the format follows the extension.
    pub fn save(&mut self, path: &Path) -> TrackmapResult<()> {
        save_canvas(self.render()?, path)
    }

    /// Consume the session, returning the rendered canvas.
    pub fn into_canvas(mut self) -> TrackmapResult<Canvas> {
        self.render()?;
        match self.state {
            SessionState::Rendered(c) | SessionState::Composing(c) => Ok(c),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
