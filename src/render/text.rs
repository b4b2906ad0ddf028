use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::core::Point;
use crate::foundation::error::{TrackmapError, TrackmapResult};
use crate::render::canvas::Canvas;
use crate::render::raster::{layer_paint, rasterize_layer};

/// Which end of the text sits on the anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
}

/// Font and placement options for labels and the legend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    /// Preferred family; unresolvable names fall back to `sans-serif`.
    pub font_family: String,
    /// Size in points, rendered at 72 dpi (so points equal pixels).
    pub point_size: f32,
    pub antialias: bool,
    pub alignment: TextAlign,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "helvetica".to_owned(),
            point_size: 12.0,
            antialias: false,
            alignment: TextAlign::Left,
            color: Color::BLACK,
        }
    }
}

impl TextStyle {
    pub fn validate(&self) -> TrackmapResult<()> {
        if !self.point_size.is_finite() || self.point_size <= 0.0 {
            return Err(TrackmapError::invalid_config(format!(
                "text point_size must be finite and > 0, got {}",
                self.point_size
            )));
        }
        if self.font_family.trim().is_empty() {
            return Err(TrackmapError::invalid_config(
                "text font_family must not be empty",
            ));
        }
        Ok(())
    }
}

/// Brush carried through Parley layouts (straight RGBA8).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Horizontal advance and first-line baseline of a laid out string, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub baseline: f32,
}

struct ShapedRun {
    font: vello_cpu::peniko::FontData,
    font_size: f32,
    glyphs: Vec<vello_cpu::Glyph>,
}

/// Shapes text with Parley and rasterizes glyph runs with `vello_cpu`.
///
/// Families registered through [`TextLayoutEngine::register_font`] are resolved before
/// system fonts.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    cpu_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("cached_fonts", &self.cpu_fonts.len())
            .finish_non_exhaustive()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            cpu_fonts: HashMap::new(),
        }
    }

    /// Register a TTF/OTF font and return its family name.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> TrackmapResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            TrackmapError::decode("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TrackmapError::decode("registered font family has no name"))?
            .to_string();
        tracing::debug!(family = %family_name, "registered font");
        Ok(family_name)
    }

    fn layout(
        &mut self,
        text: &str,
        style: &TextStyle,
    ) -> TrackmapResult<parley::Layout<TextBrushRgba8>> {
        style.validate()?;

        let c = style.color;
        let stack = format!("\"{}\", sans-serif", style.font_family.replace('"', ""));
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.point_size));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }

    /// Width and baseline of `text` as it would be drawn with `style`.
    pub fn measure(&mut self, text: &str, style: &TextStyle) -> TrackmapResult<TextExtent> {
        let layout = self.layout(text, style)?;
        let baseline = layout
            .lines()
            .next()
            .map(|l| l.metrics().baseline)
            .unwrap_or(0.0);
        Ok(TextExtent {
            width: layout.width(),
            baseline,
        })
    }

    /// Draw `text` with its baseline on `anchor.y`.
    ///
    /// Left-aligned text starts at `anchor.x`; right-aligned text ends there.
    pub fn draw_text(
        &mut self,
        canvas: &mut Canvas,
        text: &str,
        anchor: Point,
        style: &TextStyle,
    ) -> TrackmapResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let layout = self.layout(text, style)?;
        let Some(baseline) = layout.lines().next().map(|l| l.metrics().baseline) else {
            return Ok(());
        };
        let origin_x = match style.alignment {
            TextAlign::Left => anchor.x,
            TextAlign::Right => anchor.x - f64::from(layout.width()),
        };
        let origin_y = anchor.y - f64::from(baseline);

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let font = run.run().font();
                let key = (font.data.id(), font.index);
                let cpu_font = self
                    .cpu_fonts
                    .entry(key)
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(font.data.data().to_vec()),
                            font.index,
                        )
                    })
                    .clone();
                runs.push(ShapedRun {
                    font: cpu_font,
                    font_size: run.run().font_size(),
                    glyphs: run
                        .glyphs()
                        .map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        })
                        .collect(),
                });
            }
        }
        if runs.is_empty() {
            tracing::debug!(text, family = %style.font_family, "no glyphs resolved");
            return Ok(());
        }

        let (paint, alpha) = layer_paint(style.color, style.antialias);
        let layer = rasterize_layer(canvas.width(), canvas.height(), style.antialias, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin_x, origin_y)));
            ctx.set_paint(paint);
            for run in runs {
                ctx.glyph_run(&run.font)
                    .font_size(run.font_size)
                    .fill_glyphs(run.glyphs.into_iter());
            }
            Ok(())
        })?;
        canvas.composite_layer(&layer, alpha)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
