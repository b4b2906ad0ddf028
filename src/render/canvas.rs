use crate::assets::decode::DecodedImage;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TrackmapError, TrackmapResult};
use crate::render::composite::{BlitParams, over_at_offset, over_in_place};

/// Largest edge the vector rasterizer accepts.
pub const MAX_CANVAS_EDGE: u32 = u16::MAX as u32;

/// The raster every pipeline stage draws onto.
///
/// Pixels are premultiplied RGBA8, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Allocate a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> TrackmapResult<Self> {
        Self::filled(width, height, Rgba8Premul::transparent())
    }

    /// Allocate a canvas with every pixel set to `fill`.
    pub fn filled(width: u32, height: u32, fill: Rgba8Premul) -> TrackmapResult<Self> {
        check_dimensions(width, height)?;
        let data = fill
            .to_array()
            .repeat((width as usize) * (height as usize));
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_premul_parts(width: u32, height: u32, data: Vec<u8>) -> TrackmapResult<Self> {
        check_dimensions(width, height)?;
        if data.len() != (width as usize) * (height as usize) * 4 {
            return Err(TrackmapError::invalid_dimensions(
                "canvas buffer must be width*height*4 bytes",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.data[idx..idx + 4];
        Some(Rgba8Premul::from_array([px[0], px[1], px[2], px[3]]))
    }

    /// Source-over an image with its top-left corner at `(x, y)`, clipping to the canvas.
    pub(crate) fn composite_image(&mut self, img: &DecodedImage, x: i64, y: i64) -> TrackmapResult<()> {
        over_at_offset(
            &mut self.data,
            &img.rgba8_premul,
            BlitParams {
                dst_width: self.width,
                dst_height: self.height,
                src_width: img.width,
                src_height: img.height,
                x,
                y,
            },
        )
    }

    /// Source-over a full-canvas layer at `opacity`.
    pub(crate) fn composite_layer(&mut self, layer: &[u8], opacity: f32) -> TrackmapResult<()> {
        over_in_place(&mut self.data, layer, opacity)
    }

    pub fn into_premul_rgba8(self) -> Vec<u8> {
        self.data
    }
}

fn check_dimensions(width: u32, height: u32) -> TrackmapResult<()> {
    if width == 0 || height == 0 {
        return Err(TrackmapError::invalid_dimensions(format!(
            "canvas must be at least 1x1, got {width}x{height}"
        )));
    }
    if width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE {
        return Err(TrackmapError::invalid_dimensions(format!(
            "canvas edges must be <= {MAX_CANVAS_EDGE}, got {width}x{height}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
