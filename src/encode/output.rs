use std::io::Cursor;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TrackmapError, TrackmapResult};
use crate::render::canvas::Canvas;

/// Raster formats the encoder can emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl OutputFormat {
    /// Infer the format from a file extension, falling back to PNG.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("bmp") => Self::Bmp,
            _ => Self::Png,
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }

    fn supports_alpha(self) -> bool {
        matches!(self, Self::Png | Self::Bmp)
    }
}

/// Encode `canvas` into the byte representation of `format`.
///
/// Formats without an alpha channel drop it after un-premultiplying.
#[tracing::instrument(skip(canvas), fields(w = canvas.width(), h = canvas.height()))]
pub fn encode_canvas(canvas: &Canvas, format: OutputFormat) -> TrackmapResult<Vec<u8>> {
    let mut straight = canvas.data().to_vec();
    unpremultiply_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(canvas.width(), canvas.height(), straight)
        .ok_or_else(|| TrackmapError::invalid_dimensions("invalid rgba buffer size"))?;

    let dyn_img = if format.supports_alpha() {
        image::DynamicImage::ImageRgba8(img)
    } else {
        image::DynamicImage::ImageRgb8(image::DynamicImage::ImageRgba8(img).to_rgb8())
    };

    let mut buf = Vec::new();
    dyn_img
        .write_to(&mut Cursor::new(&mut buf), format.image_format())
        .map_err(|e| anyhow::anyhow!("encode {format:?}: {e}"))?;
    Ok(buf)
}

/// Encode `canvas` and write it to `path`, creating parent directories as needed.
///
/// The format follows the file extension (PNG when unknown).
pub fn save_canvas(canvas: &Canvas, path: &Path) -> TrackmapResult<()> {
    let bytes = encode_canvas(canvas, OutputFormat::from_path(path))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            TrackmapError::io(format!("create output dir '{}'", parent.display()), e)
        })?;
    }
    std::fs::write(path, bytes)
        .map_err(|e| TrackmapError::io(format!("write image '{}'", path.display()), e))?;
    tracing::debug!(path = %path.display(), "wrote image");
    Ok(())
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/output.rs"]
mod tests;
