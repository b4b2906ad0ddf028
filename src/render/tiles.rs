use crate::assets::color::Color;
use crate::assets::decode::decode_image;
use crate::encode::output::{OutputFormat, encode_canvas};
use crate::foundation::error::TrackmapResult;
use crate::render::canvas::Canvas;

/// Background of even-indexed placeholder tiles (`#eeeeee`).
pub const BLANK_TILE_EVEN: Color = Color::rgb(0xee, 0xee, 0xee);
/// Background of odd-indexed placeholder tiles (`#dddddd`).
pub const BLANK_TILE_ODD: Color = Color::rgb(0xdd, 0xdd, 0xdd);

/// Decode `tile_bytes` and source-over it onto `canvas` with its top-left at `(x, y)`.
///
/// Offsets may push the tile partly or fully off the canvas; only the overlap is drawn.
/// Decoding happens before the canvas is touched, so a bad tile leaves it unchanged.
pub fn composite_tile(canvas: &mut Canvas, tile_bytes: &[u8], x: i64, y: i64) -> TrackmapResult<()> {
    let tile = decode_image(tile_bytes)?;
    tracing::debug!(x, y, w = tile.width, h = tile.height, "composite tile");
    canvas.composite_image(&tile, x, y)
}

/// A flat placeholder tile, PNG-encoded, alternating two greys by the parity of `index`.
pub fn blank_tile(width: u32, height: u32, index: u64) -> TrackmapResult<Vec<u8>> {
    let color = if index % 2 == 0 {
        BLANK_TILE_EVEN
    } else {
        BLANK_TILE_ODD
    };
    let tile = Canvas::filled(width, height, color.to_rgba8_premul())?;
    encode_canvas(&tile, OutputFormat::Png)
}

#[cfg(test)]
#[path = "../../tests/unit/render/tiles.rs"]
mod tests;
