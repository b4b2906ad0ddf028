use crate::assets::color::Color;
use crate::foundation::core::Point;
use crate::foundation::error::{TrackmapError, TrackmapResult};
use crate::render::composite::harden_coverage_in_place;

/// Run `draw` against a fresh `vello_cpu` context and read back the layer as
/// premultiplied RGBA8 sized `width` x `height`.
pub(crate) fn rasterize_layer(
    width: u32,
    height: u32,
    antialias: bool,
    draw: impl FnOnce(&mut vello_cpu::RenderContext) -> TrackmapResult<()>,
) -> TrackmapResult<Vec<u8>> {
    let width_u16: u16 = width
        .try_into()
        .map_err(|_| TrackmapError::invalid_dimensions("layer width exceeds u16"))?;
    let height_u16: u16 = height
        .try_into()
        .map_err(|_| TrackmapError::invalid_dimensions("layer height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
    draw(&mut ctx)?;
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
    ctx.render_to_pixmap(&mut pixmap);

    let mut layer = pixmap.data_as_u8_slice().to_vec();
    if !antialias {
        harden_coverage_in_place(&mut layer);
    }
    Ok(layer)
}

/// Paint for a layer drawn in `color`, plus the opacity factor to composite it with.
///
/// Hardened layers are painted opaque so the coverage threshold sees geometry only;
/// the colour's alpha moves into the composite instead.
pub(crate) fn layer_paint(color: Color, antialias: bool) -> (vello_cpu::peniko::Color, f32) {
    let Color { r, g, b, a } = color;
    if antialias {
        (vello_cpu::peniko::Color::from_rgba8(r, g, b, a), 1.0)
    } else {
        (
            vello_cpu::peniko::Color::from_rgba8(r, g, b, 255),
            f32::from(a) / 255.0,
        )
    }
}

pub(crate) fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}
