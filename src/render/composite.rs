use crate::foundation::error::{TrackmapError, TrackmapResult};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for premultiplied pixels, with the source scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Blend an equally sized layer onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> TrackmapResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TrackmapError::invalid_dimensions(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Destination geometry for [`over_at_offset`].
#[derive(Clone, Copy, Debug)]
pub struct BlitParams {
    pub dst_width: u32,
    pub dst_height: u32,
    pub src_width: u32,
    pub src_height: u32,
    pub x: i64,
    pub y: i64,
}

/// Blend `src` onto `dst` with its top-left corner at `(x, y)`.
///
/// Only the region overlapping the destination is touched; the rest of the source is
/// clipped silently.
pub fn over_at_offset(dst: &mut [u8], src: &[u8], params: BlitParams) -> TrackmapResult<()> {
    let BlitParams {
        dst_width,
        dst_height,
        src_width,
        src_height,
        x,
        y,
    } = params;
    let dst_len = (dst_width as usize) * (dst_height as usize) * 4;
    let src_len = (src_width as usize) * (src_height as usize) * 4;
    if dst.len() != dst_len || src.len() != src_len {
        return Err(TrackmapError::invalid_dimensions(
            "over_at_offset expects buffers matching width*height*4",
        ));
    }

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(i64::from(src_width)).min(i64::from(dst_width));
    let y1 = y.saturating_add(i64::from(src_height)).min(i64::from(dst_height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let row_px = (x1 - x0) as usize;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx = (x0 - x) as usize;
        let s_start = (sy * src_width as usize + sx) * 4;
        let d_start = ((dy as usize) * dst_width as usize + x0 as usize) * 4;
        let s_row = &src[s_start..s_start + row_px * 4];
        let d_row = &mut dst[d_start..d_start + row_px * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Snap antialiased coverage to fully on or fully off (50% threshold).
pub fn harden_coverage_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a < 128 {
            px.fill(0);
            continue;
        }
        for c in &mut px[0..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
        px[3] = 255;
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
