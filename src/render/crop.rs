use serde::{Deserialize, Serialize};

use crate::foundation::core::PixelBounds;
use crate::foundation::error::{TrackmapError, TrackmapResult};
use crate::render::canvas::Canvas;

/// Crop settings carried by the render configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    /// Whether the crop stage runs at all (default off).
    pub enabled: bool,
    /// Padding kept around explicit content bounds, in pixels (default 50).
    pub margin: i64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            margin: 50,
        }
    }
}

impl CropConfig {
    pub fn validate(&self) -> TrackmapResult<()> {
        if self.margin < 0 {
            return Err(TrackmapError::invalid_config(format!(
                "crop margin must be >= 0, got {}",
                self.margin
            )));
        }
        Ok(())
    }
}

/// Inward offsets from each canvas edge, CSS padding style.
///
/// Every offset is non-negative, and opposite offsets never meet. A side whose offset
/// would leave nothing on its axis contributes zero instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl CropRegion {
    /// Offsets that keep `bounds` plus `margin` on a `width` x `height` canvas.
    pub fn compute(width: u32, height: u32, bounds: PixelBounds, margin: i64) -> Self {
        let top = bounds.y_min.saturating_sub(margin);
        let left = bounds.x_min.saturating_sub(margin);
        let right = i64::from(width)
            .saturating_sub(bounds.x_max)
            .saturating_sub(margin);
        let bottom = i64::from(height)
            .saturating_sub(bounds.y_max)
            .saturating_sub(margin);

        let (left, right) = clamp_pair(left, right, width);
        let (top, bottom) = clamp_pair(top, bottom, height);
        let region = Self {
            top,
            right,
            bottom,
            left,
        };
        tracing::debug!(?bounds, margin, ?region, "computed crop");
        region
    }

    /// Offsets for a `target_width` x `target_height` window centred on `(x_center, y_center)`.
    ///
    /// Equivalent to [`CropRegion::compute`] with a zero margin.
    pub fn compute_fixed(
        width: u32,
        height: u32,
        x_center: i64,
        y_center: i64,
        target_width: u32,
        target_height: u32,
    ) -> Self {
        let half_w = i64::from(target_width / 2);
        let half_h = i64::from(target_height / 2);
        Self::compute(
            width,
            height,
            PixelBounds::new(
                x_center.saturating_sub(half_w),
                x_center.saturating_add(half_w),
                y_center.saturating_sub(half_h),
                y_center.saturating_add(half_h),
            ),
            0,
        )
    }

    /// Size of the canvas left after cropping a `width` x `height` one.
    pub fn cropped_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width.saturating_sub(self.left + self.right),
            height.saturating_sub(self.top + self.bottom),
        )
    }

    /// Extract the kept rectangle as a new canvas.
    pub fn apply(&self, canvas: &Canvas) -> TrackmapResult<Canvas> {
        let (width, height) = canvas.dimensions();
        let (new_w, new_h) = self.cropped_size(width, height);
        if self.left + new_w > width || self.top + new_h > height || new_w == 0 || new_h == 0 {
            return Err(TrackmapError::invalid_dimensions(format!(
                "crop {self:?} does not fit a {width}x{height} canvas"
            )));
        }

        let src = canvas.data();
        let stride = width as usize * 4;
        let row_len = new_w as usize * 4;
        let mut data = Vec::with_capacity(row_len * new_h as usize);
        for y in self.top..self.top + new_h {
            let start = y as usize * stride + self.left as usize * 4;
            data.extend_from_slice(&src[start..start + row_len]);
        }
        Canvas::from_premul_parts(new_w, new_h, data)
    }
}

/// Clamp two opposite offsets to `>= 0`, dropping any side that empties the axis.
///
/// A side that alone reaches across `extent` is zeroed; if the two together still do,
/// both are.
fn clamp_pair(near: i64, far: i64, extent: u32) -> (u32, u32) {
    let extent = i64::from(extent);
    let side = |v: i64| if v >= extent { 0 } else { v.max(0) };
    let (near, far) = (side(near), side(far));
    if near + far >= extent {
        return (0, 0);
    }
    (near as u32, far as u32)
}

/// Where the crop stage stands for one render session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropPlan {
    pub enabled: bool,
    pub margin: i64,
    pub region: Option<CropRegion>,
}

impl CropPlan {
    pub fn new(config: CropConfig) -> Self {
        Self {
            enabled: config.enabled,
            margin: config.margin,
            region: None,
        }
    }

    /// Explicit-bounds mode against the canvas as it is now.
    pub fn set_bounds(&mut self, width: u32, height: u32, bounds: PixelBounds) {
        self.region = Some(CropRegion::compute(width, height, bounds, self.margin));
    }

    /// Fixed-size mode: forces the margin to zero and enables cropping.
    pub fn set_fixed(
        &mut self,
        width: u32,
        height: u32,
        center: (i64, i64),
        target_width: u32,
        target_height: u32,
    ) {
        self.margin = 0;
        self.enabled = true;
        self.region = Some(CropRegion::compute_fixed(
            width,
            height,
            center.0,
            center.1,
            target_width,
            target_height,
        ));
    }

    /// The cropped canvas, or `canvas` unchanged when cropping is off or unset.
    pub fn apply(&self, canvas: Canvas) -> TrackmapResult<Canvas> {
        match self.region {
            Some(region) if self.enabled => region.apply(&canvas),
            _ => Ok(canvas),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/crop.rs"]
mod tests;
