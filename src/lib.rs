//! trackmap composites map tiles, a GPS track and point-of-interest markers into one
//! raster image.
//!
//! Everything here works in canvas pixels: projecting coordinates and fetching tiles
//! happen upstream, and the caller hands over pixel positions and encoded image bytes.
//!
//! # Pipeline overview
//!
//! 1. **Canvas**: a premultiplied RGBA8 buffer filled with the background colour.
//! 2. **Tiles**: decoded and source-over composited as they are added, in call order.
//! 3. **Track**: queued segments stroked in one batch.
//! 4. **POIs**: all markers centred on their anchors, then all labels.
//! 5. **Crop**: explicit bounds plus margin, or a fixed window around a centre.
//! 6. **Legend**: right-aligned attribution against the cropped bottom-right corner.
//! 7. **Encode**: PNG (default), JPEG or BMP bytes, or a file.
//!
//! [`RenderSession`] drives these steps in order and renders at most once.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod encode;
mod foundation;
mod job;
mod render;

pub use assets::color::Color;
pub use assets::decode::{DecodedImage, decode_image};
pub use config::RenderConfig;
pub use encode::output::{OutputFormat, encode_canvas, save_canvas};
pub use foundation::core::{PixelBounds, Point, Rgba8Premul};
pub use foundation::error::{TrackmapError, TrackmapResult};
pub use job::{CanvasSize, CropSpec, PointSpec, RenderJob, TileSource, TileSpec};
pub use render::canvas::{Canvas, MAX_CANVAS_EDGE};
pub use render::composite::over;
pub use render::crop::{CropConfig, CropPlan, CropRegion};
pub use render::legend::{LEGEND_INSET, draw_legend, legend_anchor};
pub use render::overlay::{LABEL_OFFSET_X, LABEL_OFFSET_Y, PointOfInterest, draw_points};
pub use render::session::RenderSession;
pub use render::text::{TextAlign, TextExtent, TextLayoutEngine, TextStyle};
pub use render::tiles::{BLANK_TILE_EVEN, BLANK_TILE_ODD, blank_tile, composite_tile};
pub use render::track::{Segment, StrokeStyle, TrackRenderer};
