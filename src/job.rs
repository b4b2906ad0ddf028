//! JSON description of a complete render, as consumed by the `trackmap` binary.
//!
//! ```json
//! {
//!   "canvas": { "width": 512, "height": 512 },
//!   "config": { "stroke": { "color": "#0044ff" }, "crop": { "enabled": true } },
//!   "fonts": ["fonts/DejaVuSans.ttf"],
//!   "tiles": [
//!     { "path": "tiles/0_0.png", "x": 0, "y": 0 },
//!     { "blank": 1, "x": 256, "y": 0, "width": 256, "height": 256 }
//!   ],
//!   "track": [[[12.0, 40.0], [200.5, 310.0], [480.0, 460.0]]],
//!   "points": [{ "marker": "flag.png", "x": 12, "y": 40, "label": "Start" }],
//!   "crop": "fit_content",
//!   "license": "map data (c) OpenStreetMap contributors"
//! }
//! ```
//!
//! Relative paths resolve against the directory holding the job file.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::foundation::core::{PixelBounds, Point};
use crate::foundation::error::{TrackmapError, TrackmapResult};
use crate::render::overlay::PointOfInterest;
use crate::render::session::RenderSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

/// Where a tile's pixels come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileSource {
    File { path: PathBuf },
    Blank { blank: u64, width: u32, height: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    #[serde(flatten)]
    pub source: TileSource,
    pub x: i64,
    pub y: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSpec {
    pub marker: PathBuf,
    pub x: i64,
    pub y: i64,
    #[serde(default)]
    pub label: String,
}

/// How the job's output is cropped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropSpec {
    /// Keep these content bounds plus the configured margin.
    Bounds(PixelBounds),
    /// Keep the track and POIs plus the configured margin.
    FitContent,
    /// Fixed-size window around a centre point.
    Fixed {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderJob {
    pub canvas: CanvasSize,
    #[serde(default)]
    pub config: RenderConfig,
    #[serde(default)]
    pub fonts: Vec<PathBuf>,
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
    /// Polylines as lists of `[x, y]` pixel pairs.
    #[serde(default)]
    pub track: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub points: Vec<PointSpec>,
    #[serde(default)]
    pub crop: Option<CropSpec>,
    #[serde(default)]
    pub license: String,
}

impl RenderJob {
    pub fn from_json_str(s: &str) -> TrackmapResult<Self> {
        serde_json::from_str(s).map_err(|e| TrackmapError::serde(e.to_string()))
    }

    pub fn from_reader(mut r: impl Read) -> TrackmapResult<Self> {
        let mut s = String::new();
        r.read_to_string(&mut s)
            .map_err(|e| TrackmapError::io("read job", e))?;
        Self::from_json_str(&s)
    }

    pub fn from_path(path: &Path) -> TrackmapResult<Self> {
        let f = std::fs::File::open(path)
            .map_err(|e| TrackmapError::io(format!("open job '{}'", path.display()), e))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Build a session with every tile composited and every layer queued.
    #[tracing::instrument(skip(self), fields(tiles = self.tiles.len(), points = self.points.len()))]
    pub fn into_session(self, assets_root: &Path) -> TrackmapResult<RenderSession> {
        let mut session =
            RenderSession::new(self.canvas.width, self.canvas.height, self.config)?;

        for font in &self.fonts {
            session.register_font(read_asset(assets_root, font)?)?;
        }

        for tile in &self.tiles {
            match &tile.source {
                TileSource::File { path } => {
                    session.add_tile(&read_asset(assets_root, path)?, tile.x, tile.y)?;
                }
                TileSource::Blank {
                    blank,
                    width,
                    height,
                } => {
                    session.add_blank_tile(*width, *height, *blank, tile.x, tile.y)?;
                }
            }
        }

        for line in &self.track {
            session.add_polyline(line.iter().map(|[x, y]| Point::new(*x, *y)))?;
        }

        for p in self.points {
            let marker = read_asset(assets_root, &p.marker)?;
            session.add_poi(PointOfInterest::new(p.x, p.y, marker, p.label))?;
        }

        match self.crop {
            None => {}
            Some(CropSpec::Bounds(bounds)) => session.set_crop(bounds)?,
            Some(CropSpec::FitContent) => session.crop_to_content()?,
            Some(CropSpec::Fixed {
                x,
                y,
                width,
                height,
            }) => session.set_crop_fixed(x, y, width, height)?,
        }

        session.set_license(self.license)?;
        Ok(session)
    }
}

fn read_asset(root: &Path, rel: &Path) -> TrackmapResult<Vec<u8>> {
    let p = root.join(rel);
    std::fs::read(&p)
        .map_err(|e| TrackmapError::io(format!("read asset '{}'", p.display()), e))
}

#[cfg(test)]
#[path = "../tests/unit/job.rs"]
mod tests;
