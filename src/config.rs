use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::error::{TrackmapError, TrackmapResult};
use crate::render::crop::CropConfig;
use crate::render::text::{TextAlign, TextStyle};
use crate::render::track::StrokeStyle;

/// Every style and crop option of a render session.
///
/// All fields are optional in JSON; missing ones take the documented defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Colour the canvas starts out as, before any tile is drawn (default white).
    pub background: Color,
    pub stroke: StrokeStyle,
    /// Style of POI labels (default left-aligned).
    pub labels: TextStyle,
    /// Style of the attribution legend (default right-aligned).
    pub legend: TextStyle,
    pub crop: CropConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            stroke: StrokeStyle::default(),
            labels: TextStyle::default(),
            legend: TextStyle {
                alignment: TextAlign::Right,
                ..TextStyle::default()
            },
            crop: CropConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Check every option, failing with [`TrackmapError::InvalidConfig`] on the first bad one.
    pub fn validate(&self) -> TrackmapResult<()> {
        self.stroke.validate()?;
        self.labels.validate()?;
        self.legend.validate()?;
        self.crop.validate()?;
        Ok(())
    }

    pub fn from_json_str(s: &str) -> TrackmapResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| TrackmapError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_reader(mut r: impl Read) -> TrackmapResult<Self> {
        let mut s = String::new();
        r.read_to_string(&mut s)
            .map_err(|e| TrackmapError::io("read config", e))?;
        Self::from_json_str(&s)
    }

    pub fn from_path(path: &Path) -> TrackmapResult<Self> {
        let f = std::fs::File::open(path)
            .map_err(|e| TrackmapError::io(format!("open config '{}'", path.display()), e))?;
        Self::from_reader(std::io::BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
