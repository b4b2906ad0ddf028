pub(crate) mod canvas;
pub(crate) mod composite;
pub(crate) mod crop;
pub(crate) mod legend;
pub(crate) mod overlay;
pub(crate) mod raster;
pub(crate) mod session;
pub(crate) mod text;
pub(crate) mod tiles;
pub(crate) mod track;
