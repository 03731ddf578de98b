//! Job configuration.
//!
//! A [`JobConfig`] is built once (from a JSON file, CLI flags, or code), defaulted, validated, and
//! then turned into the explicit values the conversion and layout code takes.

use std::path::{Path, PathBuf};

use crate::{
    convert::{backend::BackendKind, options::ConversionRequest},
    discover::SortMode,
    foundation::error::{SpriteError, SpriteResult},
    sheet::{
        layout::LayoutSpec,
        metadata::MetaFormat,
        tiles::{FitMode, TileOptions, TileThreading},
    },
};

pub const MAX_TILE_SIDE: u32 = 2048;
pub const MAX_GRID_SIDE: u32 = 100;
pub const MAX_PADDING: u32 = 100;

pub const DEFAULT_TILE_SIDE: u32 = 64;
pub const DEFAULT_COLUMNS: u32 = 8;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub input: PathBuf,
    pub output: PathBuf,

    /// Scale factor; `0` means unset.
    pub scale: f64,
    /// Output width in pixels; `0` means unset.
    pub width: u32,
    /// Output height in pixels; `0` means unset.
    pub height: u32,

    pub tile_width: u32,
    pub tile_height: u32,
    pub cols: u32,
    pub rows: u32,
    pub padding: u32,

    pub sort: SortMode,
    /// Metadata output path (`.json` or `.csv`).
    pub meta: Option<PathBuf>,
    /// Overrides the format implied by the `meta` extension.
    pub meta_format: Option<MetaFormat>,
    pub trim: bool,
    pub fit: FitMode,
    pub force: bool,

    pub backend: String,
    pub parallel: bool,
    pub threads: Option<usize>,
    pub chunk_size: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            scale: 0.0,
            width: 0,
            height: 0,
            tile_width: 0,
            tile_height: 0,
            cols: 0,
            rows: 0,
            padding: 0,
            sort: SortMode::Name,
            meta: None,
            meta_format: None,
            trim: false,
            fit: FitMode::Stretch,
            force: false,
            backend: String::new(),
            parallel: false,
            threads: None,
            chunk_size: TileThreading::default().chunk_size,
        }
    }
}

impl JobConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> SpriteResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SpriteError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| SpriteError::serde(format!("config '{}': {e}", path.display())))
    }

    /// Fill unset values: scale 1 when no size is given, `resvg`, 64x64 tiles, 8 columns.
    pub fn apply_defaults(&mut self) {
        if self.scale == 0.0 && self.width == 0 && self.height == 0 {
            self.scale = 1.0;
        }
        if self.backend.trim().is_empty() {
            self.backend = BackendKind::default().id().to_string();
        }
        if self.tile_width == 0 {
            self.tile_width = DEFAULT_TILE_SIDE;
        }
        if self.tile_height == 0 {
            self.tile_height = DEFAULT_TILE_SIDE;
        }
        if self.cols == 0 && self.rows == 0 {
            self.cols = DEFAULT_COLUMNS;
        }
        if self.chunk_size == 0 {
            self.chunk_size = 1;
        }
    }

    pub fn validate(&self) -> SpriteResult<()> {
        if self.input.as_os_str().is_empty() {
            return Err(SpriteError::configuration("input path is required"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(SpriteError::configuration("output path is required"));
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(SpriteError::configuration(format!(
                "scale must be a finite, non-negative number (got {})",
                self.scale
            )));
        }
        if self.scale > 0.0 && (self.width > 0 || self.height > 0) {
            return Err(SpriteError::configuration(
                "cannot specify both scale and width/height",
            ));
        }
        if self.cols > 0 && self.rows > 0 {
            return Err(SpriteError::configuration(
                "cannot specify both cols and rows",
            ));
        }
        for (name, v) in [("tile_width", self.tile_width), ("tile_height", self.tile_height)] {
            if v == 0 || v > MAX_TILE_SIDE {
                return Err(SpriteError::configuration(format!(
                    "{name} must be in 1..={MAX_TILE_SIDE} (got {v})"
                )));
            }
        }
        for (name, v) in [("cols", self.cols), ("rows", self.rows)] {
            if v > MAX_GRID_SIDE {
                return Err(SpriteError::configuration(format!(
                    "{name} must be at most {MAX_GRID_SIDE} (got {v})"
                )));
            }
        }
        if self.padding > MAX_PADDING {
            return Err(SpriteError::configuration(format!(
                "padding must be at most {MAX_PADDING} (got {})",
                self.padding
            )));
        }
        if self.threads == Some(0) {
            return Err(SpriteError::configuration("threads must be >= 1 when set"));
        }
        if let Some(meta) = &self.meta
            && MetaFormat::from_path(meta).is_none()
        {
            return Err(SpriteError::configuration(format!(
                "metadata file must have a .json or .csv extension: '{}'",
                meta.display()
            )));
        }
        Ok(())
    }

    pub fn conversion_request(&self) -> SpriteResult<ConversionRequest> {
        ConversionRequest::new(self.scale, self.width, self.height)
    }

    pub fn layout_spec(&self) -> LayoutSpec {
        LayoutSpec {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            padding: self.padding,
            columns: self.cols,
            rows: self.rows,
        }
    }

    pub fn tile_options(&self) -> TileOptions {
        TileOptions {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            trim: self.trim,
            fit: self.fit,
        }
    }

    pub fn threading(&self) -> TileThreading {
        TileThreading {
            parallel: self.parallel,
            chunk_size: self.chunk_size.max(1),
            threads: self.threads,
        }
    }

    /// Metadata destination and format, if metadata was requested.
    pub fn metadata_target(&self) -> Option<(PathBuf, MetaFormat)> {
        let path = self.meta.as_ref()?;
        let format = self
            .meta_format
            .or_else(|| MetaFormat::from_path(path))
            .unwrap_or_default();
        Some((path.clone(), format))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
