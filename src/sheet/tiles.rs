use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{
    convert::{
        backend::{RasterBackend, RasterImage, annotate, decode_raster, read_input},
        options::ConversionRequest,
        registry::SpriteRegistry,
    },
    discover::{InputKind, sprite_name},
    foundation::error::{SpriteError, SpriteResult},
    image_ops::{center_on_canvas, fit_within, resize_nearest, trim_transparent_border},
};

/// One raster tile waiting to be placed on a sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct TileEntry {
    pub source_name: String,
    pub image: RasterImage,
    pub width: u32,
    pub height: u32,
}

impl TileEntry {
    pub fn new(source_name: impl Into<String>, image: RasterImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            source_name: source_name.into(),
            image,
            width,
            height,
        }
    }
}

/// How a tile that does not match the cell size is brought to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Nearest-neighbor resize to exactly the cell size, ignoring aspect ratio.
    #[default]
    Stretch,
    /// Aspect-preserving resize, centered on a transparent cell.
    Fit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileOptions {
    pub tile_width: u32,
    pub tile_height: u32,
    pub trim: bool,
    pub fit: FitMode,
}

#[derive(Clone, Debug)]
pub struct TileThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for TileThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 8,
            threads: None,
        }
    }
}

/// Trim (optionally) and bring a raster to exactly the tile size.
pub fn finish_tile(image: RasterImage, opts: &TileOptions) -> SpriteResult<RasterImage> {
    let image = if opts.trim {
        trim_transparent_border(&image)
    } else {
        image
    };
    match opts.fit {
        FitMode::Stretch => resize_nearest(&image, opts.tile_width, opts.tile_height),
        FitMode::Fit => {
            let fitted = fit_within(&image, opts.tile_width, opts.tile_height)?;
            Ok(center_on_canvas(&fitted, opts.tile_width, opts.tile_height))
        }
    }
}

/// Turn one input file into a finished tile. SVGs go through `backend`; PNGs are decoded.
pub fn load_tile(
    path: &Path,
    backend: Option<&mut dyn RasterBackend>,
    opts: &TileOptions,
) -> SpriteResult<TileEntry> {
    let bytes = read_input(path)?;
    let raster = match InputKind::of(path) {
        Some(InputKind::Svg) => {
            let backend = backend.ok_or_else(|| {
                SpriteError::configuration(format!(
                    "no backend to convert '{}'",
                    path.display()
                ))
            })?;
            backend
                .convert_to_image(&bytes)
                .map_err(|e| annotate(e, backend.display_name(), path))?
        }
        Some(InputKind::Png) => decode_raster(&bytes).map_err(|e| annotate(e, "png", path))?,
        None => {
            return Err(SpriteError::configuration(format!(
                "unsupported input '{}' (expected .svg or .png)",
                path.display()
            )));
        }
    };
    let image = finish_tile(raster, opts)?;
    tracing::debug!(input = %path.display(), "prepared tile");
    Ok(TileEntry::new(sprite_name(path), image))
}

/// Prepare every input as a tile, in input order.
///
/// Sequentially one backend instance serves all SVG inputs. In parallel mode each chunk of
/// inputs gets its own backend, created through the registry and closed when the chunk ends.
pub fn prepare_tiles(
    registry: &SpriteRegistry,
    backend_id: &str,
    request: ConversionRequest,
    inputs: &[PathBuf],
    opts: &TileOptions,
    threading: &TileThreading,
) -> SpriteResult<Vec<TileEntry>> {
    if inputs.is_empty() {
        return Err(SpriteError::empty_input("no input images"));
    }
    if !threading.parallel || inputs.len() < 2 {
        return prepare_chunk(registry, backend_id, request, inputs, opts);
    }

    let pool = build_thread_pool(threading.threads)?;
    let chunk = threading.chunk_size.max(1);
    tracing::debug!(
        inputs = inputs.len(),
        chunk,
        threads = pool.current_num_threads(),
        "preparing tiles in parallel"
    );
    let chunks = pool.install(|| {
        inputs
            .par_chunks(chunk)
            .map(|part| prepare_chunk(registry, backend_id, request, part, opts))
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(inputs.len());
    for part in chunks {
        out.extend(part?);
    }
    Ok(out)
}

fn prepare_chunk(
    registry: &SpriteRegistry,
    backend_id: &str,
    request: ConversionRequest,
    inputs: &[PathBuf],
    opts: &TileOptions,
) -> SpriteResult<Vec<TileEntry>> {
    let needs_backend = inputs
        .iter()
        .any(|p| InputKind::of(p) == Some(InputKind::Svg));
    let mut backend = if needs_backend {
        Some(registry.create(backend_id, request)?)
    } else {
        None
    };

    let result = inputs
        .iter()
        .map(|path| match backend.as_mut() {
            Some(b) => load_tile(path, Some(b.as_mut()), opts),
            None => load_tile(path, None, opts),
        })
        .collect::<SpriteResult<Vec<_>>>();

    if let Some(b) = backend.as_mut() {
        if let Err(e) = b.close() {
            tracing::warn!(error = %e, "failed to close backend");
        }
    }
    result
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> SpriteResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SpriteError::configuration(
            "'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SpriteError::configuration(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/tiles.rs"]
mod tests;
