use std::{fmt, path::Path, str::FromStr};

use crate::{
    convert::{options::ConversionRequest, probe::probe_intrinsic_size},
    foundation::error::{SpriteError, SpriteResult},
};

/// Owned RGBA8 pixel buffer with straight (non-premultiplied) alpha, row-major.
pub type RasterImage = image::RgbaImage;

/// Why a backend cannot run on this host.
///
/// This is a value, not an error: a missing executable is an expected, reportable condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnavailableReason(pub String);

impl UnavailableReason {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Built-in backend identifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendKind {
    /// In-process `usvg` + `resvg` rasterizer. Always available.
    #[default]
    Resvg,
    /// Headless Chrome/Chromium screenshot renderer.
    Chrome,
    /// System `rsvg-convert` (librsvg).
    Rsvg,
    /// System `inkscape`.
    Inkscape,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [Self::Resvg, Self::Chrome, Self::Rsvg, Self::Inkscape];

    pub fn id(self) -> &'static str {
        match self {
            Self::Resvg => "resvg",
            Self::Chrome => "chrome",
            Self::Rsvg => "rsvg",
            Self::Inkscape => "inkscape",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BackendKind {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SpriteError::UnknownBackend {
                backend: s.to_string(),
            })
    }
}

/// Diagnostic summary of a registered backend.
///
/// Recomputed on every request: availability can change between invocations.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BackendDescriptor {
    pub identifier: String,
    pub display_name: String,
    pub description: String,
    pub available: bool,
}

/// A strategy that turns SVG bytes into a [`RasterImage`].
///
/// Every implementation sizes its output through
/// [`resolve_dimensions`](crate::convert::options::resolve_dimensions), so the same request yields
/// the same raster size regardless of backend.
pub trait RasterBackend: Send {
    /// Human-readable name.
    fn display_name(&self) -> &'static str;

    /// One-line description of the backend and its requirements.
    fn description(&self) -> &'static str;

    /// The request this instance was built with.
    fn request(&self) -> &ConversionRequest;

    /// Probe whether the backend can run here. Must not have side effects beyond spawning a
    /// short-lived version check.
    fn check_availability(&self) -> Result<(), UnavailableReason>;

    /// Intrinsic `(width, height)` declared by the source. Never fails; see
    /// [`probe_intrinsic_size`].
    fn probe_intrinsic_size(&self, svg: &[u8]) -> (f64, f64) {
        probe_intrinsic_size(svg)
    }

    /// Raster size a conversion of `svg` will produce.
    fn target_size(&self, svg: &[u8]) -> SpriteResult<(u32, u32)> {
        let (w, h) = self.probe_intrinsic_size(svg);
        self.request().resolve(w, h)
    }

    /// Convert SVG bytes to an in-memory raster.
    fn convert_to_image(&mut self, svg: &[u8]) -> SpriteResult<RasterImage>;

    /// Convert `input` (SVG) and write `output` as PNG.
    fn convert_file(&mut self, input: &Path, output: &Path) -> SpriteResult<()> {
        let svg = read_input(input)?;
        let image = self
            .convert_to_image(&svg)
            .map_err(|e| annotate(e, self.display_name(), input))?;
        write_png(&image, output)
    }

    /// Release held resources. Idempotent; safe to call on an instance that never converted.
    fn close(&mut self) -> SpriteResult<()> {
        Ok(())
    }
}

/// Read an input file as raw bytes.
pub fn read_input(path: &Path) -> SpriteResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| SpriteError::io(path, e))
}

/// Encode `image` as PNG at `path`, creating the parent directory.
pub fn write_png(image: &RasterImage, path: &Path) -> SpriteResult<()> {
    ensure_parent_dir(path)?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => SpriteError::io(path, io),
            other => SpriteError::conversion(format!("encode png '{}': {other}", path.display())),
        })
}

/// Decode PNG (or any enabled format) bytes into a straight-alpha RGBA8 buffer.
pub fn decode_raster(bytes: &[u8]) -> SpriteResult<RasterImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| SpriteError::conversion(format!("decode raster output: {e}")))?;
    Ok(img.to_rgba8())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SpriteResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SpriteError::io(parent, e))?;
    }
    Ok(())
}

/// Prefix a conversion failure with the backend and file it came from.
pub(crate) fn annotate(err: SpriteError, backend: &str, input: &Path) -> SpriteError {
    match err {
        SpriteError::Conversion(msg) => SpriteError::conversion(format!(
            "{backend} failed on '{}': {msg}",
            input.display()
        )),
        other => other,
    }
}
