use std::{path::Path, sync::Arc};

use crate::{
    convert::{
        backend::{
            RasterBackend, RasterImage, UnavailableReason, annotate, read_input, write_png,
        },
        options::ConversionRequest,
        probe,
    },
    foundation::error::{SpriteError, SpriteResult},
    image_ops::demultiply_rgba8_in_place,
};

/// Largest raster side this backend will allocate.
pub const MAX_RASTER_SIDE: u32 = 16_384;

/// In-process rasterizer built on `usvg` + `resvg`.
///
/// Needs nothing from the host, so it is always available and is the default backend.
pub struct ResvgBackend {
    request: ConversionRequest,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
}

impl ResvgBackend {
    pub fn new(request: ConversionRequest) -> Self {
        Self {
            request,
            fontdb: None,
        }
    }

    // System fonts are scanned once per instance, on first use.
    fn fontdb(&mut self) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_insert_with(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                tracing::debug!(faces = db.len(), "loaded system fonts for svg text");
                Arc::new(db)
            })
            .clone()
    }

    fn parse(&mut self, svg: &[u8], resources_dir: Option<&Path>) -> SpriteResult<usvg::Tree> {
        let opts = usvg::Options {
            resources_dir: resources_dir.map(Path::to_path_buf),
            fontdb: self.fontdb(),
            ..Default::default()
        };
        usvg::Tree::from_data(svg, &opts)
            .map_err(|e| SpriteError::conversion(format!("parse svg: {e}")))
    }

    fn render(&mut self, svg: &[u8], resources_dir: Option<&Path>) -> SpriteResult<RasterImage> {
        let tree = self.parse(svg, resources_dir)?;
        let (iw, ih) = intrinsic_size(&tree, svg);
        let (w, h) = self.request.resolve(iw, ih)?;
        rasterize_tree(&tree, w, h)
    }
}

impl RasterBackend for ResvgBackend {
    fn display_name(&self) -> &'static str {
        "resvg"
    }

    fn description(&self) -> &'static str {
        "Built-in Rust renderer (usvg + resvg). No external dependencies, always available."
    }

    fn request(&self) -> &ConversionRequest {
        &self.request
    }

    fn check_availability(&self) -> Result<(), UnavailableReason> {
        Ok(())
    }

    fn probe_intrinsic_size(&self, svg: &[u8]) -> (f64, f64) {
        match usvg::Tree::from_data(svg, &usvg::Options::default()) {
            Ok(tree) => intrinsic_size(&tree, svg),
            Err(e) => {
                tracing::debug!(error = %e, "usvg could not parse svg, using text probe");
                probe::probe_intrinsic_size(svg)
            }
        }
    }

    fn convert_to_image(&mut self, svg: &[u8]) -> SpriteResult<RasterImage> {
        self.render(svg, None)
    }

    fn convert_file(&mut self, input: &Path, output: &Path) -> SpriteResult<()> {
        tracing::debug!(input = %input.display(), output = %output.display(), "resvg convert");
        let svg = read_input(input)?;
        let image = self
            .render(&svg, input.parent())
            .map_err(|e| annotate(e, self.display_name(), input))?;
        write_png(&image, output)
    }
}

/// Root `viewBox` size when valid, otherwise the parsed tree size.
///
/// `usvg` lets `width`/`height` win over the `viewBox`; here the `viewBox` wins, as in
/// [`probe::probe_intrinsic_size`].
fn intrinsic_size(tree: &usvg::Tree, svg: &[u8]) -> (f64, f64) {
    probe::root_view_box(svg).unwrap_or_else(|| {
        (
            f64::from(tree.size().width()),
            f64::from(tree.size().height()),
        )
    })
}

/// Render a parsed tree into a `width x height` straight-alpha raster, stretching to fit.
pub fn rasterize_tree(tree: &usvg::Tree, width: u32, height: u32) -> SpriteResult<RasterImage> {
    if width > MAX_RASTER_SIDE || height > MAX_RASTER_SIDE {
        return Err(SpriteError::conversion(format!(
            "svg raster size too large: {width}x{height} (max {MAX_RASTER_SIDE}x{MAX_RASTER_SIDE})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SpriteError::invalid_dimension(i64::from(width), i64::from(height)))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    let mut data = pixmap.data().to_vec();
    demultiply_rgba8_in_place(&mut data);
    RasterImage::from_raw(width, height, data)
        .ok_or_else(|| SpriteError::conversion("rendered buffer has unexpected length"))
}

#[cfg(test)]
#[path = "../../tests/unit/convert/native.rs"]
mod tests;
