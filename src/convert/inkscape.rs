use std::path::Path;

use crate::{
    convert::{
        backend::{
            RasterBackend, RasterImage, UnavailableReason, annotate, decode_raster,
            ensure_parent_dir, read_input,
        },
        external::{check_tool, describe_output, path_arg, run_tool, scratch_dir, stage_svg},
        options::ConversionRequest,
        probe,
    },
    foundation::error::{SpriteError, SpriteResult},
};

pub const DEFAULT_PROGRAM: &str = "inkscape";

/// Renders through the system `inkscape` command line, one process per conversion.
pub struct InkscapeBackend {
    request: ConversionRequest,
    program: String,
}

impl InkscapeBackend {
    pub fn new(request: ConversionRequest) -> Self {
        Self::with_program(request, DEFAULT_PROGRAM)
    }

    pub fn with_program(request: ConversionRequest, program: impl Into<String>) -> Self {
        Self {
            request,
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn query_size(&self, svg_path: &Path) -> SpriteResult<(f64, f64)> {
        let out = run_tool(
            &self.program,
            [
                "--query-width".to_string(),
                "--query-height".to_string(),
                path_arg(svg_path),
            ],
        )?;
        parse_query_output(&String::from_utf8_lossy(&out.stdout)).ok_or_else(|| {
            SpriteError::conversion(format!(
                "unexpected output from inkscape query: {}",
                describe_output(&out)
            ))
        })
    }

    fn natural_size(&self, svg: &[u8], svg_path: &Path) -> (f64, f64) {
        match self.query_size(svg_path) {
            Ok(size) => size,
            Err(e) => {
                tracing::debug!(error = %e, "inkscape size query failed, using text probe");
                probe::probe_intrinsic_size(svg)
            }
        }
    }

    fn export(&self, input: &Path, output: &Path, width: u32, height: u32) -> SpriteResult<()> {
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            width,
            height,
            "inkscape export"
        );
        run_tool(
            &self.program,
            [
                "--export-type=png".to_string(),
                format!("--export-width={width}"),
                format!("--export-height={height}"),
                format!("--export-filename={}", path_arg(output)),
                path_arg(input),
            ],
        )?;
        Ok(())
    }
}

/// First two non-empty lines of `--query-width --query-height` output as `(width, height)`.
pub fn parse_query_output(stdout: &str) -> Option<(f64, f64)> {
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());
    let w = lines.next()?.parse::<f64>().ok()?;
    let h = lines.next()?.parse::<f64>().ok()?;
    (w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0).then_some((w, h))
}

impl RasterBackend for InkscapeBackend {
    fn display_name(&self) -> &'static str {
        "Inkscape"
    }

    fn description(&self) -> &'static str {
        "Inkscape command-line tool. Requires Inkscape 1.x on PATH (https://inkscape.org/)."
    }

    fn request(&self) -> &ConversionRequest {
        &self.request
    }

    fn check_availability(&self) -> Result<(), UnavailableReason> {
        check_tool(&self.program, "install Inkscape (https://inkscape.org/)")
    }

    fn probe_intrinsic_size(&self, svg: &[u8]) -> (f64, f64) {
        match stage_svg(svg) {
            Ok(file) => self.natural_size(svg, file.path()),
            Err(_) => probe::probe_intrinsic_size(svg),
        }
    }

    fn convert_to_image(&mut self, svg: &[u8]) -> SpriteResult<RasterImage> {
        let file = stage_svg(svg)?;
        let (w, h) = self.natural_size(svg, file.path());
        let (tw, th) = self.request.resolve(w, h)?;

        let dir = scratch_dir()?;
        let png = dir.path().join("out.png");
        self.export(file.path(), &png, tw, th)?;
        let bytes = std::fs::read(&png).map_err(|e| SpriteError::io(&png, e))?;
        decode_raster(&bytes)
    }

    fn convert_file(&mut self, input: &Path, output: &Path) -> SpriteResult<()> {
        let svg = read_input(input)?;
        let (w, h) = self.natural_size(&svg, input);
        let (tw, th) = self
            .request
            .resolve(w, h)
            .map_err(|e| annotate(e, self.display_name(), input))?;
        ensure_parent_dir(output)?;
        self.export(input, output, tw, th)
            .map_err(|e| annotate(e, self.display_name(), input))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/inkscape.rs"]
mod tests;
