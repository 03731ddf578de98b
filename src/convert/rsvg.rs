use std::{ffi::OsStr, path::Path};

use crate::{
    convert::{
        backend::{
            RasterBackend, RasterImage, UnavailableReason, annotate, decode_raster,
            ensure_parent_dir, read_input,
        },
        external::{check_tool, path_arg, run_tool, stage_svg},
        options::ConversionRequest,
        probe,
    },
    foundation::error::SpriteResult,
};

pub const DEFAULT_PROGRAM: &str = "rsvg-convert";

/// Renders through the system `rsvg-convert` (librsvg), one process per conversion.
pub struct RsvgBackend {
    request: ConversionRequest,
    program: String,
}

impl RsvgBackend {
    pub fn new(request: ConversionRequest) -> Self {
        Self::with_program(request, DEFAULT_PROGRAM)
    }

    /// Use a specific executable name or path instead of `rsvg-convert`.
    pub fn with_program(request: ConversionRequest, program: impl Into<String>) -> Self {
        Self {
            request,
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Natural size as rendered by librsvg: render without size flags and read the PNG header.
    fn query_size(&self, svg_path: &Path) -> SpriteResult<(f64, f64)> {
        let args = [OsStr::new("--format"), OsStr::new("png"), svg_path.as_os_str()];
        let out = run_tool(&self.program, args)?;
        let img = decode_raster(&out.stdout)?;
        Ok((f64::from(img.width()), f64::from(img.height())))
    }

    fn natural_size(&self, svg: &[u8], svg_path: &Path) -> (f64, f64) {
        match self.query_size(svg_path) {
            Ok(size) => size,
            Err(e) => {
                tracing::debug!(error = %e, "rsvg-convert size query failed, using text probe");
                probe::probe_intrinsic_size(svg)
            }
        }
    }

    fn size_args(width: u32, height: u32) -> Vec<String> {
        vec![
            "--format".to_string(),
            "png".to_string(),
            "--width".to_string(),
            width.to_string(),
            "--height".to_string(),
            height.to_string(),
        ]
    }
}

impl RasterBackend for RsvgBackend {
    fn display_name(&self) -> &'static str {
        "RSVG (librsvg)"
    }

    fn description(&self) -> &'static str {
        "System rsvg-convert command using librsvg. \
         Requires librsvg2-bin (Debian/Ubuntu) or librsvg (Homebrew)."
    }

    fn request(&self) -> &ConversionRequest {
        &self.request
    }

    fn check_availability(&self) -> Result<(), UnavailableReason> {
        check_tool(
            &self.program,
            "install librsvg2-bin (Debian/Ubuntu) or librsvg (Homebrew)",
        )
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

        let mut args = Self::size_args(tw, th);
        args.push(path_arg(file.path()));
        let out = run_tool(&self.program, &args)?;
        decode_raster(&out.stdout)
    }

    fn convert_file(&mut self, input: &Path, output: &Path) -> SpriteResult<()> {
        let svg = read_input(input)?;
        let (w, h) = self.natural_size(&svg, input);
        let (tw, th) = self
            .request
            .resolve(w, h)
            .map_err(|e| annotate(e, self.display_name(), input))?;
        ensure_parent_dir(output)?;

        let mut args = Self::size_args(tw, th);
        args.extend(["--output".to_string(), path_arg(output), path_arg(input)]);
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            width = tw,
            height = th,
            "rsvg-convert"
        );
        run_tool(&self.program, &args).map_err(|e| annotate(e, self.display_name(), input))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/rsvg.rs"]
mod tests;
