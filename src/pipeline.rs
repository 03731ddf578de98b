//! End-to-end jobs: single conversion, batch conversion and spritesheet generation.

use std::path::{Path, PathBuf};

use crate::{
    config::JobConfig,
    convert::{
        backend::{RasterBackend, write_png},
        registry::SpriteRegistry,
    },
    discover::{InputKind, discover_inputs, sort_inputs, sprite_name},
    foundation::error::{SpriteError, SpriteResult},
    sheet::{compositor::compose, metadata::SheetMetadata, tiles::prepare_tiles},
};

/// Summary of a batch conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub converted: usize,
    pub copied: usize,
    pub outputs: Vec<PathBuf>,
}

/// Convert one SVG file to PNG at `cfg.output`.
///
/// The backend is closed afterwards, also when the conversion fails.
#[tracing::instrument(
    skip(registry, cfg),
    fields(input = %cfg.input.display(), backend = %cfg.backend)
)]
pub fn convert_one(registry: &SpriteRegistry, cfg: &JobConfig) -> SpriteResult<()> {
    ensure_known_backend(registry, &cfg.backend)?;
    if InputKind::of(&cfg.input) != Some(InputKind::Svg) {
        return Err(SpriteError::configuration(format!(
            "'{}' is not an .svg file",
            cfg.input.display()
        )));
    }
    ensure_writable(&cfg.output, cfg.force)?;

    let request = cfg.conversion_request()?;
    let mut backend = registry.create(&cfg.backend, request)?;
    let result = backend.convert_file(&cfg.input, &cfg.output);
    close_backend(backend.as_mut());
    result?;

    tracing::info!(output = %cfg.output.display(), "converted");
    Ok(())
}

/// Convert every discovered input into `<output>/<stem>.png`.
///
/// SVGs go through the backend; PNG inputs are copied as they are.
#[tracing::instrument(
    skip(registry, cfg),
    fields(input = %cfg.input.display(), backend = %cfg.backend)
)]
pub fn convert_batch(registry: &SpriteRegistry, cfg: &JobConfig) -> SpriteResult<BatchReport> {
    ensure_known_backend(registry, &cfg.backend)?;
    let inputs = sort_inputs(discover_inputs(&cfg.input)?, cfg.sort)?;

    let targets = inputs
        .iter()
        .map(|p| cfg.output.join(format!("{}.png", sprite_name(p))))
        .collect::<Vec<_>>();
    for (i, t) in targets.iter().enumerate() {
        if targets[..i].contains(t) {
            return Err(SpriteError::configuration(format!(
                "two inputs map to the same output '{}'",
                t.display()
            )));
        }
        ensure_writable(t, cfg.force)?;
    }

    let needs_backend = inputs
        .iter()
        .any(|p| InputKind::of(p) == Some(InputKind::Svg));
    let mut backend = if needs_backend {
        Some(registry.create(&cfg.backend, cfg.conversion_request()?)?)
    } else {
        None
    };

    let mut report = BatchReport::default();
    let result = (|| -> SpriteResult<()> {
        for (input, output) in inputs.iter().zip(&targets) {
            match (InputKind::of(input), backend.as_mut()) {
                (Some(InputKind::Svg), Some(b)) => {
                    b.convert_file(input, output)?;
                    report.converted += 1;
                }
                _ => {
                    crate::convert::backend::ensure_parent_dir(output)?;
                    std::fs::copy(input, output).map_err(|e| SpriteError::io(input, e))?;
                    report.copied += 1;
                }
            }
            tracing::debug!(
                input = %input.display(),
                output = %output.display(),
                "batch item done"
            );
            report.outputs.push(output.clone());
        }
        Ok(())
    })();

    if let Some(b) = backend.as_mut() {
        close_backend(b.as_mut());
    }
    result?;

    tracing::info!(
        converted = report.converted,
        copied = report.copied,
        "batch conversion finished"
    );
    Ok(report)
}

/// Build a spritesheet from every discovered input and write it to `cfg.output`.
///
/// Metadata is exported when `cfg.meta` is set. Returns the sheet index.
#[tracing::instrument(
    skip(registry, cfg),
    fields(input = %cfg.input.display(), backend = %cfg.backend)
)]
pub fn generate_sheet(registry: &SpriteRegistry, cfg: &JobConfig) -> SpriteResult<SheetMetadata> {
    ensure_known_backend(registry, &cfg.backend)?;
    ensure_writable(&cfg.output, cfg.force)?;
    let meta_target = cfg.metadata_target();
    if let Some((path, _)) = &meta_target {
        ensure_writable(path, cfg.force)?;
    }

    let inputs = sort_inputs(discover_inputs(&cfg.input)?, cfg.sort)?;
    tracing::info!(inputs = inputs.len(), "building spritesheet");

    let spec = cfg.layout_spec();
    let layout = spec.compute(inputs.len())?;
    let tiles = prepare_tiles(
        registry,
        &cfg.backend,
        cfg.conversion_request()?,
        &inputs,
        &cfg.tile_options(),
        &cfg.threading(),
    )?;

    let (sheet, meta) = compose(tiles, &layout)?;
    write_png(&sheet, &cfg.output)?;
    tracing::info!(
        output = %cfg.output.display(),
        width = meta.canvas_width,
        height = meta.canvas_height,
        columns = meta.columns,
        rows = meta.rows,
        "wrote spritesheet"
    );

    if let Some((path, format)) = meta_target {
        meta.write(&path, format)?;
        tracing::info!(path = %path.display(), "wrote metadata");
    }
    Ok(meta)
}

fn ensure_known_backend(registry: &SpriteRegistry, backend: &str) -> SpriteResult<()> {
    if !registry.contains(backend) {
        return Err(SpriteError::UnknownBackend {
            backend: backend.to_string(),
        });
    }
    Ok(())
}

fn ensure_writable(path: &Path, force: bool) -> SpriteResult<()> {
    if !force && path.exists() {
        return Err(SpriteError::configuration(format!(
            "output file '{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Ok(())
}

fn close_backend(backend: &mut dyn RasterBackend) {
    if let Err(e) = backend.close() {
        tracing::warn!(error = %e, backend = backend.display_name(), "failed to close backend");
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
