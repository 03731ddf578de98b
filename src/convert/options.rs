use crate::foundation::error::{SpriteError, SpriteResult};

/// Requested output size for a single conversion.
///
/// At most one sizing mode is active: a scale factor, an explicit `width x height`, a width only,
/// or a height only. With nothing set the source's intrinsic size is used.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConversionRequest {
    scale: Option<f64>,
    width: Option<u32>,
    height: Option<u32>,
}

impl ConversionRequest {
    /// Build a request from raw option values where `0` means "unset".
    pub fn new(scale: f64, width: u32, height: u32) -> SpriteResult<Self> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(SpriteError::configuration(format!(
                "scale must be a finite, non-negative number (got {scale})"
            )));
        }
        if scale > 0.0 && (width > 0 || height > 0) {
            return Err(SpriteError::configuration(
                "cannot specify both scale and width/height",
            ));
        }
        Ok(Self {
            scale: (scale > 0.0).then_some(scale),
            width: (width > 0).then_some(width),
            height: (height > 0).then_some(height),
        })
    }

    /// Render at the source's intrinsic size.
    pub fn intrinsic() -> Self {
        Self::default()
    }

    pub fn scaled(scale: f64) -> SpriteResult<Self> {
        Self::new(scale, 0, 0)
    }

    pub fn sized(width: u32, height: u32) -> SpriteResult<Self> {
        Self::new(0.0, width, height)
    }

    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Resolve the raster size for a source of the given intrinsic size.
    pub fn resolve(&self, source_width: f64, source_height: f64) -> SpriteResult<(u32, u32)> {
        resolve_dimensions(source_width, source_height, self)
    }
}

/// Resolve the target raster size of a conversion.
///
/// Shared by every backend so a given request yields the same size whichever renderer runs it.
/// Values are rounded half away from zero.
pub fn resolve_dimensions(
    source_width: f64,
    source_height: f64,
    request: &ConversionRequest,
) -> SpriteResult<(u32, u32)> {
    if !source_width.is_finite()
        || !source_height.is_finite()
        || source_width <= 0.0
        || source_height <= 0.0
    {
        return Err(SpriteError::invalid_dimension(
            round_px(source_width),
            round_px(source_height),
        ));
    }

    let (w, h) = match (request.scale, request.width, request.height) {
        (Some(s), _, _) if s > 0.0 => (
            round_px(source_width * s),
            round_px(source_height * s),
        ),
        (_, Some(w), Some(h)) => (i64::from(w), i64::from(h)),
        (_, Some(w), None) => (
            i64::from(w),
            round_px(f64::from(w) * source_height / source_width),
        ),
        (_, None, Some(h)) => (
            round_px(f64::from(h) * source_width / source_height),
            i64::from(h),
        ),
        _ => (round_px(source_width), round_px(source_height)),
    };

    if w <= 0 || h <= 0 || w > i64::from(u32::MAX) || h > i64::from(u32::MAX) {
        return Err(SpriteError::invalid_dimension(w, h));
    }
    Ok((w as u32, h as u32))
}

fn round_px(v: f64) -> i64 {
    if v.is_finite() { v.round() as i64 } else { 0 }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/options.rs"]
mod tests;
