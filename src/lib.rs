#![forbid(unsafe_code)]

//! SVG to PNG conversion behind pluggable raster backends, and deterministic grid spritesheets
//! with a positional metadata index.
//!
//! The crate has two cores:
//! - [`convert`]: the [`RasterBackend`] contract, four implementations (in-process `resvg`,
//!   headless Chrome, `rsvg-convert`, `inkscape`) and the [`SpriteRegistry`] that hands them out;
//! - [`sheet`]: [`compute_layout`], [`compose`] and the [`SheetMetadata`] index.
//!
//! [`pipeline`] wires them together for the `spritepress` binary.

pub mod config;
pub mod convert;
pub mod discover;
mod foundation;
pub mod image_ops;
pub mod pipeline;
pub mod sheet;

pub use config::JobConfig;
pub use convert::{
    backend::{BackendDescriptor, BackendKind, RasterBackend, RasterImage, UnavailableReason},
    options::{ConversionRequest, resolve_dimensions},
    registry::{BackendFactory, SpriteRegistry},
};
pub use discover::{SortMode, discover_inputs, sort_inputs, sprite_name};
pub use foundation::error::{SpriteError, SpriteResult};
pub use pipeline::{BatchReport, convert_batch, convert_one, generate_sheet};
pub use sheet::{
    compositor::compose,
    layout::{Layout, LayoutSpec, compute_layout},
    metadata::{MetaFormat, SheetMetadata, SpriteMetadata},
    tiles::{FitMode, TileEntry, TileOptions, TileThreading, prepare_tiles},
};
