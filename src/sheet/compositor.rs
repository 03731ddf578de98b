use crate::{
    convert::backend::RasterImage,
    foundation::error::{SpriteError, SpriteResult},
    image_ops::draw_over,
    sheet::{
        layout::Layout,
        metadata::{SheetMetadata, SpriteMetadata},
        tiles::TileEntry,
    },
};

/// Place `tiles` on a transparent canvas in row-major order and index them.
///
/// Tiles are consumed. Each must already be exactly `tile_width x tile_height`; unused trailing
/// cells stay transparent.
pub fn compose(
    tiles: Vec<TileEntry>,
    layout: &Layout,
) -> SpriteResult<(RasterImage, SheetMetadata)> {
    if tiles.is_empty() {
        return Err(SpriteError::empty_input("no tiles to compose"));
    }
    if tiles.len() as u64 > layout.capacity() {
        return Err(SpriteError::configuration(format!(
            "{} tiles do not fit a {}x{} grid",
            tiles.len(),
            layout.columns,
            layout.rows
        )));
    }

    let want = (layout.tile_width, layout.tile_height);
    if let Some((index, tile)) = tiles
        .iter()
        .enumerate()
        .find(|(_, t)| t.image.dimensions() != want)
    {
        return Err(SpriteError::TileSizeMismatch {
            index,
            got: tile.image.dimensions(),
            want,
        });
    }

    let mut canvas = RasterImage::new(layout.canvas_width, layout.canvas_height);
    let mut sprites = Vec::with_capacity(tiles.len());
    for (index, tile) in tiles.into_iter().enumerate() {
        let (x, y) = layout.cell_origin(index);
        draw_over(&mut canvas, &tile.image, i64::from(x), i64::from(y));
        sprites.push(SpriteMetadata {
            name: tile.source_name,
            x,
            y,
            width: layout.tile_width,
            height: layout.tile_height,
            index,
        });
    }
    tracing::debug!(
        sprites = sprites.len(),
        width = layout.canvas_width,
        height = layout.canvas_height,
        "composed spritesheet"
    );

    let meta = SheetMetadata {
        canvas_width: layout.canvas_width,
        canvas_height: layout.canvas_height,
        tile_width: layout.tile_width,
        tile_height: layout.tile_height,
        columns: layout.columns,
        rows: layout.rows,
        padding: layout.padding,
        sprites,
    };
    Ok((canvas, meta))
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/compositor.rs"]
mod tests;
