use crate::foundation::error::{SpriteError, SpriteResult};

/// Grid placement parameters for one spritesheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub columns: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub padding: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Layout {
    /// Number of cells in the grid.
    pub fn capacity(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// Top-left corner of the cell for placement ordinal `index` (row-major).
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let col = index as u64 % u64::from(self.columns);
        let row = index as u64 / u64::from(self.columns);
        let x = col * (u64::from(self.tile_width) + u64::from(self.padding));
        let y = row * (u64::from(self.tile_height) + u64::from(self.padding));
        (x as u32, y as u32)
    }
}

/// Tile geometry and grid hints, independent of how many tiles there are.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutSpec {
    pub tile_width: u32,
    pub tile_height: u32,
    pub padding: u32,
    /// Fixed column count; `0` leaves it to the engine.
    pub columns: u32,
    /// Fixed row count; `0` leaves it to the engine.
    pub rows: u32,
}

impl LayoutSpec {
    pub fn compute(&self, tile_count: usize) -> SpriteResult<Layout> {
        compute_layout(
            tile_count,
            self.tile_width,
            self.tile_height,
            self.padding,
            self.columns,
            self.rows,
        )
    }
}

/// Deterministic grid for `tile_count` tiles.
///
/// A column hint fixes the columns, a row hint fixes the rows, and with neither the grid is as
/// close to square as possible (`ceil(sqrt(n))` columns). Giving both hints is rejected.
pub fn compute_layout(
    tile_count: usize,
    tile_width: u32,
    tile_height: u32,
    padding: u32,
    columns_hint: u32,
    rows_hint: u32,
) -> SpriteResult<Layout> {
    if tile_count == 0 {
        return Err(SpriteError::empty_input("no tiles to lay out"));
    }
    if tile_width == 0 || tile_height == 0 {
        return Err(SpriteError::configuration(format!(
            "tile size must be positive (got {tile_width}x{tile_height})"
        )));
    }
    if columns_hint > 0 && rows_hint > 0 {
        return Err(SpriteError::configuration(
            "cannot fix both columns and rows",
        ));
    }

    let n = tile_count as u64;
    let (columns, rows) = if columns_hint > 0 {
        let c = u64::from(columns_hint);
        (c, n.div_ceil(c))
    } else if rows_hint > 0 {
        let r = u64::from(rows_hint);
        (n.div_ceil(r), r)
    } else {
        let c = ceil_sqrt(n);
        (c, n.div_ceil(c))
    };

    let canvas_width = span(columns, tile_width, padding)?;
    let canvas_height = span(rows, tile_height, padding)?;

    Ok(Layout {
        columns: to_u32(columns)?,
        rows: to_u32(rows)?,
        tile_width,
        tile_height,
        padding,
        canvas_width,
        canvas_height,
    })
}

fn span(cells: u64, tile: u32, padding: u32) -> SpriteResult<u32> {
    let total = cells * u64::from(tile) + (cells - 1) * u64::from(padding);
    to_u32(total)
}

fn to_u32(v: u64) -> SpriteResult<u32> {
    u32::try_from(v)
        .map_err(|_| SpriteError::configuration(format!("spritesheet too large ({v} pixels)")))
}

fn ceil_sqrt(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    while r * r < n {
        r += 1;
    }
    while r > 1 && (r - 1) * (r - 1) >= n {
        r -= 1;
    }
    r.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/layout.rs"]
mod tests;
