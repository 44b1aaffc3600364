use crate::{Bounds, RasterRowReader, Result, RowBuffer, Window};

/// Inclusive row/column extent of the cells that contain data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl BoundingBox {
    pub fn rows(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn cols(&self) -> usize {
        self.right - self.left + 1
    }

    /// The geographic bounds of the box, using the origin and resolution of the window it was scanned under.
    pub fn project(&self, window: &Window) -> Bounds {
        Bounds {
            north: window.north - self.top as f64 * window.ns_res,
            south: window.north - (self.bottom + 1) as f64 * window.ns_res,
            west: window.west + self.left as f64 * window.ew_res,
            east: window.west + (self.right + 1) as f64 * window.ew_res,
        }
    }
}

/// Accumulates the data extent of the rows of a raster.
/// Starts out empty: top at the row count, left at the column count, no bottom and no right.
struct BoundsAccumulator {
    top: usize,
    bottom: Option<usize>,
    left: usize,
    right: Option<usize>,
}

impl BoundsAccumulator {
    fn new(rows: usize, cols: usize) -> Self {
        BoundsAccumulator {
            top: rows,
            bottom: None,
            left: cols,
            right: None,
        }
    }

    fn add_row(&mut self, row: usize, first_col: usize, last_col: usize) {
        self.top = self.top.min(row);
        self.bottom = Some(self.bottom.map_or(row, |bottom| bottom.max(row)));
        self.left = self.left.min(first_col);
        self.right = Some(self.right.map_or(last_col, |right| right.max(last_col)));
    }

    fn finish(self) -> Option<BoundingBox> {
        Some(BoundingBox {
            top: self.top,
            bottom: self.bottom?,
            left: self.left,
            right: self.right?,
        })
    }
}

/// Reads all `rows` rows of `cols` cells from the reader, top to bottom, and returns the extent of the cells that contain data.
/// Returns `None` when every cell is nodata.
///
/// A single row buffer is used for the full scan. A failure to read a row aborts the scan, the remaining rows are not read.
pub fn scan_data_bounds(reader: &mut dyn RasterRowReader, rows: usize, cols: usize) -> Result<Option<BoundingBox>> {
    let mut row_buffer = RowBuffer::allocate(reader.cell_type(), cols);
    log::debug!(
        "Scan <{}>: {rows} rows of {cols} {} cells ({} bytes per row)",
        reader.name(),
        row_buffer.cell_type(),
        row_buffer.byte_size()
    );

    let mut bounds = BoundsAccumulator::new(rows, cols);
    for row in 0..rows {
        reader.read_row(row, &mut row_buffer)?;

        if let Some((first_col, last_col)) = row_buffer.data_extent() {
            log::trace!("Row {row}: data in columns {first_col}..={last_col}");
            bounds.add_row(row, first_col, last_col);
        }
    }

    Ok(bounds.finish())
}
