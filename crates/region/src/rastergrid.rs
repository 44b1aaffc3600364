use crate::{Bounds, Error, Nodata, Result, Window};

/// The grid of a raster map as it is stored: its top left corner, cell size and dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterGrid {
    pub north: f64,
    pub west: f64,
    pub ns_res: f64,
    pub ew_res: f64,
    pub rows: usize,
    pub cols: usize,
}

impl RasterGrid {
    pub fn new(north: f64, west: f64, ns_res: f64, ew_res: f64, rows: usize, cols: usize) -> Result<Self> {
        if !(ns_res.is_finite() && ns_res > 0.0 && ew_res.is_finite() && ew_res > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "Raster cell size must be positive (nsres: {ns_res}, ewres: {ew_res})"
            )));
        }

        if rows == 0 || cols == 0 {
            return Err(Error::InvalidArgument(format!("Raster must not be empty ({rows}x{cols})")));
        }

        if rows.checked_mul(cols).is_none() {
            return Err(Error::InvalidArgument(format!("Raster dimensions are too large ({rows}x{cols})")));
        }

        Ok(RasterGrid {
            north,
            west,
            ns_res,
            ew_res,
            rows,
            cols,
        })
    }

    /// Creates a grid from a GDAL style geo transform: [top left x, pixel width, 0, top left y, 0, pixel height]
    pub fn from_geo_transform(gt: [f64; 6], rows: usize, cols: usize) -> Result<Self> {
        if gt[2] != 0.0 || gt[4] != 0.0 {
            return Err(Error::InvalidArgument("Rotated rasters are not supported".to_string()));
        }

        RasterGrid::new(gt[3], gt[0], gt[5].abs(), gt[1], rows, cols)
    }

    pub fn south(&self) -> f64 {
        self.north - self.rows as f64 * self.ns_res
    }

    pub fn east(&self) -> f64 {
        self.west + self.cols as f64 * self.ew_res
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.north, self.south(), self.east(), self.west)
    }

    /// The window that exactly covers the raster
    pub fn to_window(&self) -> Window {
        Window {
            north: self.north,
            south: self.south(),
            east: self.east(),
            west: self.west,
            rows: self.rows,
            cols: self.cols,
            ns_res: self.ns_res,
            ew_res: self.ew_res,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// The row of the raster that contains the y coordinate, `None` when outside of the raster
    pub fn row_at(&self, y: f64) -> Option<usize> {
        grid_index((self.north - y) / self.ns_res, self.rows)
    }

    /// The column of the raster that contains the x coordinate, `None` when outside of the raster
    pub fn col_at(&self, x: f64) -> Option<usize> {
        grid_index((x - self.west) / self.ew_res, self.cols)
    }
}

fn grid_index(pos: f64, count: usize) -> Option<usize> {
    let index = pos.floor();
    if index < 0.0 || index >= count as f64 {
        return None;
    }

    Some(index as usize)
}

/// Maps the cells of a window onto the cells of a raster grid.
///
/// Every window cell takes the value of the raster cell that contains its center (nearest neighbour).
/// Window cells whose center lies outside of the raster map to nodata.
#[derive(Debug, Clone)]
pub struct CellLookup {
    src_rows: Vec<Option<usize>>,
    src_cols: Vec<Option<usize>>,
}

impl CellLookup {
    pub fn new(grid: &RasterGrid, window: &Window) -> Self {
        CellLookup {
            src_rows: (0..window.rows).map(|row| grid.row_at(window.row_center(row))).collect(),
            src_cols: (0..window.cols).map(|col| grid.col_at(window.col_center(col))).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.src_rows.len()
    }

    pub fn cols(&self) -> usize {
        self.src_cols.len()
    }

    /// The raster row that provides the values of the window row
    pub fn source_row(&self, row: usize) -> Option<usize> {
        self.src_rows.get(row).copied().flatten()
    }

    /// Fills the window row `dst` from the raster row `src`, pass `None` when the window row lies outside of the raster.
    pub fn resample_row<T: Nodata>(&self, src: Option<&[T]>, dst: &mut [T]) {
        debug_assert_eq!(dst.len(), self.src_cols.len());

        match src {
            Some(src) => {
                for (dst_val, src_col) in dst.iter_mut().zip(&self.src_cols) {
                    *dst_val = src_col.and_then(|col| src.get(col).copied()).unwrap_or(T::NODATA);
                }
            }
            None => dst.fill(T::NODATA),
        }
    }
}
