use std::cmp::Ordering;

use approx::{AbsDiffEq, RelativeEq};

use crate::{Error, Result};

/// Geographic extent of a window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Bounds { north, south, east, west }
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

impl AbsDiffEq for Bounds {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.north.abs_diff_eq(&other.north, epsilon)
            && self.south.abs_diff_eq(&other.south, epsilon)
            && self.east.abs_diff_eq(&other.east, epsilon)
            && self.west.abs_diff_eq(&other.west, epsilon)
    }
}

impl RelativeEq for Bounds {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.north.relative_eq(&other.north, epsilon, max_relative)
            && self.south.relative_eq(&other.south, epsilon, max_relative)
            && self.east.relative_eq(&other.east, epsilon, max_relative)
            && self.west.relative_eq(&other.west, epsilon, max_relative)
    }
}

/// A geographic region together with the grid that is laid over it.
///
/// The grid is described twice: by the resolution in each axis and by the number of rows and columns.
/// [`Window::adjust`] makes both descriptions consistent with each other.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub rows: usize,
    pub cols: usize,
    pub ns_res: f64,
    pub ew_res: f64,
}

impl Window {
    /// Creates a normalized window where the resolutions determine the number of rows and columns.
    pub fn new(bounds: Bounds, ns_res: f64, ew_res: f64) -> Result<Self> {
        let mut window = Window {
            ns_res,
            ew_res,
            ..Window::with_bounds(bounds)
        };

        window.adjust(false, false)?;
        Ok(window)
    }

    /// Creates a normalized window where the number of rows and columns determine the resolutions.
    pub fn with_rows_cols(bounds: Bounds, rows: usize, cols: usize) -> Result<Self> {
        let mut window = Window {
            rows,
            cols,
            ..Window::with_bounds(bounds)
        };

        window.adjust(true, true)?;
        Ok(window)
    }

    fn with_bounds(bounds: Bounds) -> Self {
        Window {
            north: bounds.north,
            south: bounds.south,
            east: bounds.east,
            west: bounds.west,
            ..Default::default()
        }
    }

    /// Reconciles the row/column counts with the resolutions.
    ///
    /// When `rows_from_counts` is false the north-south resolution is authoritative: the row count is derived
    /// from it (rounded to the nearest integer, at least one row) and the resolution is then recomputed so that it
    /// divides the extent exactly. When true, the row count is authoritative and only the resolution is derived.
    /// `cols_from_counts` applies the same policy to the east-west axis.
    pub fn adjust(&mut self, rows_from_counts: bool, cols_from_counts: bool) -> Result<()> {
        if self.north.partial_cmp(&self.south) != Some(Ordering::Greater) {
            return Err(Error::InvalidWindow(format!(
                "north ({}) must be larger than south ({})",
                self.north, self.south
            )));
        }

        if self.east.partial_cmp(&self.west) != Some(Ordering::Greater) {
            return Err(Error::InvalidWindow(format!(
                "east ({}) must be larger than west ({})",
                self.east, self.west
            )));
        }

        let height = self.north - self.south;
        let width = self.east - self.west;

        self.rows = cell_count(height, self.ns_res, self.rows, rows_from_counts, "ns")?;
        self.cols = cell_count(width, self.ew_res, self.cols, cols_from_counts, "ew")?;
        self.ns_res = height / self.rows as f64;
        self.ew_res = width / self.cols as f64;

        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.north, self.south, self.east, self.west)
    }

    /// Overwrites the geographic bounds, the grid description (rows, cols, resolutions) is left untouched.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.north = bounds.north;
        self.south = bounds.south;
        self.east = bounds.east;
        self.west = bounds.west;
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// The y coordinate of the center of the cells in the given row
    pub fn row_center(&self, row: usize) -> f64 {
        self.north - (row as f64 + 0.5) * self.ns_res
    }

    /// The x coordinate of the center of the cells in the given column
    pub fn col_center(&self, col: usize) -> f64 {
        self.west + (col as f64 + 0.5) * self.ew_res
    }
}

fn cell_count(extent: f64, res: f64, count: usize, from_count: bool, axis: &str) -> Result<usize> {
    if from_count {
        if count == 0 {
            return Err(Error::InvalidWindow(format!("{axis} cell count must be positive")));
        }

        return Ok(count);
    }

    if res.partial_cmp(&0.0) != Some(Ordering::Greater) {
        return Err(Error::InvalidWindow(format!("{axis} resolution must be positive (got {res})")));
    }

    let count = ((extent + res / 2.0) / res) as usize;
    Ok(count.max(1))
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<12}{}", "north:", self.north)?;
        writeln!(f, "{:<12}{}", "south:", self.south)?;
        writeln!(f, "{:<12}{}", "west:", self.west)?;
        writeln!(f, "{:<12}{}", "east:", self.east)?;
        writeln!(f, "{:<12}{}", "nsres:", self.ns_res)?;
        writeln!(f, "{:<12}{}", "ewres:", self.ew_res)?;
        writeln!(f, "{:<12}{}", "rows:", self.rows)?;
        writeln!(f, "{:<12}{}", "cols:", self.cols)?;
        write!(f, "{:<12}{}", "cells:", self.cell_count())
    }
}

impl AbsDiffEq for Window {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.bounds().abs_diff_eq(&other.bounds(), epsilon)
            && self.ns_res.abs_diff_eq(&other.ns_res, epsilon)
            && self.ew_res.abs_diff_eq(&other.ew_res, epsilon)
    }
}

impl RelativeEq for Window {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.bounds().relative_eq(&other.bounds(), epsilon, max_relative)
            && self.ns_res.relative_eq(&other.ns_res, epsilon, max_relative)
            && self.ew_res.relative_eq(&other.ew_res, epsilon, max_relative)
    }
}
