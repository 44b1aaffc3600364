use crate::{CellNum, CellType, Nodata};

/// Holds a single raster row in the native cell representation of the raster.
/// The buffer is allocated once for a raster and overwritten for every row that is read.
#[derive(Debug, Clone, PartialEq)]
pub enum RowBuffer {
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// Evaluates an expression with the typed cell vector of a `RowBuffer`.
#[macro_export]
macro_rules! dispatch_rowbuffer {
    ($buffer:expr, $var:ident, $expr:expr) => {
        match $buffer {
            $crate::RowBuffer::Int32($var) => $expr,
            $crate::RowBuffer::Float32($var) => $expr,
            $crate::RowBuffer::Float64($var) => $expr,
        }
    };
}

impl RowBuffer {
    /// Allocates a row of `cols` cells of the given type, all cells are initialized to nodata.
    pub fn allocate(cell_type: CellType, cols: usize) -> Self {
        match cell_type {
            CellType::Int32 => RowBuffer::Int32(vec![i32::NODATA; cols]),
            CellType::Float32 => RowBuffer::Float32(vec![f32::NODATA; cols]),
            CellType::Float64 => RowBuffer::Float64(vec![f64::NODATA; cols]),
        }
    }

    pub fn from_cells<T: CellNum>(cells: Vec<T>) -> Self {
        T::into_row_buffer(cells)
    }

    pub fn cell_type(&self) -> CellType {
        match self {
            RowBuffer::Int32(_) => CellType::Int32,
            RowBuffer::Float32(_) => CellType::Float32,
            RowBuffer::Float64(_) => CellType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        dispatch_rowbuffer!(self, data, data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the row in bytes
    pub fn byte_size(&self) -> usize {
        self.len() * self.cell_type().cell_size()
    }

    pub fn as_slice<T: CellNum>(&self) -> Option<&[T]> {
        T::row_slice(self)
    }

    pub fn as_mut_slice<T: CellNum>(&mut self) -> Option<&mut [T]> {
        T::row_slice_mut(self)
    }

    pub fn fill_nodata(&mut self) {
        dispatch_rowbuffer!(self, data, fill_nodata(data))
    }

    /// Returns the first and last column of the row that contain data, `None` if the row only contains nodata.
    pub fn data_extent(&self) -> Option<(usize, usize)> {
        dispatch_rowbuffer!(self, data, data_extent(data))
    }
}

fn fill_nodata<T: Nodata>(row: &mut [T]) {
    row.fill(T::NODATA);
}

/// Locates the first and last cell containing data in a single left to right pass.
/// Nodata gaps between the first and last data cell do not affect the result.
pub fn data_extent<T: Nodata>(row: &[T]) -> Option<(usize, usize)> {
    let mut extent: Option<(usize, usize)> = None;

    for (col, &val) in row.iter().enumerate() {
        if val.is_nodata() {
            continue;
        }

        extent = match extent {
            None => Some((col, col)),
            Some((first, _)) => Some((first, col)),
        };
    }

    extent
}
