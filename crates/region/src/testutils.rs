use approx::relative_eq;

use crate::{CellNum, CellType, Error, RasterRowReader, Result, RowBuffer};

pub const NOD: f64 = 255.0;

pub fn create_vec<T: CellNum>(data: &[f64]) -> Vec<T> {
    data.iter()
        .map(|&v| {
            if relative_eq!(v, NOD) {
                T::NODATA
            } else {
                num::NumCast::from(v).expect("f64 could not be converted to the specified type")
            }
        })
        .collect()
}

/// Reader that produces rows filled with nodata and fails when `fail_row` is requested.
/// Keeps track of the rows that were requested.
pub struct FailingReader {
    cell_type: CellType,
    rows: usize,
    cols: usize,
    fail_row: usize,
    rows_read: Vec<usize>,
}

impl FailingReader {
    pub fn new(cell_type: CellType, rows: usize, cols: usize, fail_row: usize) -> Self {
        FailingReader {
            cell_type,
            rows,
            cols,
            fail_row,
            rows_read: Vec::new(),
        }
    }

    pub fn rows_read(&self) -> Vec<usize> {
        self.rows_read.clone()
    }
}

impl RasterRowReader for FailingReader {
    fn name(&self) -> &str {
        "failing"
    }

    fn cell_type(&self) -> CellType {
        self.cell_type
    }

    fn read_row(&mut self, row: usize, dst: &mut RowBuffer) -> Result<()> {
        self.rows_read.push(row);
        crate::reader::check_row_request(self.name(), row, self.rows, self.cols, self.cell_type, dst)?;

        if row == self.fail_row {
            return Err(Error::Read {
                name: self.name().to_string(),
                row,
                reason: "simulated failure".to_string(),
            });
        }

        dst.fill_nodata();
        Ok(())
    }
}
