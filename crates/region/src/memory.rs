use std::{borrow::Cow, collections::HashMap};

use crate::{
    CellLookup, CellNum, CellType, Error, RasterGrid, RasterRowReader, RasterStore, Result, RowBuffer, Window,
    reader::check_row_request,
};

/// A raster map held in memory, cells are stored row major.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRaster<T: CellNum> {
    grid: RasterGrid,
    data: Vec<T>,
}

impl<T: CellNum> MemoryRaster<T> {
    pub fn new(grid: RasterGrid, data: Vec<T>) -> Result<Self> {
        if data.len() != grid.cell_count() {
            return Err(Error::InvalidArgument(format!(
                "Raster data does not match the grid (got {} cells but should be {} cells)",
                data.len(),
                grid.cell_count()
            )));
        }

        Ok(MemoryRaster { grid, data })
    }

    pub fn filled_with_nodata(grid: RasterGrid) -> Self {
        MemoryRaster {
            grid,
            data: vec![T::NODATA; grid.cell_count()],
        }
    }

    pub fn grid(&self) -> &RasterGrid {
        &self.grid
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = row * self.grid.cols;
        &self.data[start..start + self.grid.cols]
    }

    pub fn set_cell(&mut self, row: usize, col: usize, val: T) {
        self.data[row * self.grid.cols + col] = val;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Reads the raster under `window`, the reader borrows the raster
    pub fn open<'a>(&'a self, name: &str, window: &Window) -> MemoryRowReader<'a, T> {
        MemoryRowReader::new(name, Cow::Borrowed(self), window)
    }

    /// Reads the raster under `window`, the reader takes ownership of the raster
    pub fn into_reader(self, name: &str, window: &Window) -> MemoryRowReader<'static, T> {
        MemoryRowReader::new(name, Cow::Owned(self), window)
    }
}

/// Type erased `MemoryRaster`
#[derive(Debug, Clone, PartialEq)]
pub enum AnyMemoryRaster {
    Int32(MemoryRaster<i32>),
    Float32(MemoryRaster<f32>),
    Float64(MemoryRaster<f64>),
}

macro_rules! dispatch_anymemoryraster {
    ($raster:expr, $var:ident, $expr:expr) => {
        match $raster {
            AnyMemoryRaster::Int32($var) => $expr,
            AnyMemoryRaster::Float32($var) => $expr,
            AnyMemoryRaster::Float64($var) => $expr,
        }
    };
}

impl AnyMemoryRaster {
    pub fn cell_type(&self) -> CellType {
        match self {
            AnyMemoryRaster::Int32(_) => CellType::Int32,
            AnyMemoryRaster::Float32(_) => CellType::Float32,
            AnyMemoryRaster::Float64(_) => CellType::Float64,
        }
    }

    pub fn grid(&self) -> &RasterGrid {
        dispatch_anymemoryraster!(self, raster, raster.grid())
    }

    pub fn open<'a>(&'a self, name: &str, window: &Window) -> Box<dyn RasterRowReader + 'a> {
        dispatch_anymemoryraster!(self, raster, Box::new(raster.open(name, window)))
    }

    pub fn into_reader(self, name: &str, window: &Window) -> Box<dyn RasterRowReader> {
        dispatch_anymemoryraster!(self, raster, Box::new(raster.into_reader(name, window)))
    }
}

impl From<MemoryRaster<i32>> for AnyMemoryRaster {
    fn from(raster: MemoryRaster<i32>) -> Self {
        AnyMemoryRaster::Int32(raster)
    }
}

impl From<MemoryRaster<f32>> for AnyMemoryRaster {
    fn from(raster: MemoryRaster<f32>) -> Self {
        AnyMemoryRaster::Float32(raster)
    }
}

impl From<MemoryRaster<f64>> for AnyMemoryRaster {
    fn from(raster: MemoryRaster<f64>) -> Self {
        AnyMemoryRaster::Float64(raster)
    }
}

/// Reads a `MemoryRaster` under a window
pub struct MemoryRowReader<'a, T: CellNum> {
    name: String,
    raster: Cow<'a, MemoryRaster<T>>,
    lookup: CellLookup,
}

impl<'a, T: CellNum> MemoryRowReader<'a, T> {
    fn new(name: &str, raster: Cow<'a, MemoryRaster<T>>, window: &Window) -> Self {
        let lookup = CellLookup::new(raster.grid(), window);
        MemoryRowReader {
            name: name.to_string(),
            raster,
            lookup,
        }
    }
}

impl<T: CellNum> RasterRowReader for MemoryRowReader<'_, T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell_type(&self) -> CellType {
        T::TYPE
    }

    fn read_row(&mut self, row: usize, dst: &mut RowBuffer) -> Result<()> {
        check_row_request(&self.name, row, self.lookup.rows(), self.lookup.cols(), T::TYPE, dst)?;

        let src = self.lookup.source_row(row).map(|src_row| self.raster.row_slice(src_row));
        if let Some(dst) = dst.as_mut_slice::<T>() {
            self.lookup.resample_row(src, dst);
        }

        Ok(())
    }
}

/// A collection of named in-memory rasters, the location is not used to look up rasters.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rasters: HashMap<String, AnyMemoryRaster>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, raster: impl Into<AnyMemoryRaster>) {
        self.rasters.insert(name.into(), raster.into());
    }

    pub fn get(&self, name: &str) -> Result<&AnyMemoryRaster> {
        self.rasters.get(name).ok_or_else(|| Error::Open {
            name: name.to_string(),
            reason: "raster map not found".to_string(),
        })
    }
}

impl RasterStore for MemoryStore {
    fn raster_grid(&self, name: &str, _location: Option<&str>) -> Result<RasterGrid> {
        Ok(*self.get(name)?.grid())
    }

    fn open_raster<'a>(&'a self, name: &str, _location: Option<&str>, window: &Window) -> Result<Box<dyn RasterRowReader + 'a>> {
        Ok(self.get(name)?.open(name, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, Nodata};

    const NOD: i32 = i32::NODATA;

    fn raster_2x3() -> Result<MemoryRaster<i32>> {
        MemoryRaster::new(RasterGrid::new(2.0, 0.0, 1.0, 1.0, 2, 3)?, vec![1, 2, 3, NOD, 5, 6])
    }

    #[test]
    fn data_size_must_match_grid() -> Result<()> {
        let grid = RasterGrid::new(2.0, 0.0, 1.0, 1.0, 2, 3)?;
        assert!(MemoryRaster::new(grid, vec![1.0f32; 5]).is_err());
        assert!(MemoryRaster::new(grid, vec![1.0f32; 6]).is_ok());

        Ok(())
    }

    #[test]
    fn read_under_own_grid() -> Result<()> {
        let raster = raster_2x3()?;
        let window = raster.grid().to_window();
        let mut reader = raster.open("ras", &window);
        let mut row = RowBuffer::allocate(reader.cell_type(), window.cols);

        reader.read_row(0, &mut row)?;
        assert_eq!(row.as_slice::<i32>(), Some(&[1, 2, 3][..]));
        reader.read_row(1, &mut row)?;
        assert_eq!(row.as_slice::<i32>(), Some(&[NOD, 5, 6][..]));

        assert!(matches!(reader.read_row(2, &mut row), Err(Error::Read { row: 2, .. })));

        Ok(())
    }

    #[test]
    fn read_under_larger_window() -> Result<()> {
        let raster = raster_2x3()?;
        let window = Window::new(Bounds::new(3.0, 0.0, 4.0, -1.0), 1.0, 1.0)?;
        let mut reader = raster.into_reader("ras", &window);
        let mut row = RowBuffer::allocate(CellType::Int32, window.cols);

        reader.read_row(0, &mut row)?;
        assert_eq!(row.as_slice::<i32>(), Some(&[NOD; 5][..]));
        reader.read_row(1, &mut row)?;
        assert_eq!(row.as_slice::<i32>(), Some(&[NOD, 1, 2, 3, NOD][..]));
        reader.read_row(2, &mut row)?;
        assert_eq!(row.as_slice::<i32>(), Some(&[NOD, NOD, 5, 6, NOD][..]));

        Ok(())
    }

    #[test]
    fn wrong_buffer_type_is_a_read_error() -> Result<()> {
        let raster = raster_2x3()?;
        let window = raster.grid().to_window();
        let mut reader = raster.open("ras", &window);
        let mut row = RowBuffer::allocate(CellType::Float64, window.cols);

        assert!(matches!(reader.read_row(0, &mut row), Err(Error::Read { .. })));
        Ok(())
    }

    #[test]
    fn store_lookup() -> Result<()> {
        let mut store = MemoryStore::new();
        store.insert("ras", raster_2x3()?);

        assert_eq!(store.raster_grid("ras", None)?, *raster_2x3()?.grid());
        assert_eq!(store.get("ras")?.cell_type(), CellType::Int32);

        let window = store.raster_grid("ras", Some("ignored"))?.to_window();
        let reader = store.open_raster("ras", None, &window)?;
        assert_eq!(reader.name(), "ras");
        assert_eq!(reader.cell_type(), CellType::Int32);

        assert!(matches!(store.open_raster("other", None, &window).err(), Some(Error::Open { .. })));
        Ok(())
    }
}
