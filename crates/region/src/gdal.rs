use std::path::Path;

use gdal::raster::{GdalDataType, GdalType, RasterBand};

use crate::{
    CellLookup, CellNum, CellType, Error, Nodata, RasterGrid, RasterRowReader, Result, RowBuffer, Window, reader::check_row_request,
};

const BAND_INDEX: usize = 1;

/// Reads the first band of a raster supported by GDAL under a window.
/// Only the raster rows that are needed by the window are read, each one once for consecutive window rows.
pub struct GdalRowReader {
    name: String,
    ds: gdal::Dataset,
    cell_type: CellType,
    nodata: Option<f64>,
    lookup: CellLookup,
    src_row: RowBuffer,
    loaded_src_row: Option<usize>,
}

/// Integer bands that fit in an `i32` (Int8, UInt8, Int16, UInt16, Int32) are read as `Int32`
fn cell_type_for_band(data_type: GdalDataType) -> CellType {
    let bits = data_type.bits();
    if data_type.is_integer() && (bits < 32 || (bits == 32 && data_type.is_signed())) {
        CellType::Int32
    } else if data_type == GdalDataType::Float32 {
        CellType::Float32
    } else {
        CellType::Float64
    }
}

fn dataset_grid(ds: &gdal::Dataset) -> Result<RasterGrid> {
    let (cols, rows) = ds.raster_size();
    RasterGrid::from_geo_transform(ds.geo_transform()?, rows, cols)
}

fn read_source_row<T: CellNum + GdalType>(band: &RasterBand, row: usize, nodata: Option<f64>, dst: &mut [T]) -> Result<()> {
    let cols = dst.len();
    band.read_into_slice::<T>((0, row as isize), (cols, 1), (cols, 1), dst, None)?;

    if let Some(nodata) = nodata.and_then(num::NumCast::from) {
        dst.iter_mut().for_each(|val: &mut T| val.init_nodata(nodata));
    }

    Ok(())
}

impl GdalRowReader {
    pub fn read_grid(path: &Path) -> Result<RasterGrid> {
        dataset_grid(&gdal::Dataset::open(path)?)
    }

    pub fn open(name: &str, path: &Path, window: &Window) -> Result<Self> {
        let ds = gdal::Dataset::open(path)?;
        let grid = dataset_grid(&ds)?;

        let (cell_type, nodata) = {
            let band = ds.rasterband(BAND_INDEX)?;
            (cell_type_for_band(band.band_type()), band.no_data_value())
        };

        log::debug!("GDAL raster <{name}>: {grid:?}, cell type {cell_type}, nodata {nodata:?}");

        Ok(GdalRowReader {
            name: name.to_string(),
            ds,
            cell_type,
            nodata,
            lookup: CellLookup::new(&grid, window),
            src_row: RowBuffer::allocate(cell_type, grid.cols),
            loaded_src_row: None,
        })
    }

    fn load_source_row<T: CellNum + GdalType>(&mut self, src_row: usize) -> Result<()> {
        let band = self.ds.rasterband(BAND_INDEX)?;
        if let Some(dst) = self.src_row.as_mut_slice::<T>() {
            read_source_row(&band, src_row, self.nodata, dst)?;
        }

        Ok(())
    }

    fn resample<T: CellNum>(&self, inside_raster: bool, dst: &mut RowBuffer) {
        if let (Some(src), Some(dst)) = (self.src_row.as_slice::<T>(), dst.as_mut_slice::<T>()) {
            self.lookup.resample_row(inside_raster.then_some(src), dst);
        }
    }

    fn read_window_row(&mut self, row: usize, dst: &mut RowBuffer) -> Result<()> {
        let src_row = self.lookup.source_row(row);

        if let Some(src_row) = src_row
            && self.loaded_src_row != Some(src_row)
        {
            self.loaded_src_row = None;
            match self.cell_type {
                CellType::Int32 => self.load_source_row::<i32>(src_row)?,
                CellType::Float32 => self.load_source_row::<f32>(src_row)?,
                CellType::Float64 => self.load_source_row::<f64>(src_row)?,
            }
            self.loaded_src_row = Some(src_row);
        }

        match self.cell_type {
            CellType::Int32 => self.resample::<i32>(src_row.is_some(), dst),
            CellType::Float32 => self.resample::<f32>(src_row.is_some(), dst),
            CellType::Float64 => self.resample::<f64>(src_row.is_some(), dst),
        }

        Ok(())
    }
}

impl RasterRowReader for GdalRowReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell_type(&self) -> CellType {
        self.cell_type
    }

    fn read_row(&mut self, row: usize, dst: &mut RowBuffer) -> Result<()> {
        check_row_request(&self.name, row, self.lookup.rows(), self.lookup.cols(), self.cell_type, dst)?;

        self.read_window_row(row, dst).map_err(|err| match err {
            Error::Read { .. } => err,
            err => Error::Read {
                name: self.name.clone(),
                row,
                reason: err.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use gdal::{DriverManager, raster::Buffer};

    use super::*;
    use crate::{Bounds, RasterStore, ZoomOutcome, reader::FileRasterStore, zoom};

    fn create_tif(path: &Path) -> Result<()> {
        let driver = DriverManager::get_driver_by_name("GTiff")?;
        let mut ds = driver.create_with_band_type::<i32, _>(path, 4, 3, 1)?;
        ds.set_geo_transform(&[0.0, 1.0, 0.0, 3.0, 0.0, -1.0])?;

        let mut band = ds.rasterband(1)?;
        band.set_no_data_value(Some(-1.0))?;
        #[rustfmt::skip]
        let mut buffer = Buffer::new((4, 3), vec![
            -1, -1, -1, -1,
            -1,  5,  6, -1,
            -1, -1, -1, -1,
        ]);
        band.write((0, 0), (4, 3), &mut buffer)?;

        Ok(())
    }

    #[test]
    fn band_type_mapping() {
        assert_eq!(cell_type_for_band(GdalDataType::UInt8), CellType::Int32);
        assert_eq!(cell_type_for_band(GdalDataType::Int16), CellType::Int32);
        assert_eq!(cell_type_for_band(GdalDataType::UInt16), CellType::Int32);
        assert_eq!(cell_type_for_band(GdalDataType::Int32), CellType::Int32);
        assert_eq!(cell_type_for_band(GdalDataType::UInt32), CellType::Float64);
        assert_eq!(cell_type_for_band(GdalDataType::Float32), CellType::Float32);
        assert_eq!(cell_type_for_band(GdalDataType::Float64), CellType::Float64);

        // GDT_Int8, only known to GDAL >= 3.7
        if let Ok(int8) = GdalDataType::try_from(14u32) {
            assert_eq!(cell_type_for_band(int8), CellType::Int32);
        }
    }

    #[test_log::test]
    fn read_ascii_grid_through_gdal() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        std::fs::write(
            tmp.path().join("ras.asc"),
            "ncols 3\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -9999\n-9999 4 -9999\n-9999 -9999 -9999\n",
        )?;

        let store = FileRasterStore::with_default_location(tmp.path());
        assert_eq!(store.raster_grid("ras.asc", None)?, RasterGrid::new(2.0, 0.0, 1.0, 1.0, 2, 3)?);

        let mut window = Window::new(Bounds::new(2.0, 0.0, 3.0, 0.0), 1.0, 1.0)?;
        zoom(&mut window, &store, "ras.asc", None)?;
        assert_eq!(window.bounds(), Bounds::new(2.0, 1.0, 2.0, 1.0));
        Ok(())
    }

    #[test_log::test]
    fn read_rows_through_gdal() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        create_tif(&tmp.path().join("ras.tif"))?;

        let store = FileRasterStore::with_default_location(tmp.path());
        let grid = store.raster_grid("ras.tif", None)?;
        assert_eq!(grid, RasterGrid::new(3.0, 0.0, 1.0, 1.0, 3, 4)?);

        let window = grid.to_window();
        let mut reader = store.open_raster("ras.tif", None, &window)?;
        assert_eq!(reader.cell_type(), CellType::Int32);

        let mut row = RowBuffer::allocate(CellType::Int32, 4);
        reader.read_row(1, &mut row)?;
        assert_eq!(row.as_slice::<i32>(), Some(&[i32::NODATA, 5, 6, i32::NODATA][..]));

        Ok(())
    }

    #[test_log::test]
    fn zoom_gdal_raster() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        create_tif(&tmp.path().join("ras.tif"))?;

        let store = FileRasterStore::new();
        let mut window = Window::new(Bounds::new(3.0, 0.0, 4.0, 0.0), 1.0, 1.0)?;
        let location = tmp.path().to_string_lossy().to_string();

        let outcome = zoom(&mut window, &store, "ras.tif", Some(&location))?;
        assert!(matches!(outcome, ZoomOutcome::Tightened(_)));
        assert_eq!(window.bounds(), Bounds::new(2.0, 1.0, 3.0, 1.0));

        Ok(())
    }
}
