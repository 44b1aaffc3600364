//! Access to raster maps, row by row, under a window.
//!
//! A [`RasterStore`] locates raster maps by name and opens them for reading under a [`Window`].
//! The returned [`RasterRowReader`] presents the raster resampled onto the grid of that window,
//! dropping the reader closes the raster.

use std::path::{Path, PathBuf};

#[cfg(not(feature = "gdal"))]
use crate::ascii::AsciiGrid;
use crate::{CellType, Error, RasterGrid, Result, RowBuffer, Window};

/// Reads the rows of an opened raster map under the window it was opened with
pub trait RasterRowReader {
    /// The name the raster was opened with, used in diagnostics
    fn name(&self) -> &str;

    /// The native cell representation of the raster
    fn cell_type(&self) -> CellType;

    /// Reads window row `row` into `dst`, which must hold exactly one window row of the native cell type
    fn read_row(&mut self, row: usize, dst: &mut RowBuffer) -> Result<()>;
}

/// Locates raster maps by name and opens them for reading
pub trait RasterStore {
    /// The grid of the raster as it is stored, used to obtain a window that covers the full raster
    fn raster_grid(&self, name: &str, location: Option<&str>) -> Result<RasterGrid>;

    /// Opens the raster for reading under the window, fails with [`Error::Open`] when the raster cannot be opened
    fn open_raster<'a>(&'a self, name: &str, location: Option<&str>, window: &Window) -> Result<Box<dyn RasterRowReader + 'a>>;
}

/// Checks that the buffer provided to [`RasterRowReader::read_row`] can hold a row of the reader.
pub(crate) fn check_row_request(name: &str, row: usize, rows: usize, cols: usize, cell_type: CellType, dst: &RowBuffer) -> Result<()> {
    let fail = |reason: String| {
        Err(Error::Read {
            name: name.to_string(),
            row,
            reason,
        })
    };

    if row >= rows {
        return fail(format!("row is outside of the window ({rows} rows)"));
    }

    if dst.cell_type() != cell_type {
        return fail(format!("buffer of type {} provided for a raster of type {cell_type}", dst.cell_type()));
    }

    if dst.len() != cols {
        return fail(format!("buffer of {} cells provided for a row of {cols} cells", dst.len()));
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RasterFileFormat {
    ArcAscii,
    GeoTiff,
    Png,
    PcRaster,
    Netcdf,
    GeoPackage,
    Vrt,
    Unknown,
}

impl RasterFileFormat {
    /// Given a file path, guess the raster type based on the file extension
    pub fn guess_from_path(file_path: impl AsRef<Path>) -> RasterFileFormat {
        let file_path = file_path.as_ref();
        let ext = file_path.extension().map(|ext| ext.to_string_lossy().to_lowercase());

        if let Some(ext) = ext {
            match ext.as_ref() {
                "asc" => return RasterFileFormat::ArcAscii,
                "tiff" | "tif" => return RasterFileFormat::GeoTiff,
                "png" => return RasterFileFormat::Png,
                "map" => return RasterFileFormat::PcRaster,
                "nc" => return RasterFileFormat::Netcdf,
                "gpkg" => return RasterFileFormat::GeoPackage,
                "vrt" => return RasterFileFormat::Vrt,
                _ => {}
            }
        }

        RasterFileFormat::Unknown
    }
}

/// Opens raster files from disk.
/// The `location` passed to the store functions is the directory the raster name is resolved against,
/// when absent the name is used as a path as is.
#[derive(Debug, Clone, Default)]
pub struct FileRasterStore {
    default_location: Option<PathBuf>,
}

impl FileRasterStore {
    pub fn new() -> Self {
        FileRasterStore::default()
    }

    /// Resolve names against `dir` when no location is passed explicitly
    pub fn with_default_location(dir: impl Into<PathBuf>) -> Self {
        FileRasterStore {
            default_location: Some(dir.into()),
        }
    }

    pub fn resolve(&self, name: &str, location: Option<&str>) -> PathBuf {
        match (location, &self.default_location) {
            (Some(location), _) => Path::new(location).join(name),
            (None, Some(default_location)) => default_location.join(name),
            (None, None) => PathBuf::from(name),
        }
    }

    fn open_error(name: &str, err: Error) -> Error {
        match err {
            Error::Open { .. } => err,
            err => Error::Open {
                name: name.to_string(),
                reason: err.to_string(),
            },
        }
    }
}

/// The implementation that reads a raster file
#[derive(Clone, Copy, Debug, PartialEq)]
enum RasterDriver {
    #[cfg(not(feature = "gdal"))]
    ArcAscii,
    #[cfg(feature = "gdal")]
    Gdal,
}

/// With GDAL support every format, ArcAscii included, is read by GDAL.
/// Without it only ArcAscii files can be read.
#[cfg(feature = "gdal")]
fn raster_driver(_path: &Path) -> Result<RasterDriver> {
    Ok(RasterDriver::Gdal)
}

#[cfg(not(feature = "gdal"))]
fn raster_driver(path: &Path) -> Result<RasterDriver> {
    match RasterFileFormat::guess_from_path(path) {
        RasterFileFormat::ArcAscii => Ok(RasterDriver::ArcAscii),
        _ => Err(Error::Runtime(format!(
            "Unsupported raster file type: {} (GDAL support not compiled in)",
            path.display()
        ))),
    }
}

impl RasterStore for FileRasterStore {
    fn raster_grid(&self, name: &str, location: Option<&str>) -> Result<RasterGrid> {
        let path = self.resolve(name, location);
        if !path.exists() {
            return Err(Self::open_error(name, Error::InvalidPath(path)));
        }

        let grid = match raster_driver(&path) {
            #[cfg(not(feature = "gdal"))]
            Ok(RasterDriver::ArcAscii) => AsciiGrid::read_grid(&path),
            #[cfg(feature = "gdal")]
            Ok(RasterDriver::Gdal) => crate::gdal::GdalRowReader::read_grid(&path),
            Err(err) => Err(err),
        };

        grid.map_err(|e| Self::open_error(name, e))
    }

    fn open_raster<'a>(&'a self, name: &str, location: Option<&str>, window: &Window) -> Result<Box<dyn RasterRowReader + 'a>> {
        let path = self.resolve(name, location);
        if !path.exists() {
            return Err(Self::open_error(name, Error::InvalidPath(path)));
        }

        let driver = raster_driver(&path).map_err(|e| Self::open_error(name, e))?;
        log::debug!("Open raster <{name}> from {} ({driver:?})", path.display());

        match driver {
            #[cfg(not(feature = "gdal"))]
            RasterDriver::ArcAscii => {
                let raster = AsciiGrid::read(&path).map_err(|e| Self::open_error(name, e))?;
                Ok(raster.into_reader(name, window))
            }
            #[cfg(feature = "gdal")]
            RasterDriver::Gdal => Ok(Box::new(
                crate::gdal::GdalRowReader::open(name, &path, window).map_err(|e| Self::open_error(name, e))?,
            )),
        }
    }
}
