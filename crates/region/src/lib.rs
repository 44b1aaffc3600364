//! Shrinks a region (a georeferenced window) to the extent of the cells of a raster map that contain data.
//!
//! The raster is read row by row under the window, every row is scanned for the first and last cell
//! that is not nodata and the resulting cell extent is projected back onto the window bounds.
//!
//! ```
//! use region::{Bounds, MemoryRaster, MemoryStore, RasterGrid, Window, ZoomOutcome};
//!
//! # fn main() -> region::Result<()> {
//! let grid = RasterGrid::new(10.0, 0.0, 1.0, 1.0, 4, 4)?;
//! let mut raster = MemoryRaster::<i32>::filled_with_nodata(grid);
//! raster.set_cell(1, 2, 7);
//!
//! let mut store = MemoryStore::new();
//! store.insert("elevation", raster);
//!
//! let mut window = Window::new(Bounds::new(10.0, 6.0, 4.0, 0.0), 1.0, 1.0)?;
//! assert!(region::zoom(&mut window, &store, "elevation", None)?.is_tightened());
//! assert_eq!(window.bounds(), Bounds::new(9.0, 8.0, 3.0, 2.0));
//! # Ok(())
//! # }
//! ```

#![warn(clippy::unwrap_used)]

pub mod ascii;
mod celltype;
mod error;
#[cfg(feature = "gdal")]
pub mod gdal;
mod memory;
mod nodata;
mod rastergrid;
pub mod reader;
mod rowbuffer;
mod scan;
#[cfg(test)]
mod testutils;
mod window;
mod zoom;

#[doc(inline)]
pub use ascii::AsciiGrid;
#[doc(inline)]
pub use celltype::CellNum;
#[doc(inline)]
pub use celltype::CellType;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use memory::AnyMemoryRaster;
#[doc(inline)]
pub use memory::MemoryRaster;
#[doc(inline)]
pub use memory::MemoryRowReader;
#[doc(inline)]
pub use memory::MemoryStore;
#[doc(inline)]
pub use nodata::Nodata;
#[doc(inline)]
pub use rastergrid::CellLookup;
#[doc(inline)]
pub use rastergrid::RasterGrid;
#[doc(inline)]
pub use reader::FileRasterStore;
#[doc(inline)]
pub use reader::RasterFileFormat;
#[doc(inline)]
pub use reader::RasterRowReader;
#[doc(inline)]
pub use reader::RasterStore;
#[doc(inline)]
pub use rowbuffer::RowBuffer;
#[doc(inline)]
pub use rowbuffer::data_extent;
#[doc(inline)]
pub use scan::BoundingBox;
#[doc(inline)]
pub use scan::scan_data_bounds;
#[doc(inline)]
pub use window::Bounds;
#[doc(inline)]
pub use window::Window;
#[doc(inline)]
pub use zoom::ZoomOutcome;
#[doc(inline)]
pub use zoom::zoom;
#[doc(inline)]
pub use zoom::zoom_reader;

pub type Result<T = ()> = std::result::Result<T, Error>;
