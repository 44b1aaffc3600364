use approx::assert_relative_eq;
use region::{Bounds, BoundingBox, Error, FileRasterStore, RasterStore, Result, Window, ZoomOutcome};

const ELEVATION: &str = "ncols 6
nrows 5
xllcorner 100.0
yllcorner 200.0
cellsize 10.0
NODATA_value -9999
-9999 -9999 -9999 -9999 -9999 -9999
-9999 -9999 12.5 -9999 -9999 -9999
-9999 3.25 -9999 -9999 8.0 -9999
-9999 -9999 -9999 -9999 -9999 -9999
-9999 -9999 -9999 -9999 -9999 -9999
";

const EMPTY: &str = "ncols 3
nrows 2
xllcorner 0
yllcorner 0
cellsize 1
NODATA_value -1
-1 -1 -1
-1 -1 -1
";

fn write_rasters(dir: &std::path::Path) -> Result<()> {
    std::fs::write(dir.join("elevation.asc"), ELEVATION)?;
    std::fs::write(dir.join("empty.asc"), EMPTY)?;
    Ok(())
}

#[test_log::test]
fn zoom_ascii_grid_from_location() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_rasters(tmp.path())?;
    let location = tmp.path().to_string_lossy().to_string();

    let store = FileRasterStore::new();
    let grid = store.raster_grid("elevation.asc", Some(&location))?;
    assert_relative_eq!(grid.bounds(), Bounds::new(250.0, 200.0, 160.0, 100.0));

    let mut window = grid.to_window();
    let outcome = region::zoom(&mut window, &store, "elevation.asc", Some(&location))?;

    assert_eq!(outcome, ZoomOutcome::Tightened(BoundingBox { top: 1, bottom: 2, left: 1, right: 4 }));
    assert_relative_eq!(window.bounds(), Bounds::new(240.0, 220.0, 150.0, 110.0));
    Ok(())
}

#[test_log::test]
fn zoom_with_finer_window() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_rasters(tmp.path())?;

    // half the raster resolution: every raster cell covers 2x2 window cells
    let store = FileRasterStore::with_default_location(tmp.path());
    let mut window = Window::new(Bounds::new(250.0, 200.0, 160.0, 100.0), 5.0, 5.0)?;
    let outcome = region::zoom(&mut window, &store, "elevation.asc", None)?;

    assert_eq!(outcome, ZoomOutcome::Tightened(BoundingBox { top: 2, bottom: 5, left: 2, right: 9 }));
    assert_relative_eq!(window.bounds(), Bounds::new(240.0, 220.0, 150.0, 110.0));
    assert_eq!((window.rows, window.cols), (10, 12));
    Ok(())
}

#[test_log::test]
fn zoom_window_larger_than_raster() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_rasters(tmp.path())?;

    let store = FileRasterStore::with_default_location(tmp.path());
    let mut window = Window::new(Bounds::new(300.0, 150.0, 200.0, 50.0), 10.0, 10.0)?;
    region::zoom(&mut window, &store, "elevation.asc", None)?;

    assert_relative_eq!(window.bounds(), Bounds::new(240.0, 220.0, 150.0, 110.0));
    Ok(())
}

#[test_log::test]
fn empty_raster_keeps_window() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_rasters(tmp.path())?;

    let store = FileRasterStore::with_default_location(tmp.path());
    let original = store.raster_grid("empty.asc", None)?.to_window();
    let mut window = original;

    assert_eq!(region::zoom(&mut window, &store, "empty.asc", None)?, ZoomOutcome::NoData);
    assert_eq!(window, original);
    Ok(())
}

#[test_log::test]
fn missing_raster_fails_to_open() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let store = FileRasterStore::with_default_location(tmp.path());
    let mut window = Window::new(Bounds::new(1.0, 0.0, 1.0, 0.0), 1.0, 1.0)?;

    let err = region::zoom(&mut window, &store, "missing.asc", None).expect_err("raster does not exist");
    assert!(matches!(err, Error::Open { .. }));
    assert!(err.to_string().starts_with("Unable to open raster map <missing.asc>"));
    Ok(())
}
