use crate::{BoundingBox, RasterRowReader, RasterStore, Result, Window, scan_data_bounds};

/// The result of zooming a window onto the data of a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoomOutcome {
    /// Every cell under the window is nodata, the window was not modified
    NoData,
    /// The window bounds were shrunk to the cells that contain data
    Tightened(BoundingBox),
}

impl ZoomOutcome {
    pub fn is_tightened(&self) -> bool {
        matches!(self, ZoomOutcome::Tightened(_))
    }
}

/// Shrinks the window to the smallest extent that still contains all the data of raster `name`.
///
/// The window is normalized before the scan (resolution authoritative). On [`ZoomOutcome::Tightened`] the window
/// receives the normalized grid with the tightened bounds, its rows and columns are not recalculated for the new bounds.
/// On [`ZoomOutcome::NoData`] or on error the window is left untouched.
pub fn zoom<S: RasterStore + ?Sized>(window: &mut Window, store: &S, name: &str, location: Option<&str>) -> Result<ZoomOutcome> {
    let mut scan_window = *window;
    scan_window.adjust(false, false)?;

    let bbox = {
        let mut reader = store.open_raster(name, location, &scan_window)?;
        scan_data_bounds(reader.as_mut(), scan_window.rows, scan_window.cols)?
    };

    Ok(apply_bounds(window, scan_window, name, bbox))
}

/// Same as [`zoom`] on a raster that was already opened under `window`.
/// The window must be normalized, it determines the rows and columns that are read.
pub fn zoom_reader(window: &mut Window, reader: &mut dyn RasterRowReader) -> Result<ZoomOutcome> {
    let bbox = scan_data_bounds(reader, window.rows, window.cols)?;
    Ok(apply_bounds(window, *window, reader.name(), bbox))
}

fn apply_bounds(window: &mut Window, scan_window: Window, name: &str, bbox: Option<BoundingBox>) -> ZoomOutcome {
    match bbox {
        Some(bbox) => {
            let bounds = bbox.project(&scan_window);
            log::info!(
                "Zoom <{name}>: rows {}..={}, cols {}..={} -> N {} S {} W {} E {}",
                bbox.top,
                bbox.bottom,
                bbox.left,
                bbox.right,
                bounds.north,
                bounds.south,
                bounds.west,
                bounds.east
            );

            *window = scan_window;
            window.set_bounds(bounds);
            ZoomOutcome::Tightened(bbox)
        }
        None => {
            log::debug!("Zoom <{name}>: no data found, window unchanged");
            ZoomOutcome::NoData
        }
    }
}
