//! Reading of ESRI ASCII grid files (`.asc`).
//!
//! The file consists of a header of key value pairs followed by `nrows` x `ncols` whitespace separated cell values:
//! ```text
//! ncols        4
//! nrows        2
//! xllcorner    0.0
//! yllcorner    0.0
//! cellsize     1.0
//! NODATA_value -9999
//! -9999 1 2 -9999
//! 3 4 -9999 -9999
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader},
    iter::Peekable,
    path::Path,
    str::SplitWhitespace,
};

use crate::{AnyMemoryRaster, CellNum, Error, MemoryRaster, Nodata, RasterGrid, Result};

struct Header {
    grid: RasterGrid,
    nodata: Option<f64>,
}

#[derive(Default)]
struct HeaderFields {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xllcorner: Option<f64>,
    xllcenter: Option<f64>,
    yllcorner: Option<f64>,
    yllcenter: Option<f64>,
    cellsize: Option<f64>,
    dx: Option<f64>,
    dy: Option<f64>,
    nodata: Option<f64>,
}

pub struct AsciiGrid;

impl AsciiGrid {
    /// Reads the full raster, integer files are read as `Int32`, files containing floating point values as `Float32`
    pub fn read(path: impl AsRef<Path>) -> Result<AnyMemoryRaster> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        AsciiGrid::parse(&contents)
    }

    /// Only reads the header lines of the file to obtain the raster grid
    pub fn read_grid(path: impl AsRef<Path>) -> Result<RasterGrid> {
        let reader = BufReader::new(File::open(path.as_ref())?);

        let mut header = String::new();
        for line in reader.lines() {
            let line = line?;
            if line.split_whitespace().next().is_some_and(|token| token.parse::<f64>().is_ok()) {
                break;
            }

            header.push_str(&line);
            header.push('\n');
        }

        let mut tokens = header.split_whitespace().peekable();
        Ok(parse_header(&mut tokens)?.grid)
    }

    pub fn parse(contents: &str) -> Result<AnyMemoryRaster> {
        let mut tokens = contents.split_whitespace().peekable();
        let header = parse_header(&mut tokens)?;

        let values: Vec<&str> = tokens.collect();
        if values.len() != header.grid.cell_count() {
            return Err(Error::InvalidArgument(format!(
                "ASCII grid contains {} values but the header specifies {} ({} rows x {} cols)",
                values.len(),
                header.grid.cell_count(),
                header.grid.rows,
                header.grid.cols,
            )));
        }

        // i32::MIN is the integer nodata marker, a cell with that value is only representable as float
        let declared_nodata = header.nodata;
        let int32_cell = |val: &&str| match val.parse::<i32>() {
            Ok(cell) => !cell.is_nodata() || declared_nodata == Some(f64::from(cell)),
            Err(_) => false,
        };

        let integral_nodata = header.nodata.is_none_or(|nodata| nodata.fract() == 0.0);
        if integral_nodata && values.iter().all(int32_cell) {
            Ok(read_values::<i32>(header, &values)?.into())
        } else {
            Ok(read_values::<f32>(header, &values)?.into())
        }
    }
}

fn parse_header(tokens: &mut Peekable<SplitWhitespace>) -> Result<Header> {
    let mut fields = HeaderFields::default();

    while let Some(&key) = tokens.peek() {
        if key.parse::<f64>().is_ok() {
            // start of the cell values
            break;
        }

        tokens.next();
        let value = tokens
            .next()
            .ok_or_else(|| Error::InvalidArgument(format!("ASCII grid header key '{key}' has no value")))?;

        match key.to_lowercase().as_str() {
            "ncols" => fields.ncols = Some(value.parse()?),
            "nrows" => fields.nrows = Some(value.parse()?),
            "xllcorner" => fields.xllcorner = Some(value.parse()?),
            "xllcenter" => fields.xllcenter = Some(value.parse()?),
            "yllcorner" => fields.yllcorner = Some(value.parse()?),
            "yllcenter" => fields.yllcenter = Some(value.parse()?),
            "cellsize" => fields.cellsize = Some(value.parse()?),
            "dx" => fields.dx = Some(value.parse()?),
            "dy" => fields.dy = Some(value.parse()?),
            "nodata_value" => fields.nodata = Some(value.parse()?),
            _ => log::warn!("Ignoring unknown ASCII grid header key: {key}"),
        }
    }

    let missing = |key: &str| Error::InvalidArgument(format!("ASCII grid header is missing '{key}'"));

    let cols = fields.ncols.ok_or_else(|| missing("ncols"))?;
    let rows = fields.nrows.ok_or_else(|| missing("nrows"))?;
    let (dx, dy) = match (fields.cellsize, fields.dx, fields.dy) {
        (Some(cellsize), _, _) => (cellsize, cellsize),
        (None, Some(dx), Some(dy)) => (dx, dy),
        _ => return Err(missing("cellsize")),
    };

    let west = match (fields.xllcorner, fields.xllcenter) {
        (Some(corner), _) => corner,
        (None, Some(center)) => center - dx / 2.0,
        (None, None) => return Err(missing("xllcorner")),
    };

    let south = match (fields.yllcorner, fields.yllcenter) {
        (Some(corner), _) => corner,
        (None, Some(center)) => center - dy / 2.0,
        (None, None) => return Err(missing("yllcorner")),
    };

    Ok(Header {
        grid: RasterGrid::new(south + rows as f64 * dy, west, dy, dx, rows, cols)?,
        nodata: fields.nodata,
    })
}

fn read_values<T: CellNum + std::str::FromStr>(header: Header, values: &[&str]) -> Result<MemoryRaster<T>> {
    let nodata: Option<T> = header.nodata.and_then(num::NumCast::from);

    let data = values
        .iter()
        .map(|val| {
            let mut cell = val
                .parse::<T>()
                .map_err(|_| Error::InvalidNumber(format!("Invalid ASCII grid cell value: {val}")))?;

            if let Some(nodata) = nodata {
                cell.init_nodata(nodata);
            }

            Ok(cell)
        })
        .collect::<Result<Vec<T>>>()?;

    MemoryRaster::new(header.grid, data)
}
