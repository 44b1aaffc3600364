use crate::{Error, Nodata, RowBuffer};

/// The storage representation of the cells of a raster map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CellType {
    /// Integer cells (CELL)
    Int32 = 0,
    /// Single precision floating point cells (FCELL)
    Float32 = 1,
    /// Double precision floating point cells (DCELL)
    Float64 = 2,
}

impl CellType {
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Number of bytes occupied by a single cell of this type
    pub fn cell_size(&self) -> usize {
        match self {
            Self::Int32 => std::mem::size_of::<i32>(),
            Self::Float32 => std::mem::size_of::<f32>(),
            Self::Float64 => std::mem::size_of::<f64>(),
        }
    }

    pub fn is_floating_point(&self) -> bool {
        !matches!(self, Self::Int32)
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl std::str::FromStr for CellType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int32" | "cell" => Ok(Self::Int32),
            "float32" | "fcell" => Ok(Self::Float32),
            "float64" | "dcell" => Ok(Self::Float64),
            _ => Err(Error::InvalidArgument(format!("Unknown cell type: {s}"))),
        }
    }
}

/// Type requirements for the cell values of a raster row
pub trait CellNum: Nodata + num::NumCast + PartialOrd + std::fmt::Debug + 'static {
    const TYPE: CellType;

    /// Typed view on the buffer, `None` when the buffer holds cells of another type
    fn row_slice(buffer: &RowBuffer) -> Option<&[Self]>;
    fn row_slice_mut(buffer: &mut RowBuffer) -> Option<&mut [Self]>;
    fn into_row_buffer(data: Vec<Self>) -> RowBuffer;
}

macro_rules! impl_cellnum {
    ( $t:ident, $cell_type:ident ) => {
        impl CellNum for $t {
            const TYPE: CellType = CellType::$cell_type;

            fn row_slice(buffer: &RowBuffer) -> Option<&[Self]> {
                match buffer {
                    RowBuffer::$cell_type(data) => Some(data),
                    _ => None,
                }
            }

            fn row_slice_mut(buffer: &mut RowBuffer) -> Option<&mut [Self]> {
                match buffer {
                    RowBuffer::$cell_type(data) => Some(data),
                    _ => None,
                }
            }

            fn into_row_buffer(data: Vec<Self>) -> RowBuffer {
                RowBuffer::$cell_type(data)
            }
        }
    };
}

impl_cellnum!(i32, Int32);
impl_cellnum!(f32, Float32);
impl_cellnum!(f64, Float64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_sizes() {
        assert_eq!(CellType::Int32.cell_size(), 4);
        assert_eq!(CellType::Float32.cell_size(), 4);
        assert_eq!(CellType::Float64.cell_size(), 8);
    }

    #[test]
    fn parse_cell_type() {
        assert_eq!("FCELL".parse::<CellType>().unwrap(), CellType::Float32);
        assert_eq!("float64".parse::<CellType>().unwrap(), CellType::Float64);
        assert_eq!("cell".parse::<CellType>().unwrap(), CellType::Int32);
        assert!("uint8".parse::<CellType>().is_err());
    }

    #[test]
    fn cell_type_of_rust_types() {
        assert_eq!(<i32 as CellNum>::TYPE, CellType::Int32);
        assert_eq!(<f32 as CellNum>::TYPE, CellType::Float32);
        assert_eq!(<f64 as CellNum>::TYPE, CellType::Float64);
        assert!(!CellType::Int32.is_floating_point());
        assert!(CellType::Float32.is_floating_point());
    }
}
