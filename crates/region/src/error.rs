use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unable to open raster map <{name}>: {reason}")]
    Open { name: String, reason: String },
    #[error("Could not read row {row} from <{name}>: {reason}")]
    Read { name: String, row: usize, reason: String },
    #[error("Invalid window: {0}")]
    InvalidWindow(String),
    #[error("Invalid path: {0}")]
    InvalidPath(std::path::PathBuf),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[cfg(feature = "gdal")]
    #[error("GDAL error: {0}")]
    GdalError(#[from] gdal::errors::GdalError),
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::InvalidNumber(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::InvalidNumber(err.to_string())
    }
}
