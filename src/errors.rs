pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
    #[error(transparent)]
    NdarrayError(#[from] ndarray::ShapeError),
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),
    #[error("Date {0:?} is not of the form YYYY-MM-DD")]
    DateFormat(String),
    #[error("Date {0:?} does not exist in the calendar")]
    InvalidDate(String),
    #[error("Region bottom left corner must be strictly below and left of top right corner")]
    InvalidRegion,
    #[error("Resolution {0} must be a positive number of crs units per pixel")]
    InvalidResolution(f64),
    #[error("Width and height must be given together")]
    IncompleteSize,
    #[error("Source geotransform can not be inverted")]
    NonInvertibleTransform,
    #[error("Band data type {0} is not supported")]
    UnsupportedDataType(String),
    #[error("Unknown product {0:?}")]
    UnknownProduct(String),
}
