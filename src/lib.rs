//! Download georeferenced regions of GIBS satellite imagery.
//!
//! A region is read from the GIBS tiled WMS through a GDAL `TiledWMS`
//! descriptor written per date, resampled to the requested size and written
//! with the requested GDAL driver, or as GeoTIFF with a world file when the
//! size exceeds [MAX_JPEG_SIZE].

#[macro_use]
extern crate shrinkwraprs;

mod components;
mod dates;
mod descriptor;
mod downloader;
mod errors;
mod options;
mod product;

pub use components::{
    engines::gdal_engine,
    transforms::{OutputGeoTransform, SourceGeoTransform},
    OutputSize, PixelWindow, RasterProfile, Region, MAX_JPEG_SIZE,
};
pub use dates::{expand_date_range, parse_iso_date};
pub use descriptor::{build_source_descriptor, compute_filename, source_descriptor_xml, GIBS_TWMS_URL};
pub use downloader::{download_from_source, download_region, WINDOW_PRECISION};
pub use errors::{DownloadError, Result};
pub use options::DownloadOptions;
pub use product::{Product, GIBS_250M_RESOLUTION};
