use std::path::Path;

use chrono::NaiveDate;
use log::info;

use crate::{
    components::{
        engines::gdal_engine,
        profile::{OutputSize, RasterProfile},
        transforms::SourceGeoTransform,
        PixelWindow, Region,
    },
    descriptor::build_source_descriptor,
    errors::Result,
    options::DownloadOptions,
};

/// Significant digits kept when locating a region in source pixel space.
pub const WINDOW_PRECISION: usize = 21;

/// Downloads `region` of `product_name` at `date` into `output_path`.
///
/// The size comes from `options.width`/`options.height` when both are given,
/// from `options.resolution` otherwise. Sizes over the JPEG limit are written
/// as GeoTIFF with a world file whatever `options.image_format` says.
pub fn download_region(
    region: &Region,
    date: NaiveDate,
    output_path: impl AsRef<Path>,
    product_name: &str,
    options: &DownloadOptions,
) -> Result<()> {
    let size = OutputSize::resolve(region, options.resolution, options.width, options.height)?;
    let descriptor = build_source_descriptor(&options.xml_dir, product_name, date)?;
    download_from_source(
        descriptor,
        region,
        output_path,
        &options.image_format,
        &size,
    )
}

/// Writes `region` of any gdal readable `source_path` into `output_path`.
pub fn download_from_source(
    source_path: impl AsRef<Path>,
    region: &Region,
    output_path: impl AsRef<Path>,
    image_format: &str,
    size: &OutputSize,
) -> Result<()> {
    let source_path = source_path.as_ref();
    let source = gdal_engine::open(source_path)?;
    let profile = RasterProfile::from_dataset(&source)?;
    let window = PixelWindow::from_region(
        region,
        &SourceGeoTransform::from(profile.transform),
        WINDOW_PRECISION,
    )?;
    let profile = profile.for_output(region, size, image_format);
    info!(
        "downloading {region:?} as {}x{} {} to {}",
        profile.width,
        profile.height,
        profile.driver,
        output_path.as_ref().display()
    );
    gdal_engine::copy_window(source_path, &window, output_path, &profile)
}
