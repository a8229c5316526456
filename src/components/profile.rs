use gdal::{cpl::CslStringList, raster::GdalDataType, Dataset, GeoTransform};
use log::warn;

use crate::{
    components::{
        bounds::Region,
        transforms::{OutputGeoTransform, IDENTITY_GEO_TRANSFORM},
    },
    errors::{DownloadError, Result},
};

/// Largest single dimension the JPEG encoder can write.
pub const MAX_JPEG_SIZE: usize = 65_500;

/// Driver used when the requested size exceeds [MAX_JPEG_SIZE].
pub const OVERSIZED_DRIVER: &str = "GTiff";

/// Pixel size of a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub width: usize,
    pub height: usize,
    /// Set when a derived dimension exceeds [MAX_JPEG_SIZE].
    pub oversized: bool,
}

impl OutputSize {
    /// Explicit sizes never trigger the oversized fallback.
    pub fn explicit(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            oversized: false,
        }
    }

    pub fn from_resolution(region: &Region, resolution: f64) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.) {
            return Err(DownloadError::InvalidResolution(resolution));
        }
        let (width, height) = region.pixel_shape(resolution);
        let oversized = width > MAX_JPEG_SIZE || height > MAX_JPEG_SIZE;
        if oversized {
            warn!("{width}x{height} exceeds {MAX_JPEG_SIZE} pixels, falling back to {OVERSIZED_DRIVER}");
        }
        Ok(Self {
            width,
            height,
            oversized,
        })
    }

    pub fn resolve(
        region: &Region,
        resolution: f64,
        width: Option<usize>,
        height: Option<usize>,
    ) -> Result<Self> {
        match (width, height) {
            (Some(width), Some(height)) => Ok(Self::explicit(width, height)),
            (None, None) => Self::from_resolution(region, resolution),
            _ => Err(DownloadError::IncompleteSize),
        }
    }

    /// (width, height)
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// Parameters a raster is written with.
#[derive(Debug, Clone)]
pub struct RasterProfile {
    pub driver: String,
    pub width: usize,
    pub height: usize,
    pub count: usize,
    pub data_type: GdalDataType,
    /// Nodata value shared by every band.
    pub nodata: Option<f64>,
    /// Wkt, `None` when undefined.
    pub crs: Option<String>,
    pub transform: GeoTransform,
    /// Request a `.tfw` world file next to the raster.
    pub world_file: bool,
}

impl RasterProfile {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let (width, height) = dataset.raster_size();
        let first_band = dataset.rasterband(1)?;
        let projection = dataset.projection();
        Ok(Self {
            driver: dataset.driver().short_name(),
            width,
            height,
            count: dataset.raster_count(),
            data_type: first_band.band_type(),
            nodata: first_band.no_data_value(),
            crs: (!projection.is_empty()).then_some(projection),
            transform: dataset.geo_transform().unwrap_or(IDENTITY_GEO_TRANSFORM),
            world_file: false,
        })
    }

    /// Overrides size, driver and transform for writing `region` as `image_format`.
    pub fn for_output(mut self, region: &Region, size: &OutputSize, image_format: &str) -> Self {
        self.width = size.width;
        self.height = size.height;
        if size.oversized {
            self.driver = OVERSIZED_DRIVER.into();
            self.world_file = true;
        } else {
            self.driver = image_format.into();
            self.world_file = false;
        }
        if self.crs.is_some() {
            self.transform = OutputGeoTransform::new(region, size.shape()).to_gdal();
        }
        self
    }

    pub fn creation_options(&self) -> Result<CslStringList> {
        let mut options = CslStringList::new();
        if self.world_file {
            options.set_name_value("TFW", "YES")?;
        }
        Ok(options)
    }
}
