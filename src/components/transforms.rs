use gdal::GeoTransform;
use geo::AffineTransform;

use crate::{
    components::bounds::Region,
    errors::{DownloadError, Result},
};

/// GDAL geotransform of a raster without one.
pub const IDENTITY_GEO_TRANSFORM: GeoTransform = [0., 1., 0., 0., 0., 1.];

fn affine_from_gdal(gdal_transform: GeoTransform) -> AffineTransform {
    AffineTransform::new(
        gdal_transform[1],
        gdal_transform[2],
        gdal_transform[0],
        gdal_transform[4],
        gdal_transform[5],
        gdal_transform[3],
    )
}

fn gdal_from_affine(transform: &AffineTransform) -> GeoTransform {
    [
        transform.xoff(),
        transform.a(),
        transform.b(),
        transform.yoff(),
        transform.d(),
        transform.e(),
    ]
}

/// Transform from source pixel space to geo space.
#[derive(Shrinkwrap, Debug, Clone, Copy)]
pub struct SourceGeoTransform(AffineTransform);

impl From<GeoTransform> for SourceGeoTransform {
    fn from(value: GeoTransform) -> Self {
        Self(affine_from_gdal(value))
    }
}

impl SourceGeoTransform {
    pub fn inverse(&self) -> Result<GeoSourceTransform> {
        self.0
            .inverse()
            .map(GeoSourceTransform)
            .ok_or(DownloadError::NonInvertibleTransform)
    }
}

/// Transform from geo space to source pixel space.
#[derive(Shrinkwrap, Debug, Clone, Copy)]
pub struct GeoSourceTransform(AffineTransform);

/// Transform from output pixel space to geo space,
/// stretching `shape` (width, height) over a [Region], north up.
#[derive(Shrinkwrap, Debug, Clone, Copy)]
pub struct OutputGeoTransform(AffineTransform);

impl OutputGeoTransform {
    pub fn new(region: &Region, shape: (usize, usize)) -> Self {
        let transform = AffineTransform::new(
            region.width() / (shape.0 as f64),
            0.,
            region.bottom_left().x,
            0.,
            -region.height() / (shape.1 as f64),
            region.top_right().y,
        );
        Self(transform)
    }

    pub fn to_gdal(&self) -> GeoTransform {
        gdal_from_affine(&self.0)
    }
}
