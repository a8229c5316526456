use geo::{Coord, Rect};
use log::debug;

use crate::{
    components::transforms::SourceGeoTransform,
    errors::{DownloadError, Result},
};

/// Geographic rectangle to download, in the crs of the source
/// (longitude/latitude for GIBS).
///
/// Defined by its bottom left and top right corners, the bottom left
/// corner being strictly smaller on both axes.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq)]
pub struct Region(Rect<f64>);

impl Region {
    pub fn new(bottom_left: impl Into<Coord>, top_right: impl Into<Coord>) -> Result<Self> {
        let (bottom_left, top_right) = (bottom_left.into(), top_right.into());
        if bottom_left.x < top_right.x && bottom_left.y < top_right.y {
            Ok(Self(Rect::new(bottom_left, top_right)))
        } else {
            Err(DownloadError::InvalidRegion)
        }
    }

    pub fn bottom_left(&self) -> Coord {
        self.0.min()
    }

    pub fn top_right(&self) -> Coord {
        self.0.max()
    }

    /// (width, height) in pixels when sampled at `resolution` crs units per pixel.
    pub fn pixel_shape(&self, resolution: f64) -> (usize, usize) {
        let to_pixels = |extent: f64| ((extent / resolution).round() as usize).max(1);
        (to_pixels(self.0.width()), to_pixels(self.0.height()))
    }
}

/// Rounds `value` to `digits` significant digits.
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0. || !value.is_finite() {
        return value;
    }
    format!("{:.*e}", digits.saturating_sub(1), value)
        .parse()
        .unwrap_or(value)
}

/// Pixel window of a [Region] in a source raster.
///
/// `offset` is the (col, row) of the top left corner of the window,
/// with origin at the top left corner of the raster.
/// `shape` is (width, height). Both keep sub pixel fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelWindow {
    pub offset: (f64, f64),
    pub shape: (f64, f64),
}

impl PixelWindow {
    pub fn from_region(
        region: &Region,
        transform: &SourceGeoTransform,
        precision: usize,
    ) -> Result<Self> {
        let geo_pixel = transform.inverse()?;
        let to_pixel = |coord: Coord| {
            let pixel = geo_pixel.apply(coord);
            Coord {
                x: round_significant(pixel.x, precision),
                y: round_significant(pixel.y, precision),
            }
        };
        let (a, b) = (to_pixel(region.bottom_left()), to_pixel(region.top_right()));
        let window = Self {
            offset: (a.x.min(b.x), a.y.min(b.y)),
            shape: ((a.x - b.x).abs(), (a.y - b.y).abs()),
        };
        debug!("{region:?} reads source window {window:?}");
        Ok(window)
    }
}
