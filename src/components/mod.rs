pub mod bounds;
pub mod engines;
pub mod profile;
pub mod transforms;

pub use bounds::{PixelWindow, Region};
pub use profile::{OutputSize, RasterProfile, MAX_JPEG_SIZE};
