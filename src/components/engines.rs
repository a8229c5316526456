use std::{fmt::Debug, path::Path};

use ndarray::{Array2, Array3, Axis, ErrorKind, ShapeError};
use num_traits::Zero;

use crate::{
    components::{bounds::PixelWindow, profile::RasterProfile},
    errors::{DownloadError, Result},
};

/// Implementations for gdal
pub mod gdal_engine {
    use super::*;
    use gdal::{
        raster::{Buffer, GdalDataType, GdalType},
        Dataset as GdalDataset, DriverManager, Metadata as GdalMetadata,
    };
    use log::debug;
    use quick_xml::escape::escape;

    /// Driver used to stage rasters for drivers without `Create` support.
    const STAGING_DRIVER: &str = "MEM";

    pub trait DataType: GdalType + Copy + Zero + Debug {}
    impl<T: GdalType + Copy + Zero + Debug> DataType for T {}

    pub fn open<P: AsRef<Path>>(path: P) -> Result<GdalDataset> {
        Ok(GdalDataset::open(path)?)
    }

    fn vrt_data_type(data_type: GdalDataType) -> Result<&'static str> {
        match data_type {
            GdalDataType::UInt8 => Ok("Byte"),
            GdalDataType::UInt16 => Ok("UInt16"),
            GdalDataType::Int16 => Ok("Int16"),
            GdalDataType::UInt32 => Ok("UInt32"),
            GdalDataType::Int32 => Ok("Int32"),
            GdalDataType::Float32 => Ok("Float32"),
            GdalDataType::Float64 => Ok("Float64"),
            other => Err(DownloadError::UnsupportedDataType(format!("{other:?}"))),
        }
    }

    /// Vrt presenting `window` of `source_path`, sub pixel offsets included,
    /// as a raster of the size of `profile`.
    pub fn window_vrt(
        source_path: &Path,
        window: &PixelWindow,
        profile: &RasterProfile,
    ) -> Result<String> {
        let data_type = vrt_data_type(profile.data_type)?;
        let source = source_path.to_string_lossy();
        let source = escape(source.as_ref());
        let (x_off, y_off) = window.offset;
        let (x_size, y_size) = window.shape;
        let (width, height) = (profile.width, profile.height);
        let bands: String = (1..=profile.count)
            .map(|band| {
                format!(
                    "<VRTRasterBand dataType=\"{data_type}\" band=\"{band}\">\
                     <SimpleSource resampling=\"nearest\">\
                     <SourceFilename relativeToVRT=\"0\">{source}</SourceFilename>\
                     <SourceBand>{band}</SourceBand>\
                     <SrcRect xOff=\"{x_off}\" yOff=\"{y_off}\" xSize=\"{x_size}\" ySize=\"{y_size}\"/>\
                     <DstRect xOff=\"0\" yOff=\"0\" xSize=\"{width}\" ySize=\"{height}\"/>\
                     </SimpleSource></VRTRasterBand>"
                )
            })
            .collect();
        Ok(format!(
            "<VRTDataset rasterXSize=\"{width}\" rasterYSize=\"{height}\">{bands}</VRTDataset>"
        ))
    }

    /// Reads `window` of every band in `source_path`, resampled to the size of `profile`.
    ///
    /// Array shape is (C, H, W).
    pub fn read_window<T: DataType>(
        source_path: &Path,
        window: &PixelWindow,
        profile: &RasterProfile,
    ) -> Result<Array3<T>> {
        let vrt = GdalDataset::open(window_vrt(source_path, window, profile)?)?;
        let shape = (profile.width, profile.height);
        let mut array = Array3::zeros((profile.count, profile.height, profile.width));
        for (band_index, mut band_array) in array.axis_iter_mut(Axis(0)).enumerate() {
            let buf = vrt
                .rasterband(band_index + 1)?
                .read_as::<T>((0, 0), shape, shape, None)?;
            let ((cols, rows), data) = buf.into_shape_and_vec();
            band_array.assign(&Array2::from_shape_vec((rows, cols), data)?);
        }
        Ok(array)
    }

    fn supports_create(driver: &gdal::Driver) -> bool {
        driver
            .metadata_item("DCAP_CREATE", "")
            .is_some_and(|capability| capability.eq_ignore_ascii_case("YES"))
    }

    fn fill_dataset<T: DataType>(
        dataset: &mut GdalDataset,
        profile: &RasterProfile,
        array: &Array3<T>,
    ) -> Result<()> {
        dataset.set_geo_transform(&profile.transform)?;
        if let Some(crs) = &profile.crs {
            dataset.set_projection(crs)?;
        }
        let size = (profile.width, profile.height);
        for (band_index, band_array) in array.axis_iter(Axis(0)).enumerate() {
            let mut band = dataset.rasterband(band_index + 1)?;
            if profile.nodata.is_some() {
                band.set_no_data_value(profile.nodata)?;
            }
            let mut buffer = Buffer::new(size, band_array.iter().copied().collect());
            band.write((0, 0), size, &mut buffer)?;
        }
        Ok(())
    }

    /// Creates a raster at `path` with `profile` and writes `array` (C, H, W) into it.
    ///
    /// Drivers that can only `CreateCopy` (JPEG, PNG, ..) are staged in memory first.
    pub fn write_array<T: DataType, P: AsRef<Path>>(
        path: P,
        profile: &RasterProfile,
        array: &Array3<T>,
    ) -> Result<()> {
        if array.dim() != (profile.count, profile.height, profile.width) {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }
        let driver = DriverManager::get_driver_by_name(&profile.driver)?;
        let options = profile.creation_options()?;
        if supports_create(&driver) {
            debug!("creating {} with {}", path.as_ref().display(), profile.driver);
            let mut dataset = driver.create_with_band_type_with_options::<T, _>(
                path,
                profile.width,
                profile.height,
                profile.count,
                &options,
            )?;
            fill_dataset(&mut dataset, profile, array)
        } else {
            debug!(
                "staging {} in {STAGING_DRIVER} before copying to {}",
                path.as_ref().display(),
                profile.driver
            );
            let staging_driver = DriverManager::get_driver_by_name(STAGING_DRIVER)?;
            let mut staging = staging_driver.create_with_band_type::<T, _>(
                "",
                profile.width,
                profile.height,
                profile.count,
            )?;
            fill_dataset(&mut staging, profile, array)?;
            staging.create_copy(&driver, path, &options)?;
            Ok(())
        }
    }

    fn transfer<T: DataType>(
        source_path: &Path,
        window: &PixelWindow,
        path: &Path,
        profile: &RasterProfile,
    ) -> Result<()> {
        let array = read_window::<T>(source_path, window, profile)?;
        write_array(path, profile, &array)
    }

    /// Copies `window` of `source_path` into a new raster at `path`,
    /// in the band data type of `profile`.
    pub fn copy_window<S: AsRef<Path>, P: AsRef<Path>>(
        source_path: S,
        window: &PixelWindow,
        path: P,
        profile: &RasterProfile,
    ) -> Result<()> {
        let (source_path, path) = (source_path.as_ref(), path.as_ref());
        match profile.data_type {
            GdalDataType::UInt8 => transfer::<u8>(source_path, window, path, profile),
            GdalDataType::UInt16 => transfer::<u16>(source_path, window, path, profile),
            GdalDataType::Int16 => transfer::<i16>(source_path, window, path, profile),
            GdalDataType::UInt32 => transfer::<u32>(source_path, window, path, profile),
            GdalDataType::Int32 => transfer::<i32>(source_path, window, path, profile),
            GdalDataType::Float32 => transfer::<f32>(source_path, window, path, profile),
            GdalDataType::Float64 => transfer::<f64>(source_path, window, path, profile),
            other => Err(DownloadError::UnsupportedDataType(format!("{other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::gdal_engine::*;
    use super::*;
    use crate::components::transforms::IDENTITY_GEO_TRANSFORM;
    use gdal::{raster::GdalDataType, DriverManager};
    use ndarray::Array;
    use rstest::rstest;
    use tempfile::TempDir;

    fn ramp_profile(driver: &str, width: usize, height: usize, count: usize) -> RasterProfile {
        RasterProfile {
            driver: driver.into(),
            width,
            height,
            count,
            data_type: GdalDataType::UInt8,
            nodata: None,
            crs: None,
            transform: IDENTITY_GEO_TRANSFORM,
            world_file: false,
        }
    }

    fn ramp(count: usize, height: usize, width: usize) -> Array3<u8> {
        Array::from_shape_fn((count, height, width), |(c, y, x)| (c * 50 + y * width + x) as u8)
    }

    fn window(offset: (f64, f64), shape: (f64, f64)) -> PixelWindow {
        PixelWindow { offset, shape }
    }

    #[test_log::test]
    fn written_array_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ramp.tif");
        let array = ramp(2, 4, 6);
        let profile = ramp_profile("GTiff", 6, 4, 2);
        write_array(&path, &profile, &array).unwrap();

        let dataset = open(&path).unwrap();
        assert_eq!(dataset.raster_size(), (6, 4));
        assert_eq!(dataset.raster_count(), 2);
        let read = read_window::<u8>(&path, &window((0., 0.), (6., 4.)), &profile).unwrap();
        assert_eq!(read, array);
    }

    #[test_log::test]
    fn window_is_resampled_to_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ramp.tif");
        write_array(&path, &ramp_profile("GTiff", 6, 4, 1), &ramp(1, 4, 6)).unwrap();

        let read = read_window::<u8>(
            &path,
            &window((2., 2.), (2., 2.)),
            &ramp_profile("GTiff", 4, 4, 1),
        )
        .unwrap();
        assert_eq!(read.dim(), (1, 4, 4));
        assert_eq!(read[[0, 0, 0]], 14);
        assert_eq!(read[[0, 3, 3]], 21);
    }

    #[test_log::test]
    fn sub_pixel_window_is_not_snapped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ramp.tif");
        write_array(&path, &ramp_profile("GTiff", 6, 4, 1), &ramp(1, 4, 6)).unwrap();

        // Every output pixel covers a tenth of a source pixel, starting at col 0.9.
        let read = read_window::<u8>(
            &path,
            &window((0.9, 0.), (1.2, 1.)),
            &ramp_profile("GTiff", 12, 1, 1),
        )
        .unwrap();
        assert_eq!(read[[0, 0, 0]], 0);
        assert_eq!(read[[0, 0, 1]], 1);
        assert_eq!(read[[0, 0, 10]], 1);
        assert_eq!(read[[0, 0, 11]], 2);
    }

    #[rstest]
    fn vrt_carries_fractional_rect() {
        let vrt = window_vrt(
            Path::new("/tmp/a&b.xml"),
            &window((0.9, 2.25), (1.2, 0.5)),
            &ramp_profile("JPEG", 12, 3, 2),
        )
        .unwrap();
        assert!(vrt.starts_with("<VRTDataset rasterXSize=\"12\" rasterYSize=\"3\">"));
        assert_eq!(vrt.matches("<VRTRasterBand dataType=\"Byte\"").count(), 2);
        assert!(vrt.contains("<SrcRect xOff=\"0.9\" yOff=\"2.25\" xSize=\"1.2\" ySize=\"0.5\"/>"));
        assert!(vrt.contains("/tmp/a&amp;b.xml"));
    }

    #[rstest]
    #[case("PNG")]
    #[case("GTiff")]
    fn drivers_with_and_without_create_are_written(#[case] driver: &str) {
        if DriverManager::get_driver_by_name(driver).is_err() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(format!("ramp.{}", driver.to_lowercase()));
        write_array(&path, &ramp_profile(driver, 5, 3, 3), &ramp(3, 3, 5)).unwrap();

        let dataset = open(&path).unwrap();
        assert_eq!(dataset.driver().short_name(), driver);
        assert_eq!(dataset.raster_size(), (5, 3));
    }

    #[test_log::test]
    fn world_file_is_requested_through_options() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ramp.tif");
        let mut profile = ramp_profile("GTiff", 3, 3, 1);
        profile.world_file = true;
        profile.transform = [10., 1., 0., 20., 0., -1.];
        write_array(&path, &profile, &ramp(1, 3, 3)).unwrap();
        assert!(dir.path().join("ramp.tfw").exists());
    }

    #[test_log::test]
    fn nodata_is_set_on_every_band() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ramp.tif");
        let mut profile = ramp_profile("GTiff", 4, 2, 3);
        profile.nodata = Some(7.);
        write_array(&path, &profile, &ramp(3, 2, 4)).unwrap();

        let dataset = open(&path).unwrap();
        for band in 1..=3 {
            assert_eq!(dataset.rasterband(band).unwrap().no_data_value(), Some(7.));
        }
    }

    #[rstest]
    #[case(ramp(1, 3, 3))]
    #[case(ramp(2, 4, 6))]
    #[case(ramp(1, 6, 4))]
    fn mismatched_array_is_an_error(#[case] array: Array3<u8>) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ramp.tif");
        assert!(matches!(
            write_array(&path, &ramp_profile("GTiff", 6, 4, 1), &array),
            Err(DownloadError::NdarrayError(_))
        ));
        assert!(!path.exists());
    }
}
