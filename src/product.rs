use std::{fmt::Display, path::PathBuf, str::FromStr};

use crate::{descriptor::compute_filename, errors::DownloadError};

/// Crs units per pixel of the GIBS 250m level in EPSG:4326.
pub const GIBS_250M_RESOLUTION: f64 = 0.002197265625;

/// GIBS imagery layers with known download settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Product {
    ModisTerraTrueColor,
    ModisAquaTrueColor,
    ViirsSnppTrueColor,
}

impl Product {
    pub const ALL: [Product; 3] = [
        Product::ModisTerraTrueColor,
        Product::ModisAquaTrueColor,
        Product::ViirsSnppTrueColor,
    ];

    /// GIBS layer name, also the tileset prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Product::ModisTerraTrueColor => "MODIS_Terra_CorrectedReflectance_TrueColor",
            Product::ModisAquaTrueColor => "MODIS_Aqua_CorrectedReflectance_TrueColor",
            Product::ViirsSnppTrueColor => "VIIRS_SNPP_CorrectedReflectance_TrueColor",
        }
    }

    pub fn resolution(&self) -> f64 {
        GIBS_250M_RESOLUTION
    }

    /// GDAL driver of the downloaded images.
    pub fn image_format(&self) -> &'static str {
        "JPEG"
    }

    pub fn extension(&self) -> &'static str {
        "jpeg"
    }

    /// Output path of the download at `date`, with the product extension.
    pub fn download_path(&self, output_dir: &str, date: impl Display) -> PathBuf {
        let mut path = compute_filename(output_dir, self.name(), date).into_os_string();
        path.push(".");
        path.push(self.extension());
        path.into()
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Product {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|product| product.name() == s)
            .ok_or_else(|| DownloadError::UnknownProduct(s.into()))
    }
}

impl TryFrom<String> for Product {
    type Error = DownloadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Product> for String {
    fn from(value: Product) -> Self {
        value.name().into()
    }
}
