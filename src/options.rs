use crate::product::{Product, GIBS_250M_RESOLUTION};

fn default_resolution() -> f64 {
    GIBS_250M_RESOLUTION
}

fn default_image_format() -> String {
    "JPEG".into()
}

/// Settings shared by the downloads of a run.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DownloadOptions {
    /// Prefix of the source descriptor files, expected to end with a separator.
    #[serde(default)]
    pub xml_dir: String,
    /// Crs units per pixel, used when no explicit size is given.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    /// GDAL driver of the output.
    #[serde(default = "default_image_format")]
    pub image_format: String,
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub height: Option<usize>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            xml_dir: String::new(),
            resolution: default_resolution(),
            image_format: default_image_format(),
            width: None,
            height: None,
        }
    }
}

impl DownloadOptions {
    pub fn for_product(product: &Product) -> Self {
        Self {
            resolution: product.resolution(),
            image_format: product.image_format().into(),
            ..Default::default()
        }
    }

    pub fn with_xml_dir(mut self, xml_dir: impl Into<String>) -> Self {
        self.xml_dir = xml_dir.into();
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}
