use std::{fmt::Display, fs, path::PathBuf};

use log::debug;

use crate::errors::Result;

/// GIBS tiled WMS endpoint for the EPSG:4326 "best" imagery.
pub const GIBS_TWMS_URL: &str = "https://gibs.earthdata.nasa.gov/twms/epsg4326/best/twms.cgi?";

/// Path of the download of `product_name` for `date`.
///
/// Plain concatenation, `output_dir` is expected to end with a separator.
pub fn compute_filename(output_dir: &str, product_name: &str, date: impl Display) -> PathBuf {
    PathBuf::from(format!("{output_dir}{product_name}_{date}"))
}

/// GDAL `TiledWMS` description of the `product_name` tileset at `date`.
pub fn source_descriptor_xml(product_name: &str, date: impl Display) -> String {
    format!(
        "<GDAL_WMS><Service name=\"TiledWMS\"><ServerUrl>{GIBS_TWMS_URL}</ServerUrl>\
         <TiledGroupName>{product_name} tileset</TiledGroupName>\
         <Change key=\"${{time}}\">{date}</Change></Service></GDAL_WMS>"
    )
}

/// Writes the source descriptor to `{xml_dir}{date}.xml`, replacing any previous one.
///
/// The file is left on disk.
pub fn build_source_descriptor(
    xml_dir: &str,
    product_name: &str,
    date: impl Display,
) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{xml_dir}{date}.xml"));
    fs::write(&path, source_descriptor_xml(product_name, &date))?;
    debug!("wrote {product_name} descriptor for {date} to {}", path.display());
    Ok(path)
}
