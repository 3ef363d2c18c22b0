//! MITIFF text header and output file naming

use chrono::NaiveDateTime;

use crate::image_pipeline::output::types::OutputImage;

pub const MAP_PROJECTION: &str = "Polar Stereographic";
pub const TRUE_LATITUDE: &str = "60.0 N";
/// Grid cell size in metres along both axes.
pub const GRID_UNIT_M: f64 = 1000.0;

/// Renders the ImageDescription header DIANA and satsplit parse.
pub fn mitiff_header(image: &OutputImage) -> String {
    let mut header = String::new();
    header.push_str(&format!(" Satellite: {}\n", image.satellite_id));
    header.push_str(&format!(" Date and Time: {}\n", image.timestamp()));
    header.push_str(" SatDir: 0\n");
    header.push_str(&format!(
        " Channels: {} In this file: {}\n",
        image.channel_list.len(),
        image.channel_list
    ));
    header.push_str(&format!(" Xsize: {}\n", image.width));
    header.push_str(&format!(" Ysize: {}\n", image.height));
    header.push_str(&format!(" Map projection: {}\n", MAP_PROJECTION));
    header.push_str(&format!(" TrueLat: {}\n", TRUE_LATITUDE));
    header.push_str(" GridRot: 0\n");
    header.push_str(&format!(
        " Xunit:{} m Yunit: {} m\n",
        GRID_UNIT_M, GRID_UNIT_M
    ));
    header.push_str(&format!(" NPX: {:.6} NPY: {:.6}\n", 0.0, 0.0));
    header.push_str(&format!(
        " Ax: {:.6} Ay: {:.6} Bx: {:.6} By: {:.6}\n",
        image.scale_ax, image.scale_ay, image.corner.eastings, image.corner.northings
    ));
    header.push_str(&image.calibration_annotation);
    header
}

/// `n<YYYY><MM><DD><HH><MI>m<area>.mitiff`
pub fn output_filename(acquired_at: &NaiveDateTime, area: &str) -> String {
    format!("n{}m{}.mitiff", acquired_at.format("%Y%m%d%H%M"), area)
}
