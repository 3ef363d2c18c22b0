use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::image_pipeline::calibration::calibration_annotation;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::output::types::{CalibratedChannel, ChannelList, OutputImage};
use crate::image_pipeline::raw::types::{Acquisition, Corner, RawImage};

fn acquisition_time(acquisition: &Acquisition) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(acquisition.year, acquisition.month, acquisition.day)
        .and_then(|date| date.and_hms_opt(acquisition.hour, acquisition.minute, 0))
        .ok_or_else(|| {
            ConversionError::DecodeError(format!(
                "invalid acquisition time {:04}-{:02}-{:02} {:02}:{:02}",
                acquisition.year,
                acquisition.month,
                acquisition.day,
                acquisition.hour,
                acquisition.minute
            ))
        })
}

/// Gathers header fields and calibrated channels into an [`OutputImage`].
///
/// `corner` is the reference corner after any reprojection. Only the first
/// channel for each id is kept, so pages line up with the channel list.
pub fn assemble(
    image: &RawImage,
    corner: Corner,
    channels: Vec<CalibratedChannel>,
) -> Result<OutputImage> {
    let acquired_at = acquisition_time(&image.acquisition)?;
    let channel_list = ChannelList::from_ids(&image.channel_ids());

    let mut seen = Vec::with_capacity(channels.len());
    let channels: Vec<CalibratedChannel> = channels
        .into_iter()
        .filter(|channel| {
            if seen.contains(&channel.channel_id) {
                debug!(channel = channel.channel_id, "Dropping repeated channel");
                false
            } else {
                seen.push(channel.channel_id);
                true
            }
        })
        .collect();

    debug!(
        satellite = %image.acquisition.satellite_id,
        channels = %channel_list,
        "Assembling output image"
    );

    Ok(OutputImage {
        satellite_id: image.acquisition.satellite_id.clone(),
        acquired_at,
        channel_list,
        width: image.width,
        height: image.height,
        corner,
        scale_ax: image.scale_ax,
        scale_ay: image.scale_ay,
        calibration_annotation: calibration_annotation(),
        area_name: image.area_name.clone(),
        channels,
    })
}
