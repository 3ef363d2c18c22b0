//! Reader for level-2 AVHRR "TIFF stacks".
//!
//! A stack is a multi-page 16-bit grayscale TIFF holding one channel per page.
//! The first page's ImageDescription carries the pass metadata as `Key: value`
//! lines:
//!
//! ```text
//! Satellite: NOAA-17
//! Time: 2005-03-15 08:46
//! Area: sn
//! Channel: 1 0.0978 0.0
//! Channel: 4 -0.1 330.0
//! Ax: 1.0
//! Ay: 1.0
//! Bx: -1000.0
//! By: -3000.0
//! MaskChannel: 1
//! ```
//!
//! There is one `Channel: <id> <slope> <offset>` line per page, in page order.
//! `MaskChannel` is optional and defaults to [`MASK_CHANNEL_INDEX`].

use std::io::Cursor;

use chrono::{Datelike, NaiveDateTime, Timelike};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::{
    Acquisition, ChannelCoefficients, Corner, RawChannel, RawImage, MASK_CHANNEL_INDEX,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct TiffStackReader;

#[derive(Debug, Default)]
struct StackHeader {
    satellite: Option<String>,
    time: Option<NaiveDateTime>,
    area: Option<String>,
    channels: Vec<(u8, ChannelCoefficients)>,
    ax: Option<f64>,
    ay: Option<f64>,
    bx: Option<f64>,
    by: Option<f64>,
    mask_channel: Option<usize>,
}

fn decode_err(msg: impl Into<String>) -> ConversionError {
    ConversionError::DecodeError(msg.into())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| decode_err(format!("{}: cannot parse '{}'", key, value.trim())))
}

fn parse_channel(value: &str) -> Result<(u8, ChannelCoefficients)> {
    let fields: Vec<&str> = value.split_whitespace().collect();
    let [id, slope, offset] = fields.as_slice() else {
        return Err(decode_err(format!(
            "Channel: expected '<id> <slope> <offset>', got '{}'",
            value.trim()
        )));
    };
    Ok((
        parse_number("Channel id", id)?,
        ChannelCoefficients::new(
            parse_number("Channel slope", slope)?,
            parse_number("Channel offset", offset)?,
        ),
    ))
}

fn parse_header(text: &str) -> Result<StackHeader> {
    let mut header = StackHeader::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(decode_err(format!("malformed header line '{}'", line)));
        };

        match key.trim().to_ascii_lowercase().as_str() {
            "satellite" => header.satellite = Some(value.trim().to_string()),
            "time" => {
                let time = NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT)
                    .map_err(|e| decode_err(format!("Time: {}", e)))?;
                header.time = Some(time);
            }
            "area" => header.area = Some(value.trim().to_string()),
            "channel" => header.channels.push(parse_channel(value)?),
            "ax" => header.ax = Some(parse_number("Ax", value)?),
            "ay" => header.ay = Some(parse_number("Ay", value)?),
            "bx" => header.bx = Some(parse_number("Bx", value)?),
            "by" => header.by = Some(parse_number("By", value)?),
            "maskchannel" => header.mask_channel = Some(parse_number("MaskChannel", value)?),
            other => debug!("Ignoring header key '{}'", other),
        }
    }

    Ok(header)
}

fn require<T>(value: Option<T>, key: &str) -> Result<T> {
    value.ok_or_else(|| decode_err(format!("missing '{}' header line", key)))
}

impl RawImageReader for TiffStackReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawImage> {
        debug!("Decoding TIFF stack, {} bytes", data.len());

        let mut decoder =
            Decoder::new(Cursor::new(data)).map_err(|e| decode_err(e.to_string()))?;

        let description = decoder
            .get_tag_ascii_string(Tag::ImageDescription)
            .map_err(|e| decode_err(format!("ImageDescription: {}", e)))?;
        let header = parse_header(&description)?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| decode_err(e.to_string()))?;

        let mut pages: Vec<Vec<u16>> = Vec::new();
        loop {
            let dims = decoder
                .dimensions()
                .map_err(|e| decode_err(e.to_string()))?;
            if dims != (width, height) {
                return Err(decode_err(format!(
                    "page {} is {}x{}, first page is {}x{}",
                    pages.len(),
                    dims.0,
                    dims.1,
                    width,
                    height
                )));
            }

            let samples = match decoder
                .read_image()
                .map_err(|e| decode_err(e.to_string()))?
            {
                DecodingResult::U16(values) => values,
                DecodingResult::U8(values) => values.into_iter().map(u16::from).collect(),
                _ => return Err(decode_err("pages must be 8 or 16-bit grayscale")),
            };
            pages.push(samples);

            if !decoder.more_images() {
                break;
            }
            decoder
                .next_image()
                .map_err(|e| decode_err(e.to_string()))?;
        }

        if pages.len() != header.channels.len() {
            return Err(decode_err(format!(
                "{} pages but {} Channel lines",
                pages.len(),
                header.channels.len()
            )));
        }

        let time = require(header.time, "Time")?;
        let acquisition = Acquisition {
            satellite_id: require(header.satellite, "Satellite")?,
            year: time.year(),
            month: time.month(),
            day: time.day(),
            hour: time.hour(),
            minute: time.minute(),
        };

        let channels = header
            .channels
            .into_iter()
            .zip(pages)
            .map(|((id, coefficients), samples)| RawChannel::new(id, samples, coefficients))
            .collect::<Vec<_>>();

        debug!(
            "Decoded stack: {}x{}, channels {:?}",
            width,
            height,
            channels.iter().map(|c| c.id).collect::<Vec<_>>()
        );

        Ok(RawImage::new(width as usize, height as usize, channels, acquisition)
            .with_corner(Corner::new(
                require(header.bx, "Bx")?,
                require(header.by, "By")?,
            ))
            .with_scale(header.ax.unwrap_or(1.0), header.ay.unwrap_or(1.0))
            .with_area(header.area.unwrap_or_default())
            .with_mask_channel(header.mask_channel.unwrap_or(MASK_CHANNEL_INDEX)))
    }
}
