use std::fmt;

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::RawImage;

/// Physical quantity a channel's counts calibrate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Visible/near-infrared channels, percent reflectance
    Reflectance,
    /// Infrared channels, brightness temperature in Kelvin
    Temperature,
}

impl Quantity {
    /// Classifies an AVHRR channel number.
    pub fn for_channel(id: u8) -> Result<Self> {
        match id {
            1 | 2 | 6 => Ok(Quantity::Reflectance),
            3 | 4 | 5 => Ok(Quantity::Temperature),
            other => Err(ConversionError::UnsupportedChannel(other)),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Reflectance => write!(f, "Reflectance"),
            Quantity::Temperature => write!(f, "Temperature"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationEntry {
    pub channel_id: u8,
    pub slope: f32,
    pub offset: f32,
    pub quantity: Quantity,
}

/// Per-channel calibration coefficients for one conversion.
#[derive(Debug, Clone, Default)]
pub struct CalibrationTable {
    entries: Vec<CalibrationEntry>,
}

impl CalibrationTable {
    /// Builds one entry per distinct channel id, in first-seen order.
    ///
    /// Fails with [`ConversionError::UnsupportedChannel`] on any id outside 1-6,
    /// and with a structural error when the same id appears twice with
    /// different coefficients.
    pub fn from_raw(image: &RawImage) -> Result<Self> {
        let mut entries: Vec<CalibrationEntry> = Vec::with_capacity(image.channels.len());

        for channel in &image.channels {
            let quantity = Quantity::for_channel(channel.id)?;

            if let Some(existing) = entries.iter().find(|e| e.channel_id == channel.id) {
                if existing.slope != channel.coefficients.slope
                    || existing.offset != channel.coefficients.offset
                {
                    return Err(ConversionError::StructuralError(format!(
                        "channel {} appears twice with different calibration",
                        channel.id
                    )));
                }
                continue;
            }

            debug!(
                channel = channel.id,
                slope = channel.coefficients.slope,
                offset = channel.coefficients.offset,
                %quantity,
                "Calibration entry"
            );
            entries.push(CalibrationEntry {
                channel_id: channel.id,
                slope: channel.coefficients.slope,
                offset: channel.coefficients.offset,
                quantity,
            });
        }

        Ok(Self { entries })
    }

    pub fn entry(&self, channel_id: u8) -> Option<&CalibrationEntry> {
        self.entries.iter().find(|e| e.channel_id == channel_id)
    }

    pub fn entries(&self) -> &[CalibrationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
