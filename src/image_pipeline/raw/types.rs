//! Raw AVHRR image data types

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Largest number of channels a single pass may carry.
pub const MAX_CHANNELS: usize = 6;

/// Position of the channel whose zero counts mark a pixel as no-data.
pub const MASK_CHANNEL_INDEX: usize = 3;

/// Dynamic range of the AVHRR radiometer counts.
pub const SENSOR_BIT_DEPTH: u32 = 10;

/// Linear calibration coefficients embedded in the source file for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCoefficients {
    pub slope: f32,
    pub offset: f32,
}

impl ChannelCoefficients {
    pub fn new(slope: f32, offset: f32) -> Self {
        Self { slope, offset }
    }
}

/// One spectral channel of a decoded pass
#[derive(Debug, Clone)]
pub struct RawChannel {
    /// AVHRR channel number (1-6)
    pub id: u8,
    /// Raw counts, row-major, row 0 first
    pub samples: Vec<u16>,
    pub coefficients: ChannelCoefficients,
}

impl RawChannel {
    pub fn new(id: u8, samples: Vec<u16>, coefficients: ChannelCoefficients) -> Self {
        Self {
            id,
            samples,
            coefficients,
        }
    }
}

/// Satellite and nominal acquisition time of the pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition {
    pub satellite_id: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Projected coordinate of the reference image corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub eastings: f64,
    pub northings: f64,
}

impl Corner {
    pub fn new(eastings: f64, northings: f64) -> Self {
        Self {
            eastings,
            northings,
        }
    }
}

/// Represents one decoded satellite pass
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    pub channels: Vec<RawChannel>,
    /// Index into `channels` of the no-data mask channel
    pub mask_channel_index: usize,
    pub acquisition: Acquisition,
    /// Reference corner in the legacy internal grid (Bx/By)
    pub corner_legacy: Corner,
    /// Grid scale parameters (Ax/Ay), passed through unchanged
    pub scale_ax: f64,
    pub scale_ay: f64,
    /// Processing area name, used in the output filename
    pub area_name: String,
}

impl RawImage {
    pub fn new(
        width: usize,
        height: usize,
        channels: Vec<RawChannel>,
        acquisition: Acquisition,
    ) -> Self {
        Self {
            width,
            height,
            channels,
            mask_channel_index: MASK_CHANNEL_INDEX,
            acquisition,
            corner_legacy: Corner::new(0.0, 0.0),
            scale_ax: 1.0,
            scale_ay: 1.0,
            area_name: String::new(),
        }
    }

    pub fn with_corner(mut self, corner: Corner) -> Self {
        self.corner_legacy = corner;
        self
    }

    pub fn with_scale(mut self, ax: f64, ay: f64) -> Self {
        self.scale_ax = ax;
        self.scale_ay = ay;
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area_name = area.into();
        self
    }

    pub fn with_mask_channel(mut self, index: usize) -> Self {
        self.mask_channel_index = index;
        self
    }

    /// Pixels per channel, or `InvalidDimensions` if `width * height` overflows.
    pub fn pixel_count(&self) -> Result<usize> {
        self.width
            .checked_mul(self.height)
            .ok_or(ConversionError::InvalidDimensions(self.width, self.height))
    }

    pub fn channel_ids(&self) -> Vec<u8> {
        self.channels.iter().map(|c| c.id).collect()
    }

    /// Checks the structural invariants every conversion relies on.
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(ConversionError::StructuralError(
                "image carries no channels".to_string(),
            ));
        }

        if self.channels.len() > MAX_CHANNELS {
            return Err(ConversionError::StructuralError(format!(
                "{} channels exceed the supported maximum of {}",
                self.channels.len(),
                MAX_CHANNELS
            )));
        }

        if self.width == 0 || self.height == 0 {
            return Err(ConversionError::InvalidDimensions(self.width, self.height));
        }

        let expected = self.pixel_count()?;
        for channel in &self.channels {
            if channel.samples.len() != expected {
                return Err(ConversionError::StructuralError(format!(
                    "channel {} has {} samples, expected {}x{}={}",
                    channel.id,
                    channel.samples.len(),
                    self.width,
                    self.height,
                    expected
                )));
            }

            let max_count = (1u16 << SENSOR_BIT_DEPTH) - 1;
            let overflow = channel.samples.iter().filter(|&&s| s > max_count).count();
            if overflow > 0 {
                debug!(
                    channel = channel.id,
                    overflow, "Counts above the {}-bit sensor range", SENSOR_BIT_DEPTH
                );
            }
        }

        if self.mask_channel_index >= self.channels.len() {
            return Err(ConversionError::StructuralError(format!(
                "mask channel index {} out of range for {} channels",
                self.mask_channel_index,
                self.channels.len()
            )));
        }

        Ok(())
    }

    /// Raw counts of the no-data mask channel.
    pub fn mask_samples(&self) -> Result<&[u16]> {
        self.channels
            .get(self.mask_channel_index)
            .map(|c| c.samples.as_slice())
            .ok_or_else(|| {
                ConversionError::StructuralError(format!(
                    "mask channel index {} out of range for {} channels",
                    self.mask_channel_index,
                    self.channels.len()
                ))
            })
    }
}
