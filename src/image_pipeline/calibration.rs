//! Radiometric calibration and byte packing
//!
//! Counts are turned into physical values through a [`CalibrationTable`] and a
//! [`CalibrationSource`], then quantized to the 8-bit MITIFF scales.

mod converter;
mod source;
mod table;

pub use converter::{
    calibration_annotation, convert_channel, convert_channels, quantize, ChannelStats, Quantized,
    REFLECTANCE_SCALE, TEMPERATURE_REFERENCE_K, TEMPERATURE_SCALE,
};
pub use source::{CalibrationSource, LinearCalibration};
pub use table::{CalibrationEntry, CalibrationTable, Quantity};
