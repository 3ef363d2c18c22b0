//! Raw AVHRR image model and input decoding
//!
//! Decoders turn a source file into a [`RawImage`]: per-channel 10-bit counts,
//! their embedded calibration coefficients, and the navigation header.

mod reader;
mod tiff_stack_reader;
pub mod types;

pub use reader::RawImageReader;
pub use tiff_stack_reader::TiffStackReader;
pub use types::{
    Acquisition, ChannelCoefficients, Corner, RawChannel, RawImage, MASK_CHANNEL_INDEX,
    MAX_CHANNELS, SENSOR_BIT_DEPTH,
};
