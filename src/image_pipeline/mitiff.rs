//! MITIFF writing module
//!
//! MITIFF is a multi-page 8-bit TIFF, one page per channel, whose first
//! ImageDescription carries a plain-text navigation and calibration header.

pub mod header;
mod standard_mitiff_writer;
pub mod types;
mod writer;

pub use header::{mitiff_header, output_filename};
pub use standard_mitiff_writer::StandardMitiffWriter;
pub use types::{ConversionConfig, ConversionConfigBuilder, OperatingMode, TiffCompression};
pub use writer::MitiffWriter;
