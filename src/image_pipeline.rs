//! AVHRR level-2 to MITIFF pipeline
//!
//! Raw decoding, radiometric calibration and byte packing, corner
//! reprojection and MITIFF writing live in separate modules; `conversions`
//! wires them together.

pub mod raw;
pub mod calibration;
pub mod projection;
pub mod output;
pub mod mitiff;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    Acquisition,
    ChannelCoefficients,
    Corner,
    RawChannel,
    RawImage,
    RawImageReader,
    TiffStackReader,
};

pub use calibration::{
    CalibrationSource,
    CalibrationTable,
    LinearCalibration,
    Quantity,
};

pub use projection::{
    CornerProjection,
    LegacyGridShift,
};

pub use output::{
    CalibratedChannel,
    ChannelList,
    OutputImage,
};

pub use mitiff::{
    ConversionConfig,
    ConversionConfigBuilder,
    MitiffWriter,
    OperatingMode,
    StandardMitiffWriter,
    TiffCompression,
};

pub use conversions::{
    AvhrrToMitiffPipeline,
};
