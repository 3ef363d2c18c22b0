use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RawImage;

/// Format decoder seam. Implementations report unreadable or malformed input
/// as [`ConversionError::DecodeError`](crate::image_pipeline::ConversionError::DecodeError).
pub trait RawImageReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawImage>;
}
