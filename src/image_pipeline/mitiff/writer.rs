use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::mitiff::types::ConversionConfig;
use crate::image_pipeline::output::types::OutputImage;

pub trait MitiffWriter {
    fn write_mitiff(&self, image: &OutputImage, output: &mut dyn Write, config: &ConversionConfig) -> Result<()>;
}
