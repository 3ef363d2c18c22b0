use std::io::Write;
use tiff::encoder::{colortype, compression::DeflateLevel, Compression, TiffEncoder};
use tiff::tags::Tag;
use tracing::debug;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::mitiff::header::mitiff_header;
use crate::image_pipeline::mitiff::types::{ConversionConfig, TiffCompression};
use crate::image_pipeline::mitiff::writer::MitiffWriter;
use crate::image_pipeline::output::types::OutputImage;

pub struct StandardMitiffWriter;

impl MitiffWriter for StandardMitiffWriter {
    fn write_mitiff(&self, image: &OutputImage, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        debug!(
            "Encoding MITIFF image: {}x{}, {} channels",
            image.width,
            image.height,
            image.channels.len()
        );

        if image.channels.is_empty() {
            return Err(ConversionError::EncodeError("no channels to write".to_string()));
        }

        let width = u32::try_from(image.width)
            .map_err(|_| ConversionError::InvalidDimensions(image.width, image.height))?;
        let height = u32::try_from(image.height)
            .map_err(|_| ConversionError::InvalidDimensions(image.width, image.height))?;

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let header = mitiff_header(image);
        let mut buffer = Vec::new();

        {
            let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
                .map_err(|e| ConversionError::EncodeError(e.to_string()))?
                .with_compression(compression);

            for (page, channel) in image.channels.iter().enumerate() {
                if channel.samples.len() != image.width * image.height {
                    return Err(ConversionError::EncodeError(format!(
                        "channel {} has {} samples for a {}x{} image",
                        channel.channel_id,
                        channel.samples.len(),
                        image.width,
                        image.height
                    )));
                }

                let mut page_encoder = encoder
                    .new_image::<colortype::Gray8>(width, height)
                    .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

                // Readers take the header from the first directory only.
                if page == 0 {
                    page_encoder
                        .encoder()
                        .write_tag(Tag::ImageDescription, header.as_str())
                        .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
                }

                page_encoder
                    .write_data(&channel.samples)
                    .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
            }
        }

        output.write_all(&buffer)?;

        debug!("MITIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
