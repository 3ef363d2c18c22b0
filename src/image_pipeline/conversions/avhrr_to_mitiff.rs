use tracing::{info, instrument};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::image_pipeline::{
    calibration::{convert_channels, CalibrationSource, CalibrationTable, LinearCalibration},
    common::error::{ConversionError, Result},
    mitiff::{output_filename, ConversionConfig, MitiffWriter, StandardMitiffWriter},
    output::{assemble, OutputImage},
    projection::{reproject_corner, CornerProjection, LegacyGridShift},
    raw::{RawImage, RawImageReader, TiffStackReader},
};

pub struct AvhrrToMitiffPipeline<R, W, C = LinearCalibration, P = LegacyGridShift>
where
    R: RawImageReader,
    W: MitiffWriter,
    C: CalibrationSource,
    P: CornerProjection,
{
    reader: R,
    writer: W,
    calibration: C,
    projection: P,
    config: ConversionConfig,
}

impl AvhrrToMitiffPipeline<TiffStackReader, StandardMitiffWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_custom(TiffStackReader, StandardMitiffWriter, config)
    }
}

impl<R: RawImageReader, W: MitiffWriter> AvhrrToMitiffPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            calibration: LinearCalibration,
            projection: config.legacy_shift,
            config,
        }
    }
}

impl<R, W, C, P> AvhrrToMitiffPipeline<R, W, C, P>
where
    R: RawImageReader,
    W: MitiffWriter,
    C: CalibrationSource,
    P: CornerProjection,
{
    /// Swaps in another count-to-physical-value collaborator.
    pub fn with_calibration<C2: CalibrationSource>(
        self,
        calibration: C2,
    ) -> AvhrrToMitiffPipeline<R, W, C2, P> {
        AvhrrToMitiffPipeline {
            reader: self.reader,
            writer: self.writer,
            calibration,
            projection: self.projection,
            config: self.config,
        }
    }

    /// Swaps in another legacy corner transform.
    pub fn with_projection<P2: CornerProjection>(
        self,
        projection: P2,
    ) -> AvhrrToMitiffPipeline<R, W, C, P2> {
        AvhrrToMitiffPipeline {
            reader: self.reader,
            writer: self.writer,
            calibration: self.calibration,
            projection,
            config: self.config,
        }
    }

    /// Calibrates a decoded pass into an [`OutputImage`]. No I/O happens here.
    #[instrument(skip(self, raw_image), fields(
        width = raw_image.width,
        height = raw_image.height,
        channels = raw_image.channels.len()
    ))]
    pub fn process(&self, raw_image: &RawImage) -> Result<OutputImage> {
        {
            let _span = tracing::info_span!("validate_image").entered();
            raw_image.validate()?;
        }

        let table = {
            let _span = tracing::info_span!("calibration_table").entered();
            CalibrationTable::from_raw(raw_image)?
        };

        let channels = {
            let _span = tracing::info_span!("convert_channels", parallel = self.config.parallel).entered();
            convert_channels(raw_image, &table, &self.calibration, self.config.parallel)?
        };

        let corner = reproject_corner(self.config.mode, raw_image.corner_legacy, &self.projection);

        assemble(raw_image, corner, channels)
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<OutputImage> {
        info!(mode = ?self.config.mode, "Starting AVHRR to MITIFF conversion");

        let raw_image = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(input_data)?
        };

        let image = self.process(&raw_image)?;
        drop(raw_image);

        {
            let _span = tracing::info_span!("encode_mitiff").entered();
            self.writer.write_mitiff(&image, output, &self.config)?;
        }

        info!(
            satellite = %image.satellite_id,
            channels = %image.channel_list,
            width = image.width,
            height = image.height,
            "Conversion complete"
        );
        Ok(image)
    }

    /// Converts `input_path` and writes the MITIFF file into `output_dir`
    /// under its standard name. Returns the path written.
    #[instrument(skip(self, input_path, output_dir))]
    pub fn convert_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input_path: P1,
        output_dir: P2,
    ) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        let output_dir = output_dir.as_ref();

        info!(
            input = %input_path.display(),
            output_dir = %output_dir.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut encoded = Vec::new();
        let image = self.convert(&input_data, &mut encoded)?;

        let output_path = output_dir.join(output_filename(&image.acquired_at, &image.area_name));
        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(&output_path, &encoded).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        info!(output = %output_path.display(), "Wrote MITIFF file");
        Ok(output_path)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}
