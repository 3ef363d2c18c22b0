use rayon::prelude::*;
use tracing::{debug, warn};

use crate::image_pipeline::calibration::source::CalibrationSource;
use crate::image_pipeline::calibration::table::{CalibrationTable, Quantity};
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::output::types::CalibratedChannel;
use crate::image_pipeline::raw::types::{RawChannel, RawImage};

/// Bytes per percent reflectance (255 / 100).
pub const REFLECTANCE_SCALE: f64 = 2.55;

/// Brightness temperature that maps to byte 0.
pub const TEMPERATURE_REFERENCE_K: f64 = 323.15;

/// Bytes per Kelvin below [`TEMPERATURE_REFERENCE_K`].
pub const TEMPERATURE_SCALE: f64 = 2.0;

/// One quantized sample and whether it had to be clamped into 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantized {
    pub value: u8,
    pub clamped: bool,
}

/// Per-channel pixel accounting for one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Pixels zeroed by the no-data mask
    pub masked: usize,
    /// Pixels whose scaled value fell outside 0-255
    pub clamped: usize,
}

/// Maps a physical value onto the MITIFF byte scale of its quantity.
///
/// Reflectance: `round(v * 2.55)`. Temperature: `round(323.15 * 2 - v * 2)`,
/// so colder scenes are brighter. Results outside 0-255, and non-finite
/// values, are clamped to the nearest bound and flagged.
pub fn quantize(quantity: Quantity, value: f32) -> Quantized {
    let value = f64::from(value);
    let scaled = match quantity {
        // Product narrowed to f32 before rounding, matching the legacy byte packer.
        Quantity::Reflectance => f64::from(((value * REFLECTANCE_SCALE) as f32).round()),
        Quantity::Temperature => {
            (TEMPERATURE_REFERENCE_K * TEMPERATURE_SCALE - value * TEMPERATURE_SCALE).round()
        }
    };

    if scaled.is_nan() || scaled < 0.0 {
        Quantized {
            value: 0,
            clamped: true,
        }
    } else if scaled > f64::from(u8::MAX) {
        Quantized {
            value: u8::MAX,
            clamped: true,
        }
    } else {
        Quantized {
            value: scaled as u8,
            clamped: false,
        }
    }
}

/// Inverse of the byte scales, as written into the MITIFF header.
pub fn calibration_annotation() -> String {
    format!(
        " Calibration VIS: A=({:.2})+({:.6})*C\n Calibration IR: T=({:.2})+({})*C",
        0.0,
        1.0 / REFLECTANCE_SCALE,
        TEMPERATURE_REFERENCE_K,
        -1.0 / TEMPERATURE_SCALE
    )
}

/// Calibrates and byte-packs one channel.
///
/// Every pixel where `mask` is zero becomes 0 regardless of the channel's own
/// count. The output buffer is allocated fallibly so an exhausted allocator
/// surfaces as [`ConversionError::ResourceError`].
pub fn convert_channel<C: CalibrationSource + ?Sized>(
    channel: &RawChannel,
    mask: &[u16],
    table: &CalibrationTable,
    source: &C,
) -> Result<(CalibratedChannel, ChannelStats)> {
    let entry = table
        .entry(channel.id)
        .ok_or(ConversionError::UnsupportedChannel(channel.id))?;

    if mask.len() != channel.samples.len() {
        return Err(ConversionError::StructuralError(format!(
            "mask has {} samples but channel {} has {}",
            mask.len(),
            channel.id,
            channel.samples.len()
        )));
    }

    let mut samples: Vec<u8> = Vec::new();
    samples
        .try_reserve_exact(channel.samples.len())
        .map_err(|e| ConversionError::ResourceError(format!("channel {}: {}", channel.id, e)))?;

    let mut stats = ChannelStats::default();
    for (&count, &mask_count) in channel.samples.iter().zip(mask) {
        if mask_count == 0 {
            stats.masked += 1;
            samples.push(0);
            continue;
        }

        let quantized = quantize(entry.quantity, source.physical_value(count, entry));
        if quantized.clamped {
            stats.clamped += 1;
        }
        samples.push(quantized.value);
    }

    debug!(
        channel = channel.id,
        quantity = %entry.quantity,
        masked = stats.masked,
        clamped = stats.clamped,
        "Channel calibrated"
    );

    Ok((
        CalibratedChannel {
            channel_id: channel.id,
            samples,
        },
        stats,
    ))
}

/// Converts every channel of `image` against its shared mask channel.
///
/// With `parallel` set, channels are spread over the rayon pool; the first
/// failing channel aborts the whole image either way.
pub fn convert_channels<C: CalibrationSource + ?Sized>(
    image: &RawImage,
    table: &CalibrationTable,
    source: &C,
    parallel: bool,
) -> Result<Vec<CalibratedChannel>> {
    let mask = image.mask_samples()?;

    let converted: Vec<(CalibratedChannel, ChannelStats)> = if parallel {
        image
            .channels
            .par_iter()
            .map(|channel| convert_channel(channel, mask, table, source))
            .collect::<Result<_>>()?
    } else {
        image
            .channels
            .iter()
            .map(|channel| convert_channel(channel, mask, table, source))
            .collect::<Result<_>>()?
    };

    let mut channels = Vec::with_capacity(converted.len());
    for (channel, stats) in converted {
        if stats.clamped > 0 {
            warn!(
                channel = channel.channel_id,
                clamped = stats.clamped,
                "Calibrated values outside the 8-bit range were clamped"
            );
        }
        channels.push(channel);
    }

    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::calibration::source::LinearCalibration;
    use crate::image_pipeline::calibration::table::CalibrationEntry;
    use crate::image_pipeline::raw::types::{Acquisition, ChannelCoefficients};

    /// Returns the count itself as the physical value.
    struct IdentitySource;

    impl CalibrationSource for IdentitySource {
        fn physical_value(&self, count: u16, _entry: &CalibrationEntry) -> f32 {
            f32::from(count)
        }
    }

    fn acquisition() -> Acquisition {
        Acquisition {
            satellite_id: "NOAA-17".to_string(),
            year: 2005,
            month: 3,
            day: 15,
            hour: 8,
            minute: 46,
        }
    }

    fn image_with(channels: Vec<RawChannel>, width: usize, height: usize) -> RawImage {
        RawImage::new(width, height, channels, acquisition())
    }

    #[test]
    fn test_reflectance_quantization() {
        assert_eq!(quantize(Quantity::Reflectance, 0.0).value, 0);
        assert_eq!(quantize(Quantity::Reflectance, 50.0).value, 128);
        assert_eq!(quantize(Quantity::Reflectance, 100.0).value, 255);
        assert!(!quantize(Quantity::Reflectance, 100.0).clamped);

        let over = quantize(Quantity::Reflectance, 120.0);
        assert_eq!(over, Quantized { value: 255, clamped: true });
        let under = quantize(Quantity::Reflectance, -3.0);
        assert_eq!(under, Quantized { value: 0, clamped: true });
    }

    #[test]
    fn test_reflectance_rounds_single_precision_product() {
        // 2.1568627 * 2.55 is 5.4999999 in f64 but 5.5 once narrowed to f32
        assert_eq!(quantize(Quantity::Reflectance, 2.156_862_7).value, 6);
        assert_eq!(quantize(Quantity::Reflectance, 2.549_019_6).value, 7);
        assert_eq!(quantize(Quantity::Reflectance, 3.333_333_3).value, 9);
    }

    #[test]
    fn test_temperature_quantization() {
        assert_eq!(quantize(Quantity::Temperature, 323.15).value, 0);
        assert_eq!(quantize(Quantity::Temperature, 273.15).value, 100);
        assert_eq!(quantize(Quantity::Temperature, 200.0).value, 246);

        let cold = quantize(Quantity::Temperature, 150.0);
        assert_eq!(cold, Quantized { value: 255, clamped: true });
        let hot = quantize(Quantity::Temperature, 400.0);
        assert_eq!(hot, Quantized { value: 0, clamped: true });
    }

    #[test]
    fn test_non_finite_values_clamp_to_zero() {
        assert_eq!(
            quantize(Quantity::Reflectance, f32::NAN),
            Quantized { value: 0, clamped: true }
        );
        assert_eq!(quantize(Quantity::Temperature, f32::NEG_INFINITY).value, 255);
    }

    #[test]
    fn test_reflectance_is_monotonic() {
        let mut previous = 0u8;
        for step in 0..=1000 {
            let v = step as f32 / 10.0;
            let byte = quantize(Quantity::Reflectance, v).value;
            assert!(byte >= previous, "reflectance {} went down to {}", v, byte);
            previous = byte;
        }
    }

    #[test]
    fn test_temperature_is_monotonic_decreasing() {
        let mut previous = u8::MAX;
        for step in 0..=2000 {
            let v = 180.0 + step as f32 / 10.0;
            let byte = quantize(Quantity::Temperature, v).value;
            assert!(byte <= previous, "temperature {} went up to {}", v, byte);
            previous = byte;
        }
    }

    #[test]
    fn test_annotation_matches_scales() {
        assert_eq!(
            calibration_annotation(),
            " Calibration VIS: A=(0.00)+(0.392157)*C\n Calibration IR: T=(323.15)+(-0.5)*C"
        );
    }

    #[test]
    fn test_self_masked_reflectance_channel() {
        let channel = RawChannel::new(
            1,
            vec![0, 100, 200, 1023],
            ChannelCoefficients::new(100.0 / 1023.0, 0.0),
        );
        let image = image_with(vec![channel], 2, 2).with_mask_channel(0);
        let table = CalibrationTable::from_raw(&image).unwrap();

        let channels = convert_channels(&image, &table, &LinearCalibration, false).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].channel_id, 1);
        assert_eq!(channels[0].samples, vec![0, 25, 50, 255]);
    }

    #[test]
    fn test_mask_zeroes_every_channel() {
        let mask = vec![5, 0, 7, 0];
        let channels = vec![
            RawChannel::new(1, vec![40; 4], ChannelCoefficients::new(1.0, 0.0)),
            RawChannel::new(2, vec![60; 4], ChannelCoefficients::new(1.0, 0.0)),
            RawChannel::new(3, vec![280; 4], ChannelCoefficients::new(1.0, 0.0)),
            RawChannel::new(4, mask, ChannelCoefficients::new(0.0, 250.0)),
        ];
        let image = image_with(channels, 2, 2);
        let table = CalibrationTable::from_raw(&image).unwrap();

        let out = convert_channels(&image, &table, &LinearCalibration, true).unwrap();
        for channel in &out {
            assert_eq!(channel.samples[1], 0, "channel {}", channel.channel_id);
            assert_eq!(channel.samples[3], 0, "channel {}", channel.channel_id);
            assert_ne!(channel.samples[0], 0, "channel {}", channel.channel_id);
        }
        assert_eq!(out[0].samples[0], 102);
        assert_eq!(out[2].samples[2], 86);
    }

    #[test]
    fn test_stats_count_masked_and_clamped() {
        let channel = RawChannel::new(5, vec![10, 20, 30, 40], ChannelCoefficients::new(1.0, 0.0));
        let mask = [1, 0, 1, 1];
        let image = image_with(vec![channel.clone()], 2, 2).with_mask_channel(0);
        let table = CalibrationTable::from_raw(&image).unwrap();

        let (out, stats) = convert_channel(&channel, &mask, &table, &IdentitySource).unwrap();
        assert_eq!(stats, ChannelStats { masked: 1, clamped: 3 });
        assert_eq!(out.samples, vec![255, 0, 255, 255]);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let pixels = 64 * 32;
        let channels = (1..=6u8)
            .map(|id| {
                let samples = (0..pixels).map(|i| ((i * 7 + usize::from(id) * 13) % 1024) as u16).collect();
                let coefficients = if matches!(id, 3 | 4 | 5) {
                    ChannelCoefficients::new(-0.15, 330.0)
                } else {
                    ChannelCoefficients::new(0.0978, 0.0)
                };
                RawChannel::new(id, samples, coefficients)
            })
            .collect();
        let image = image_with(channels, 64, 32);
        let table = CalibrationTable::from_raw(&image).unwrap();

        let sequential = convert_channels(&image, &table, &LinearCalibration, false).unwrap();
        let parallel = convert_channels(&image, &table, &LinearCalibration, true).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(
            parallel.iter().map(|c| c.channel_id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn test_channel_missing_from_table_is_unsupported() {
        let channel = RawChannel::new(8, vec![1; 4], ChannelCoefficients::new(1.0, 0.0));
        let table = CalibrationTable::default();
        let result = convert_channel(&channel, &[1; 4], &table, &LinearCalibration);
        assert!(matches!(result, Err(ConversionError::UnsupportedChannel(8))));
    }

    #[test]
    fn test_mask_length_mismatch() {
        let channel = RawChannel::new(1, vec![1; 4], ChannelCoefficients::new(1.0, 0.0));
        let image = image_with(vec![channel.clone()], 2, 2).with_mask_channel(0);
        let table = CalibrationTable::from_raw(&image).unwrap();
        let result = convert_channel(&channel, &[1; 3], &table, &LinearCalibration);
        assert!(matches!(result, Err(ConversionError::StructuralError(_))));
    }
}
