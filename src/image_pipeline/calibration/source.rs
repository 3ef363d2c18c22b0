use crate::image_pipeline::calibration::table::CalibrationEntry;

/// Turns a raw count into a physical value for the entry's channel and quantity.
///
/// Implementations are shared read-only between channel workers, hence `Sync`.
pub trait CalibrationSource: Sync {
    fn physical_value(&self, count: u16, entry: &CalibrationEntry) -> f32;
}

/// `value = slope * count + offset`, the form of the coefficients the AVHRR
/// level-2 headers carry for both reflectance and temperature channels.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearCalibration;

impl CalibrationSource for LinearCalibration {
    fn physical_value(&self, count: u16, entry: &CalibrationEntry) -> f32 {
        entry.slope * f32::from(count) + entry.offset
    }
}
