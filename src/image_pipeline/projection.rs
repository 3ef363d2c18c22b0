//! Reference corner reprojection
//!
//! Experimental-chain files store the corner in the legacy internal grid. It
//! is moved into the target grid convention before it reaches the header;
//! operational files already use the target convention.

use tracing::debug;

use crate::image_pipeline::mitiff::types::OperatingMode;
use crate::image_pipeline::raw::types::Corner;

/// Legacy-to-target grid transform for a single corner coordinate.
pub trait CornerProjection {
    fn to_target(&self, corner: Corner) -> Corner;
}

/// Translation between the legacy grid origin and the target grid origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LegacyGridShift {
    pub eastings_offset: f64,
    pub northings_offset: f64,
}

impl LegacyGridShift {
    pub fn new(eastings_offset: f64, northings_offset: f64) -> Self {
        Self {
            eastings_offset,
            northings_offset,
        }
    }
}

impl CornerProjection for LegacyGridShift {
    fn to_target(&self, corner: Corner) -> Corner {
        Corner::new(
            corner.eastings + self.eastings_offset,
            corner.northings + self.northings_offset,
        )
    }
}

/// Applies `projection` in experimental mode; identity otherwise.
pub fn reproject_corner<P: CornerProjection + ?Sized>(
    mode: OperatingMode,
    corner: Corner,
    projection: &P,
) -> Corner {
    if !mode.applies_legacy_reprojection() {
        return corner;
    }

    let target = projection.to_target(corner);
    debug!(
        from_e = corner.eastings,
        from_n = corner.northings,
        to_e = target.eastings,
        to_n = target.northings,
        "Reprojected legacy corner"
    );
    target
}
