//! AVHRR to MITIFF conversion configuration types

use std::str::FromStr;

use crate::image_pipeline::projection::LegacyGridShift;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (what most MITIFF readers expect)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

impl FromStr for TiffCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(TiffCompression::None),
            "lzw" => Ok(TiffCompression::Lzw),
            "deflate-fast" => Ok(TiffCompression::DeflateFast),
            "deflate" | "deflate-balanced" => Ok(TiffCompression::DeflateBalanced),
            "deflate-best" => Ok(TiffCompression::DeflateBest),
            other => Err(format!(
                "unknown compression '{}' (none, lzw, deflate-fast, deflate, deflate-best)",
                other
            )),
        }
    }
}

/// Processing chain the input comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperatingMode {
    /// Operational chain; corner already in the target grid
    #[default]
    Operational,
    /// Experimental chain; corner stored in the legacy grid
    Experimental,
}

impl OperatingMode {
    pub fn applies_legacy_reprojection(self) -> bool {
        matches!(self, OperatingMode::Experimental)
    }
}

/// Configuration for AVHRR to MITIFF conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub mode: OperatingMode,
    /// Compression method to use
    pub compression: TiffCompression,
    /// Convert channels on the rayon pool instead of one after another
    pub parallel: bool,
    /// Legacy-to-target grid translation used in experimental mode
    pub legacy_shift: LegacyGridShift,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            mode: OperatingMode::Operational,
            compression: TiffCompression::None,
            parallel: true,
            legacy_shift: LegacyGridShift::default(),
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    mode: Option<OperatingMode>,
    compression: Option<TiffCompression>,
    parallel: Option<bool>,
    legacy_shift: Option<LegacyGridShift>,
}

impl ConversionConfigBuilder {
    pub fn mode(mut self, mode: OperatingMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = Some(enable);
        self
    }

    pub fn legacy_shift(mut self, shift: LegacyGridShift) -> Self {
        self.legacy_shift = Some(shift);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            mode: self.mode.unwrap_or(default.mode),
            compression: self.compression.unwrap_or(default.compression),
            parallel: self.parallel.unwrap_or(default.parallel),
            legacy_shift: self.legacy_shift.unwrap_or(default.legacy_shift),
        }
    }
}
